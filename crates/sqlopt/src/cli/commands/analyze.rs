use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use super::report::{ReportArgs, present};
use crate::adapter::{AnalysisOutcome, AzureOpenAiClient, CompletionClient, ParsedReply};
use crate::config::{RuntimePaths, ServiceConfig};
use crate::input::{SqlSource, ensure_non_empty, read_pasted, read_sql_file};
use crate::render::{render_report, report_base_name};

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// A `.sql` file, or `-` to read pasted SQL from standard input.
    #[arg(
        value_name = "INPUT",
        conflicts_with = "sample",
        required_unless_present = "sample"
    )]
    pub input: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub sample: bool,

    /// Print the instructions that would be sent and stop.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    #[command(flatten)]
    pub report: ReportArgs,
}

pub fn run(args: &AnalyzeArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    let source = load_source(args)?;
    eprintln!(
        "analyze: start source={} bytes={} out_dir={}",
        source.label(),
        source.text.len(),
        runtime_paths.out_dir.display()
    );

    if args.dry_run {
        let request = crate::adapter::build_request(&source.text, "<deployment>");
        println!("--- system ---\n{}", request.system_instruction);
        println!("--- user ---\n{}", request.user_instruction);
        eprintln!("analyze: complete dry_run=true");
        return Ok(());
    }

    let config = ServiceConfig::from_environment(&runtime_paths.secrets_file)?;
    let deployment = config.deployment.clone();
    let client = AzureOpenAiClient::new(config)?;
    run_with_client(args, runtime_paths, &client, &deployment, source)
}

/// The part of `analyze` after credentials are settled; `client` makes the
/// single completion call.
pub fn run_with_client<C: CompletionClient + ?Sized>(
    args: &AnalyzeArgs,
    runtime_paths: &RuntimePaths,
    client: &C,
    model: &str,
    source: SqlSource,
) -> Result<()> {
    eprintln!("analyze: stage completion model={model}");
    let outcome = match crate::adapter::analyze(client, model, source) {
        Ok(outcome) => outcome,
        Err(error) => {
            if let Some(raw) = error.raw_reply() {
                eprintln!("analyze: failed parse_reply reason={error}");
                eprintln!("The received response was:");
                eprintln!("{raw}");
            }
            return Err(error.into());
        }
    };

    let AnalysisOutcome {
        source,
        record,
        warnings,
    } = outcome;
    eprintln!(
        "analyze: checkpoint reply_validated procedure={} steps={} warnings={}",
        record.procedure_name,
        record.optimizations.len(),
        warnings.len()
    );

    let base_name = report_base_name(&source.origin, &record);
    let rendered = render_report(&record);
    let reply = ParsedReply { record, warnings };
    let written = present(
        &mut std::io::stdout().lock(),
        "analyze",
        &reply,
        rendered,
        &base_name,
        &args.report,
        &runtime_paths.out_dir,
    )?;
    eprintln!(
        "analyze: complete markdown={} docx={}",
        display_optional(written.markdown.as_deref()),
        display_optional(written.docx.as_deref())
    );
    Ok(())
}

fn load_source(args: &AnalyzeArgs) -> Result<SqlSource> {
    let source = match (&args.input, args.sample) {
        (_, true) => SqlSource::sample(),
        (Some(path), false) if path.as_os_str() == "-" => read_pasted(std::io::stdin().lock())?,
        (Some(path), false) => read_sql_file(path)?,
        (None, false) => SqlSource::pasted(String::new()),
    };
    ensure_non_empty(&source)?;
    Ok(source)
}

fn display_optional(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string())
        .unwrap_or_else(|| "skipped".to_string())
}
