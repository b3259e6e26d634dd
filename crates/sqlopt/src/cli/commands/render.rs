use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::report::{ReportArgs, present};
use crate::config::RuntimePaths;
use crate::input::SourceOrigin;
use crate::render::{render_report, report_base_name};

#[derive(Debug, Clone, Args)]
pub struct RenderArgs {
    /// A saved model reply (the JSON object returned by the endpoint).
    #[arg(value_name = "REPLY")]
    pub reply: PathBuf,

    #[command(flatten)]
    pub report: ReportArgs,
}

/// Renders a saved reply without contacting the endpoint. The reply goes
/// through the same validation as a live one.
pub fn run(args: &RenderArgs, runtime_paths: &RuntimePaths) -> Result<()> {
    eprintln!(
        "render: start reply={} out_dir={}",
        args.reply.display(),
        runtime_paths.out_dir.display()
    );
    let raw = std::fs::read_to_string(&args.reply)
        .with_context(|| format!("failed to read reply file: {}", args.reply.display()))?;

    let parsed = match crate::adapter::parse_reply(&raw) {
        Ok(parsed) => parsed,
        Err(error) => {
            eprintln!("render: failed parse_reply reason={error}");
            eprintln!("The received response was:");
            eprintln!("{raw}");
            return Err(error.into());
        }
    };

    let base_name = report_base_name(&SourceOrigin::Pasted, &parsed.record);
    let rendered = render_report(&parsed.record);
    let written = present(
        &mut std::io::stdout().lock(),
        "render",
        &parsed,
        rendered,
        &base_name,
        &args.report,
        &runtime_paths.out_dir,
    )?;
    eprintln!(
        "render: complete steps={} warnings={} markdown_written={} docx_written={}",
        parsed.record.optimizations.len(),
        parsed.warnings.len(),
        written.markdown.is_some(),
        written.docx.is_some()
    );
    Ok(())
}
