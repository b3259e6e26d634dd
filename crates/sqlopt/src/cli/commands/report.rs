use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::json;

use crate::adapter::ParsedReply;
use crate::render::naming::sanitize_base_name;
use crate::render::screen::{DEFAULT_WIDTH, render_text};
use crate::render::{RenderedReport, TextOptions, report_file_names};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScreenFormat {
    Text,
    Json,
}

/// Presentation options shared by every command that shows a report.
#[derive(Debug, Clone, Args)]
pub struct ReportArgs {
    /// Base name for the downloaded documents (before `_analysis`).
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    #[arg(long, value_enum, default_value_t = ScreenFormat::Text)]
    pub format: ScreenFormat,

    #[arg(long, default_value_t = false)]
    pub collapsed: bool,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: usize,

    #[arg(long, default_value_t = false)]
    pub no_docx: bool,

    #[arg(long, default_value_t = false)]
    pub no_markdown: bool,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            name: None,
            format: ScreenFormat::Text,
            collapsed: false,
            width: DEFAULT_WIDTH,
            no_docx: false,
            no_markdown: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WrittenReports {
    pub markdown: Option<PathBuf>,
    pub docx: Option<PathBuf>,
}

/// Writes the screen rendering to `screen` and the download documents to
/// `out_dir`.
///
/// A Word document failure is reported after the screen output and the
/// Markdown document are already in place.
pub fn present<W: Write>(
    screen: &mut W,
    command: &str,
    reply: &ParsedReply,
    rendered: RenderedReport,
    default_base_name: &str,
    args: &ReportArgs,
    out_dir: &Path,
) -> Result<WrittenReports> {
    for warning in &reply.warnings {
        eprintln!("{command}: warning {warning}");
    }

    match args.format {
        ScreenFormat::Text => {
            let options = TextOptions {
                width: args.width,
                honor_collapsed: args.collapsed,
            };
            write!(screen, "{}", render_text(&rendered.screen, options))
                .context("failed to write screen output")?;
        }
        ScreenFormat::Json => {
            let payload = json!({ "record": reply.record, "warnings": reply.warnings });
            let encoded =
                serde_json::to_string_pretty(&payload).context("failed to encode report as JSON")?;
            writeln!(screen, "{encoded}").context("failed to write screen output")?;
        }
    }
    screen.flush().context("failed to flush screen output")?;

    let base_name = match args.name.as_deref() {
        Some(name) => sanitize_base_name(name),
        None => default_base_name.to_string(),
    };
    let names = report_file_names(&base_name);
    let mut written = WrittenReports::default();

    if !args.no_markdown {
        let path = out_dir.join(&names.markdown);
        write_artifact(&path, rendered.markdown.as_bytes())?;
        eprintln!("{command}: checkpoint markdown_written {}", path.display());
        written.markdown = Some(path);
    }

    if !args.no_docx {
        let bytes = match rendered.docx {
            Ok(bytes) => bytes,
            Err(error) => {
                eprintln!("{command}: failed docx_written reason={error}");
                return Err(error.into());
            }
        };
        let path = out_dir.join(&names.docx);
        write_artifact(&path, &bytes)?;
        eprintln!("{command}: checkpoint docx_written {}", path.display());
        written.docx = Some(path);
    }

    Ok(written)
}

fn write_artifact(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create report directory {}", parent.display()))?;
    }
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write report {}", path.display()))
}
