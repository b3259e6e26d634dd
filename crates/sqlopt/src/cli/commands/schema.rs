use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct SchemaArgs {
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

pub fn write_schema_artifact(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("failed to create schema artifact directory")?;
    }
    let encoded = serde_json::to_vec_pretty(&crate::models::json_schema())
        .context("failed to encode analysis schema json")?;
    std::fs::write(path, encoded).context("failed to write analysis schema artifact")
}

pub fn run(args: &SchemaArgs) -> Result<()> {
    match &args.out {
        Some(path) => {
            write_schema_artifact(path)?;
            eprintln!("schema: checkpoint schema_written {}", path.display());
        }
        None => println!(
            "{}",
            serde_json::to_string_pretty(&crate::models::json_schema())
                .context("failed to encode analysis schema json")?
        ),
    }
    Ok(())
}
