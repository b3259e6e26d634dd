use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use super::commands::{
    analyze::AnalyzeArgs, render::RenderArgs, sample::SampleArgs, schema::SchemaArgs,
};

#[derive(Debug, Parser)]
#[command(
    name = "sqlopt",
    version,
    about = "Stored procedure optimization reports from a hosted language model"
)]
pub struct Cli {
    #[command(flatten)]
    pub runtime: RuntimeArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Args)]
pub struct RuntimeArgs {
    #[arg(long, global = true, value_name = "PATH")]
    pub home_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub cwd: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub out_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "PATH")]
    pub secrets: Option<PathBuf>,

    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Analyze(AnalyzeArgs),
    Render(RenderArgs),
    Schema(SchemaArgs),
    Sample(SampleArgs),
}
