#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind as ClapErrorKind;
use sqlopt::cli::app::{Cli, Command, RuntimeArgs};
use sqlopt::cli::commands;
use sqlopt::config::RuntimePaths;
use sqlopt::{AnalyzerError, ErrorKind};
use tracing_subscriber::EnvFilter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME_FAILURE: i32 = 1;
const EXIT_INPUT_ERROR: i32 = 2;
const EXIT_CONFIG_ERROR: i32 = 3;
const EXIT_PARSE_ERROR: i32 = 4;
const EXIT_USAGE_ERROR: i32 = 64;

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return exit_code_for_parse_error(error),
    };
    init_logging(cli.runtime.verbose);
    let command_name = command_name(&cli.command);
    tracing::debug!(command = command_name, "starting");

    match execute(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(error) => {
            let exit_code = classify_runtime_error(&error);
            eprintln!("sqlopt: failed `{command_name}` (exit_code={exit_code})");
            eprintln!("{error:#}");
            exit_code
        }
    }
}

fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Analyze(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::analyze::run(&args, &runtime_paths)
        }
        Command::Render(args) => {
            let runtime_paths = resolve_runtime_paths(&cli.runtime)?;
            commands::render::run(&args, &runtime_paths)
        }
        Command::Schema(args) => commands::schema::run(&args),
        Command::Sample(args) => commands::sample::run(&args),
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn classify_runtime_error(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<AnalyzerError>().map(AnalyzerError::kind) {
        Some(ErrorKind::Configuration) => EXIT_CONFIG_ERROR,
        Some(ErrorKind::Input) => EXIT_INPUT_ERROR,
        Some(ErrorKind::Parse) => EXIT_PARSE_ERROR,
        Some(ErrorKind::Remote | ErrorKind::Document) | None => EXIT_RUNTIME_FAILURE,
    }
}

fn exit_code_for_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
            let _ = error.print();
            EXIT_SUCCESS
        }
        _ => {
            let _ = error.print();
            EXIT_USAGE_ERROR
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Analyze(_) => "analyze",
        Command::Render(_) => "render",
        Command::Schema(_) => "schema",
        Command::Sample(_) => "sample",
    }
}

fn resolve_runtime_paths(args: &RuntimeArgs) -> Result<RuntimePaths> {
    let home_dir = match &args.home_dir {
        Some(path) => path.clone(),
        None => std::env::var_os("HOME")
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("HOME is not set; pass --home-dir"))?,
    };

    let cwd = match &args.cwd {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };

    sqlopt::config::resolve_runtime_paths(
        &home_dir,
        &cwd,
        args.out_dir.as_deref(),
        args.secrets.as_deref(),
    )
}
