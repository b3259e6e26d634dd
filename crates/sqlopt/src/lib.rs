#![forbid(unsafe_code)]

pub mod adapter;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod models;
pub mod render;

pub use cli::app::{Cli, Command};
pub use error::{AnalyzerError, ErrorKind};
