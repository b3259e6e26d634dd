use anyhow::Result;
use clap::Args;

#[derive(Debug, Clone, Args)]
pub struct SampleArgs {}

pub fn run(_args: &SampleArgs) -> Result<()> {
    print!("{}", crate::input::SAMPLE_PROCEDURE);
    Ok(())
}
