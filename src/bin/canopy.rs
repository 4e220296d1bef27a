//! Canopy CLI Binary

use anyhow::Context;
use canopy::config::ConfigLoader;
use canopy::logging::init_logging;
use canopy::tooling::cli::{Cli, CliContext};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load_optional(cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    init_logging(&config.logging).context("Failed to initialize logging")?;

    let context = CliContext::new(config);
    let output = context.execute(&cli.command)?;
    print!("{}", output);
    Ok(())
}
