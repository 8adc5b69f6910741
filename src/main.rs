use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use repricer::application::{Cli, CommandExecutor};
use repricer::config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: --log-level > RUST_LOG > info
    let filter = match &cli.log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Priority: CLI args > Config file > Defaults
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = data_dir;
    }

    CommandExecutor::execute(cli.command, config)?;
    Ok(())
}
