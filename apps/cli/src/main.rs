mod cli;
mod commands;

use anyhow::Context;
use candor::Candor;
use candor::domain::config::LoggingConfig;
use candor::kernel::config::load_core_config;
use candor_logger::{LevelFilter, Logger, LoggerError, parse_level};
use clap::Parser;
use cli::{Cli, Command};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg =
        load_core_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;

    let level = parse_level(cli.log_level.as_deref().unwrap_or(&cfg.logging.level))?;
    let _log = init_logger(&cfg.logging, level)?;

    let core = Candor::open(&cfg).await?;

    let mut out = std::io::stdout().lock();
    match cli.command {
        Command::Profile(command) => commands::profile(&core, command, &mut out).await,
        Command::Cache(command) => commands::cache(&core, command, &mut out).await,
    }
}

fn init_logger(cfg: &LoggingConfig, level: LevelFilter) -> Result<Logger, LoggerError> {
    let builder = Logger::builder().name(env!("CARGO_PKG_NAME")).console(true).level(level);
    match &cfg.directory {
        Some(dir) => builder.path(dir).json(cfg.json).init(),
        None => builder.init(),
    }
}
