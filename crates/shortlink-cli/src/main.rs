mod cli;
mod commands;
mod logging;
mod report;

use crate::cli::CLI;
use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tracing::info;

#[tokio::main]
async fn main() -> ExitCode {
    let config = CLI::parse();

    if let Err(err) = logging::init(config.environment) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report::report(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: CLI) -> anyhow::Result<()> {
    info!(
        environment = %config.environment,
        storage_backend = %config.storage,
        "starting shortlink"
    );

    let storage_config = config.storage_config()?;
    let storage = shortlink_storage::connect(&storage_config)
        .await
        .context("failed to init storage")?;

    let stdout = std::io::stdout();
    commands::execute(&*storage, config.command, &mut stdout.lock()).await
}
