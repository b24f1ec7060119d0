use std::process::ExitCode;

use ai_translate::cli::{Cli, RunStatus, execute};
use ai_translate::config::Credentials;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match execute(&cli, &Credentials::from_env()).await {
        Ok(RunStatus::Completed(summary)) => {
            info!("Translation finished: {}", summary);
            ExitCode::SUCCESS
        }
        Ok(RunStatus::NoTargets) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
