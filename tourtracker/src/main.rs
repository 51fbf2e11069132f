mod config;
mod telemetry;

use clap::{Args, Parser};
use config::{Config, ConfigError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about = "Artist list API backed by a JSON file in a GitHub repository")]
enum CliCommand {
    /// Serve the artists API and the admin endpoints
    Run(ConfigArgs),
    /// Load and validate a config file, then exit
    CheckConfig(ConfigArgs),
}

#[derive(Args)]
struct ConfigArgs {
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] telemetry::TelemetryError),
    #[error("could not create content store: {0}")]
    Store(#[from] content_store::StoreError),
    #[error("could not start runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] artists::errors::ArtistsError),
}

fn main() -> Result<(), CliError> {
    match CliCommand::parse() {
        CliCommand::Run(args) => run(args),
        CliCommand::CheckConfig(args) => {
            Config::from_file(&args.config)?;
            println!("{}: ok", args.config.display());
            Ok(())
        }
    }
}

fn run(args: ConfigArgs) -> Result<(), CliError> {
    let config = Config::from_file(&args.config)?;

    let _sentry_guard = telemetry::init_logging(&config.common.logging);
    if let Some(metrics_config) = &config.common.metrics {
        telemetry::init_metrics(metrics_config)?;
    }

    let artists_config = config.artists;
    let store = content_store::build_store(
        &artists_config.content_store,
        &artists_config.file_path,
        |name| std::env::var(name).ok(),
    )?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        tracing::info!("Starting tourtracker");
        tokio::select! {
            result = artists::run(artists_config, store) => result,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                Ok(())
            }
        }
    })?;

    Ok(())
}
