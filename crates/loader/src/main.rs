//! Appsload - installed-apps batch loader
//!
//! Usage:
//!   appsload                           # load files matching the default pattern
//!   appsload --pattern '/data/*.gz'    # custom input pattern
//!   appsload --dry                     # log intended writes, send nothing
//!   appsload -t                        # run the self-check and exit

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use appsload::cli::Cli;
use appsload::{cmd, logging};
use appsload_config::{LogConfig, LogLevel};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            // Config is unusable, so log with defaults
            let _ = logging::init_logging(&LogConfig::default(), LogLevel::Info);
            error!(error = %format!("{e:#}"), "failed to start");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = logging::init_logging(&config.log, cli.log_level(&config)) {
        eprintln!("appsload: {e:#}");
        return ExitCode::FAILURE;
    }

    let result = if cli.test {
        cmd::selftest::run()
    } else {
        cmd::run::run(&config).await.map(|_| ())
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "unexpected error");
            ExitCode::FAILURE
        }
    }
}
