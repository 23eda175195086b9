//! Tracing subscriber setup
//!
//! One fmt layer filtered by level, in console or JSON format, writing to
//! stdout, stderr or an append-mode file.

use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use appsload_config::{LogConfig, LogFormat, LogLevel, LogOutput};

/// Install the global subscriber
///
/// # Errors
///
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_logging(config: &LogConfig, level: LogLevel) -> Result<()> {
    let filter = EnvFilter::try_new(level.as_str())
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to build log filter")?;

    let (writer, ansi) = make_writer(&config.output)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Console => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(writer))
            .try_init(),
    };
    installed.context("failed to install log subscriber")
}

fn make_writer(output: &LogOutput) -> Result<(BoxMakeWriter, bool)> {
    Ok(match output {
        LogOutput::Stdout => (BoxMakeWriter::new(std::io::stdout), true),
        LogOutput::Stderr => (BoxMakeWriter::new(std::io::stderr), true),
        LogOutput::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {path}"))?;
            (BoxMakeWriter::new(Mutex::new(file)), false)
        }
    })
}
