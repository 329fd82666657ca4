//! Logging setup
//!
//! Two sinks: a log file (text or JSON, rotated per [`Rotation`]) behind a
//! non-blocking writer, and a human-readable stdout layer. The returned
//! guard must live for the whole process or buffered lines are dropped on
//! shutdown.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

use crate::config::{LogConfig, Rotation};

pub fn init_logging(config: &LogConfig) -> WorkerGuard {
    let appender = match config.rotation {
        Rotation::Hourly => tracing_appender::rolling::hourly(&config.dir, &config.file),
        Rotation::Daily => tracing_appender::rolling::daily(&config.dir, &config.file),
        Rotation::Never => tracing_appender::rolling::never(&config.dir, &config.file),
    };
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    // JSON file output keeps transfer audit fields (transaction_id, parties,
    // amount) queryable; targets are retained there for that reason.
    let file_layer = if config.json {
        fmt::layer()
            .json()
            .with_target(true)
            .with_writer(writer)
            .with_ansi(false)
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(writer)
            .with_ansi(false)
            .boxed()
    };

    let stdout_layer = fmt::layer().with_target(false).with_ansi(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}
