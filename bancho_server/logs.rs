use anyhow::Context;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bancho_app::config::Config;

/// Logs to stdout and to `<log_dir>/<log_file>.<date>.log`, rotated daily.
///
/// `RUST_LOG` wins over `Config::log_filter`. Hold the returned guard until
/// shutdown, dropping it flushes the file writer.
pub fn setup_logging(config: &Config) -> anyhow::Result<WorkerGuard> {
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(&config.log_file)
        .filename_suffix("log")
        .build(&config.log_dir)
        .with_context(|| format!("Failed to open log directory {}", config.log_dir))?;
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .with_context(|| format!("Invalid log filter '{}'", config.log_filter))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_target(true),
        )
        .with(fmt::layer().with_writer(std::io::stdout).with_target(true))
        .try_init()
        .context("Failed to install the log subscriber")?;

    Ok(guard)
}
