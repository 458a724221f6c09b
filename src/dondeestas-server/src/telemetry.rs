//! Structured tracing for the service
//!
//! JSON lines go to a size and date rotated file under the configured log
//! directory, a compact human-readable copy goes to stdout.

use anyhow::Result;
use dondeestas_core::LoggingConfig;
use rolling_file::{RollingConditionBasic, RollingFileAppender};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Install the global subscriber.
///
/// The returned guard flushes buffered file output when dropped, keep it
/// alive for the lifetime of the process.
pub fn init_telemetry(logging: &LoggingConfig) -> Result<WorkerGuard> {
    let log_dir = Path::new(&logging.dir);
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(
        log_dir.join(&logging.file_name),
        RollingConditionBasic::new()
            .daily()
            .max_size(logging.max_size_mb * 1024 * 1024),
        logging.max_files,
    )?;
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.filter))?;

    let file_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_span_events(FmtSpan::CLOSE)
        .with_current_span(true)
        .with_thread_ids(true);

    let console_layer = fmt::layer().compact().with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()?;

    tracing::info!(
        dir = %log_dir.display(),
        file = %logging.file_name,
        max_size_mb = logging.max_size_mb,
        max_files = logging.max_files,
        "Logging to file"
    );

    Ok(guard)
}
