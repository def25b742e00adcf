//! Tracing setup for the CLI
//!
//! - Console: colored, compact, to stderr so stdout stays machine-readable
//! - File: daily rotation in `<data_local_dir>/<identifier>/logs/` unless overridden

use extcat_core::branding;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

/// Default logs directory (e.g. ~/.local/share/com.extcat.site/logs on Linux)
pub fn default_logs_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(branding::data_dir_name())
        .join("logs")
}

/// Default filter when RUST_LOG is not set
fn default_filter(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,extcat={level},extcat_core={level}")
}

/// Initialize console + rolling file logging.
///
/// The returned guard flushes the file writer on drop; keep it alive for the
/// whole process. Without a usable log directory, logging goes to the console only.
pub fn init_tracing(logs_dir: Option<PathBuf>, verbose: bool) -> Option<WorkerGuard> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .compact()
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    let logs_dir = logs_dir.unwrap_or_else(default_logs_dir);
    if let Err(e) = std::fs::create_dir_all(&logs_dir) {
        eprintln!("Warning: Failed to create logs directory {}: {}", logs_dir.display(), e);
    }

    // Creates files like: extcat.2026-10-17.log
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(branding::LOG_PREFIX)
        .filename_suffix("log")
        .build(&logs_dir);

    match file_appender {
        Ok(appender) => {
            let (non_blocking_file, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();
            tracing::warn!("File logging disabled: {}", e);
            None
        }
    }
}
