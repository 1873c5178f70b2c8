//! Logging infrastructure for the Redraft CLI.
//!
//! This module initializes the tracing subscriber for structured logging.
//! Diagnostics are emitted to stderr and appended to a persistent log file;
//! stdout stays clean for data output (the rewritten path or the
//! pull-request URL).

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{AppError, AppResult};

/// Initialize the tracing subscriber.
///
/// This sets up structured logging with:
/// - Output to stderr (stdout is reserved for data)
/// - An append-only log file under `log_dir`, when provided
/// - Environment-based filtering (RUST_LOG or provided level)
/// - Optional ANSI color control
///
/// Returns the appender worker guard when a file sink is active; the guard
/// must be kept alive for the duration of the invocation or buffered lines
/// are lost on exit.
///
/// # Arguments
/// * `log_level` - Optional log level override (e.g., "debug", "info")
/// * `no_color` - Disable colored output
/// * `log_dir` - Directory for the persistent `redraft.log` file
pub fn init_logging(
    log_level: Option<&str>,
    no_color: bool,
    log_dir: Option<&Path>,
) -> AppResult<Option<WorkerGuard>> {
    // Determine the filter level
    let default_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let filter_str = log_level.unwrap_or(&default_level);

    let env_filter = EnvFilter::try_new(filter_str)
        .map_err(|e| AppError::Config(format!("Invalid log filter: {}", e)))?;

    // Configure console layer with color control
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(!no_color && supports_color());

    let registry = tracing_subscriber::registry().with(env_filter).with(fmt_layer);

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::Config(format!("Failed to create log directory: {}", e)))?;

        let appender = tracing_appender::rolling::never(dir, "redraft.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_level(true)
            .with_ansi(false);

        registry
            .with(file_layer)
            .try_init()
            .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

        Ok(Some(guard))
    } else {
        registry
            .try_init()
            .map_err(|e| AppError::Config(format!("Failed to init logging: {}", e)))?;

        Ok(None)
    }
}

/// Check if the terminal supports color output.
fn supports_color() -> bool {
    // Honor the NO_COLOR convention
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    true
}
