//! Diagnostic logging
//!
//! Stdout carries the rendered table, so log lines never go to the console.
//! Set `TABLE_REVIEW_LOG` to a directory to get a daily-rotated
//! `table-review.log` there; `RUST_LOG` controls the filter:
//! - `RUST_LOG=debug` - every decision and rejected input
//! - `RUST_LOG=table_review::cli::input=debug` - module-level filtering

use std::env;
use std::path::PathBuf;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable naming the log directory
pub const LOG_DIR_ENV: &str = "TABLE_REVIEW_LOG";

/// Directory logs should be written to, if logging is enabled
pub fn log_dir() -> Option<PathBuf> {
    env::var_os(LOG_DIR_ENV)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

/// Initialize the tracing subscriber; a no-op unless a log directory is set
pub fn init() {
    let Some(dir) = log_dir() else {
        return;
    };

    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Warning: Could not initialize file logging: {}", e);
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_appender = tracing_appender::rolling::daily(dir, "table-review.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).init();
}
