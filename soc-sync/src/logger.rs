//! Logging Infrastructure
//!
//! Every job logs to stdout and to a per-job file under the log directory
//! (e.g. `log/employee_import.log`). Files are appended to, never rotated.

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, prelude::*};

use crate::config::LogSettings;

/// Initialize console + file logging
///
/// # Arguments
/// * `settings` - level, format and directory
/// * `file_name` - log file inside `settings.dir` (e.g. `"company_import.log"`)
pub fn init_logger(settings: &LogSettings, file_name: &str) -> anyhow::Result<()> {
    let log_dir = Path::new(&settings.dir);
    fs::create_dir_all(log_dir)?;

    let env_filter =
        EnvFilter::try_new(&settings.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let file_log = RollingFileAppender::new(Rotation::NEVER, log_dir, file_name);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if settings.json {
        let console_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true);
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_thread_ids(true)
            .with_writer(std::sync::Mutex::new(file_log));

        subscriber
            .with(console_layer)
            .with(file_layer)
            .try_init()?;
    } else {
        let console_layer = fmt::layer().with_target(false).with_thread_ids(false);
        let file_layer = fmt::layer()
            .with_target(false)
            .with_thread_ids(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file_log));

        subscriber
            .with(console_layer)
            .with(file_layer)
            .try_init()?;
    }

    Ok(())
}
