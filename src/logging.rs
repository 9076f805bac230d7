//! File logging. The terminal belongs to the TUI, so nothing is written to
//! stdout or stderr once the screen is up.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, default_log_dir};

/// Environment variable that overrides the configured filter.
pub const LOG_ENV: &str = "SEGUE_LOG";
pub const LOG_FILE: &str = "segue.log";

/// Filter from `SEGUE_LOG`, else the configured level.
fn filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn log_dir(settings: &LoggingSettings) -> Option<PathBuf> {
    settings.directory.clone().or_else(default_log_dir)
}

/// Install the global subscriber writing to `<dir>/segue.log`.
///
/// The returned guard flushes the writer on drop and must be held until exit.
/// Returns `None` when logging is disabled or no directory is usable.
pub fn init(settings: &LoggingSettings) -> Option<WorkerGuard> {
    if !settings.enabled {
        return None;
    }
    let dir = log_dir(settings)?;
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("segue: cannot create log directory {}: {e}", dir.display());
        return None;
    }

    let appender = tracing_appender::rolling::never(&dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .with_env_filter(filter(settings))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("segue: logging disabled: {e}");
        return None;
    }
    Some(guard)
}
