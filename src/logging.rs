use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "YTGALLERY_LOG";

/// Directory for the daily log files: $XDG_DATA_HOME/ytgallery/logs
pub fn log_dir() -> PathBuf {
  dirs::data_dir()
    .map(|d| d.join("ytgallery").join("logs"))
    .unwrap_or_else(|| std::env::temp_dir().join("ytgallery").join("logs"))
}

/// Send tracing output to a daily rolling file; the terminal belongs to the UI.
///
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init() -> Result<WorkerGuard> {
  let dir = log_dir();
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let file_appender = tracing_appender::rolling::daily(&dir, "ytgallery.log");
  let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

  tracing_subscriber::fmt()
    .with_writer(non_blocking)
    .with_env_filter(filter)
    .with_ansi(false)
    .with_target(false)
    .try_init()
    .map_err(|e| eyre!("Failed to install log subscriber: {}", e))?;

  tracing::info!("ytgallery v{} starting", env!("CARGO_PKG_VERSION"));
  Ok(guard)
}
