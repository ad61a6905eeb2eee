//! Error taxonomy shared by the upstream client, the cache and the engine.

use std::fmt;

/// Result type alias for gallery operations
pub type Result<T> = std::result::Result<T, GalleryError>;

/// A failure reported by, or while talking to, the YouTube Data API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamFailure {
  /// Machine-readable code (upstream `reason`, HTTP status, or a local code)
  pub code: String,
  /// Human-readable message
  pub message: String,
}

impl UpstreamFailure {
  pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      message: message.into(),
    }
  }

  pub fn network(err: &reqwest::Error) -> Self {
    Self::new("network", err.to_string())
  }

  pub fn decode(err: impl fmt::Display) -> Self {
    Self::new("decode", err.to_string())
  }
}

impl fmt::Display for UpstreamFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Error {}: {}", self.code, self.message)
  }
}

/// Errors that can occur while building or serving a gallery
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
  /// Missing or invalid configuration, raised before any network call
  #[error("Configuration error: {0}")]
  Config(String),

  /// Network-level or upstream-reported failure
  #[error("Upstream failure: {0}")]
  Upstream(UpstreamFailure),

  /// A persisted record could not be parsed
  #[error("Cache entry '{key}' is corrupt: {reason}")]
  CacheCorruption { key: String, reason: String },

  /// The storage backend itself failed
  #[error("Cache storage error: {0}")]
  Storage(String),
}

impl GalleryError {
  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }

  pub fn storage(msg: impl fmt::Display) -> Self {
    Self::Storage(msg.to_string())
  }
}

impl From<UpstreamFailure> for GalleryError {
  fn from(failure: UpstreamFailure) -> Self {
    Self::Upstream(failure)
  }
}

impl From<rusqlite::Error> for GalleryError {
  fn from(err: rusqlite::Error) -> Self {
    Self::Storage(err.to_string())
  }
}
