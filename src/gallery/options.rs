use chrono::Duration;

use crate::cache::DEFAULT_CACHE_LIFE_MS;
use crate::error::{GalleryError, Result};

/// Default display page size
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Options the engine needs; layout hints live with the UI.
#[derive(Debug, Clone)]
pub struct GalleryOptions {
  pub playlist_id: String,
  /// Display page size
  pub max_results: usize,
  pub search_enabled: bool,
  /// Time-to-live of a persisted gallery
  pub cache_life: Duration,
}

impl GalleryOptions {
  pub fn new(playlist_id: impl Into<String>) -> Self {
    Self {
      playlist_id: playlist_id.into(),
      max_results: DEFAULT_MAX_RESULTS,
      search_enabled: true,
      cache_life: Duration::milliseconds(DEFAULT_CACHE_LIFE_MS),
    }
  }

  /// Reject options that would make any network call pointless.
  pub fn validate(&self) -> Result<()> {
    if self.playlist_id.trim().is_empty() {
      return Err(GalleryError::config("No playlist ID set"));
    }
    if self.max_results == 0 {
      return Err(GalleryError::config("max_results must be at least 1"));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let options = GalleryOptions::new("PL1");
    assert_eq!(options.max_results, 5);
    assert!(options.search_enabled);
    assert_eq!(options.cache_life, Duration::hours(24));
    assert!(options.validate().is_ok());
  }

  #[test]
  fn test_missing_playlist_rejected() {
    assert!(matches!(
      GalleryOptions::new("").validate(),
      Err(GalleryError::Config(_))
    ));
  }

  #[test]
  fn test_zero_page_size_rejected() {
    let mut options = GalleryOptions::new("PL1");
    options.max_results = 0;
    assert!(options.validate().is_err());
  }
}
