//! TTL gate between the engine and a storage backend.

use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::model::PlaylistCache;
use super::traits::CacheStorage;
use crate::error::GalleryError;

/// Default time-to-live for a built gallery: one day
pub const DEFAULT_CACHE_LIFE_MS: i64 = 86_400_000;

/// Cache layer that decides whether a persisted gallery may be served.
///
/// Storage problems never escape this layer: an unreadable or corrupt record
/// is reported as a miss, a failed write is logged.
pub struct CacheLayer<S: CacheStorage> {
  storage: Arc<S>,
  /// How long before cached data is considered stale
  cache_life: Duration,
}

impl<S: CacheStorage> CacheLayer<S> {
  /// Create a new cache layer with the given storage backend.
  pub fn new(storage: S) -> Self {
    Self {
      storage: Arc::new(storage),
      cache_life: Duration::milliseconds(DEFAULT_CACHE_LIFE_MS),
    }
  }

  /// Set the time-to-live for cached galleries.
  pub fn with_cache_life(mut self, cache_life: Duration) -> Self {
    self.cache_life = cache_life;
    self
  }

  pub fn storage(&self) -> &S {
    &self.storage
  }

  /// Load the record for `key` if it exists, decodes, was laid out with
  /// `max_results` items per page, and is not stale.
  pub fn load_fresh(&self, key: &str, max_results: usize) -> Option<PlaylistCache> {
    let cached = match self.storage.read(key) {
      Ok(Some(cached)) => cached,
      Ok(None) => {
        info!("Cache for \"{}\" not found... building", key);
        return None;
      }
      Err(GalleryError::CacheCorruption { reason, .. }) => {
        warn!("Cache for \"{}\" is corrupt ({})... rebuilding", key, reason);
        return None;
      }
      Err(e) => {
        warn!("Cache for \"{}\" could not be read ({})... rebuilding", key, e);
        return None;
      }
    };

    if cached.max_results != max_results {
      info!(
        "Cache for \"{}\" uses {} items per page, want {}... rebuilding",
        key, cached.max_results, max_results
      );
      return None;
    }

    if cached.is_stale(Utc::now(), self.cache_life) {
      info!("Cache for \"{}\" is past its lifetime... rebuilding", key);
      return None;
    }

    info!("Cache for \"{}\" is fresh... using cache", key);
    Some(cached)
  }

  /// Persist a finished gallery. Returns whether the write succeeded.
  pub fn store(&self, key: &str, cache: &PlaylistCache) -> bool {
    match self.storage.write(key, cache) {
      Ok(()) => true,
      Err(e) => {
        error!("Failed to persist cache for \"{}\": {}", key, e);
        false
      }
    }
  }
}

impl<S: CacheStorage> Clone for CacheLayer<S> {
  fn clone(&self) -> Self {
    Self {
      storage: Arc::clone(&self.storage),
      cache_life: self.cache_life,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::{test_item, MemoryStorage};
  use crate::youtube::types::PlaylistInfo;

  fn cache_built(ago: Duration, max_results: usize) -> PlaylistCache {
    let mut cache = PlaylistCache::new(PlaylistInfo::default(), max_results, Utc::now() - ago);
    cache.set_total(1);
    cache.merge_batch(vec![test_item("a")], 0);
    cache
  }

  #[test]
  fn test_fresh_record_is_served() {
    let layer = CacheLayer::new(MemoryStorage::new()).with_cache_life(Duration::hours(1));
    layer.store("PL1", &cache_built(Duration::minutes(59), 5));

    assert!(layer.load_fresh("PL1", 5).is_some());
  }

  #[test]
  fn test_stale_record_is_a_miss() {
    let layer = CacheLayer::new(MemoryStorage::new()).with_cache_life(Duration::hours(1));
    layer.store("PL1", &cache_built(Duration::minutes(61), 5));

    assert!(layer.load_fresh("PL1", 5).is_none());
  }

  #[test]
  fn test_page_size_mismatch_is_a_miss() {
    let layer = CacheLayer::new(MemoryStorage::new());
    layer.store("PL1", &cache_built(Duration::zero(), 5));

    assert!(layer.load_fresh("PL1", 10).is_none());
  }

  #[test]
  fn test_corrupt_record_is_a_miss() {
    let layer = CacheLayer::new(MemoryStorage::new());
    layer.storage().insert_raw("PL1", b"\x00garbage");

    assert!(layer.load_fresh("PL1", 5).is_none());
  }
}
