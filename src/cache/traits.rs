//! Core traits and types for the caching system.

use chrono::{DateTime, Utc};

use super::model::PlaylistCache;
use crate::error::Result;

/// Trait for cache storage backends.
///
/// One slot per key; `write` replaces the slot as a whole or leaves the
/// previous value in place.
pub trait CacheStorage: Send + Sync {
  /// Read the record stored under `key`.
  ///
  /// Returns `GalleryError::CacheCorruption` when a record exists but cannot
  /// be decoded.
  fn read(&self, key: &str) -> Result<Option<PlaylistCache>>;

  /// Replace the record stored under `key`.
  fn write(&self, key: &str, cache: &PlaylistCache) -> Result<()>;
}

/// Indicates where the gallery currently being served came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSource {
  /// Built from the network during this session
  Network,
  /// Loaded from a fresh persisted record
  Cache { built_at: DateTime<Utc> },
}
