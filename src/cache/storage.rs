//! Cache storage backends: SQLite on disk and an in-process map.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::model::PlaylistCache;
use super::traits::CacheStorage;
use crate::error::{GalleryError, Result};

/// Decode a persisted record, mapping parse failures to corruption.
fn decode(key: &str, data: &[u8]) -> Result<PlaylistCache> {
  serde_json::from_slice(data).map_err(|e| GalleryError::CacheCorruption {
    key: key.to_string(),
    reason: e.to_string(),
  })
}

fn encode(cache: &PlaylistCache) -> Result<Vec<u8>> {
  serde_json::to_vec(cache).map_err(|e| GalleryError::storage(format!("Failed to serialize cache: {}", e)))
}

/// Storage that lives only as long as the process.
/// Used with `--no-cache` and in tests.
#[derive(Default)]
pub struct MemoryStorage {
  slots: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }

  /// Put raw bytes in a slot, bypassing serialization.
  #[cfg(test)]
  pub fn insert_raw(&self, key: &str, data: &[u8]) {
    if let Ok(mut slots) = self.slots.lock() {
      slots.insert(key.to_string(), data.to_vec());
    }
  }

  /// Number of occupied slots.
  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.slots.lock().map(|s| s.len()).unwrap_or(0)
  }
}

impl CacheStorage for MemoryStorage {
  fn read(&self, key: &str) -> Result<Option<PlaylistCache>> {
    let slots = self
      .slots
      .lock()
      .map_err(|e| GalleryError::storage(format!("Lock poisoned: {}", e)))?;

    slots.get(key).map(|data| decode(key, data)).transpose()
  }

  fn write(&self, key: &str, cache: &PlaylistCache) -> Result<()> {
    let data = encode(cache)?;
    let mut slots = self
      .slots
      .lock()
      .map_err(|e| GalleryError::storage(format!("Lock poisoned: {}", e)))?;

    slots.insert(key.to_string(), data);
    Ok(())
  }
}

/// SQLite-based cache storage implementation.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open the cache at `path`, or at the default location.
  pub fn open(path: Option<&Path>) -> Result<Self> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::default_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| GalleryError::storage(format!("Failed to create cache directory: {}", e)))?;
    }

    let conn = Connection::open(&path).map_err(|e| {
      GalleryError::storage(format!(
        "Failed to open cache database at {}: {}",
        path.display(),
        e
      ))
    })?;

    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;

    Ok(storage)
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| GalleryError::storage("Could not determine data directory"))?;

    Ok(data_dir.join("ytgallery").join("cache.db"))
  }

  /// Run database migrations for cache tables.
  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| GalleryError::storage(format!("Lock poisoned: {}", e)))?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| GalleryError::storage(format!("Failed to run cache migrations: {}", e)))?;

    Ok(())
  }
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
-- One serialized gallery per playlist
CREATE TABLE IF NOT EXISTS playlist_cache (
    cache_key TEXT PRIMARY KEY,
    data BLOB NOT NULL,
    built_at TEXT NOT NULL,
    stored_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl CacheStorage for SqliteStorage {
  fn read(&self, key: &str) -> Result<Option<PlaylistCache>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| GalleryError::storage(format!("Lock poisoned: {}", e)))?;

    let data: Option<Vec<u8>> = conn
      .query_row(
        "SELECT data FROM playlist_cache WHERE cache_key = ?",
        params![key],
        |row| row.get(0),
      )
      .optional()?;

    data.map(|d| decode(key, &d)).transpose()
  }

  fn write(&self, key: &str, cache: &PlaylistCache) -> Result<()> {
    let data = encode(cache)?;
    let conn = self
      .conn
      .lock()
      .map_err(|e| GalleryError::storage(format!("Lock poisoned: {}", e)))?;

    // A single statement replaces the row atomically
    conn
      .execute(
        "INSERT OR REPLACE INTO playlist_cache (cache_key, data, built_at, stored_at)
         VALUES (?, ?, ?, datetime('now'))",
        params![key, data, cache.built_at.to_rfc3339()],
      )
      .map_err(|e| GalleryError::storage(format!("Failed to store cache: {}", e)))?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::test_item;
  use crate::youtube::types::PlaylistInfo;
  use chrono::Utc;

  fn sample_cache() -> PlaylistCache {
    let info = PlaylistInfo {
      id: "PL1".to_string(),
      title: "Concerts".to_string(),
      ..Default::default()
    };
    let mut cache = PlaylistCache::new(info, 2, Utc::now());
    cache.set_total(3);
    cache.merge_batch(vec![test_item("a"), test_item("b"), test_item("c")], 0);
    cache
  }

  #[test]
  fn test_sqlite_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SqliteStorage::open(Some(dir.path().join("cache.db").as_path())).unwrap();

    assert!(storage.read("PL1").unwrap().is_none());

    let cache = sample_cache();
    storage.write("PL1", &cache).unwrap();
    assert_eq!(storage.read("PL1").unwrap(), Some(cache));
  }

  #[test]
  fn test_sqlite_write_replaces_whole_record() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SqliteStorage::open(Some(dir.path().join("cache.db").as_path())).unwrap();

    storage.write("PL1", &sample_cache()).unwrap();

    let mut smaller = PlaylistCache::new(PlaylistInfo::default(), 2, Utc::now());
    smaller.set_total(1);
    smaller.merge_batch(vec![test_item("z")], 0);
    storage.write("PL1", &smaller).unwrap();

    let read = storage.read("PL1").unwrap().unwrap();
    assert_eq!(read.fetched_count(), 1);
    assert_eq!(read.pages[0][0].id, "z");
  }

  #[test]
  fn test_sqlite_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");

    SqliteStorage::open(Some(path.as_path()))
      .unwrap()
      .write("PL1", &sample_cache())
      .unwrap();

    let reopened = SqliteStorage::open(Some(path.as_path())).unwrap();
    assert!(reopened.read("PL1").unwrap().is_some());
  }

  #[test]
  fn test_sqlite_corrupt_record() {
    let dir = tempfile::tempdir().unwrap();
    let storage = SqliteStorage::open(Some(dir.path().join("cache.db").as_path())).unwrap();

    {
      let conn = storage.conn.lock().unwrap();
      conn
        .execute(
          "INSERT INTO playlist_cache (cache_key, data, built_at) VALUES ('PL1', ?, 'x')",
          params![b"{not json".to_vec()],
        )
        .unwrap();
    }

    let result = storage.read("PL1");
    assert!(matches!(result, Err(GalleryError::CacheCorruption { .. })));
  }

  #[test]
  fn test_memory_storage_keys_are_independent() {
    let storage = MemoryStorage::new();
    storage.write("PL1", &sample_cache()).unwrap();

    assert!(storage.read("PL1").unwrap().is_some());
    assert!(storage.read("PL2").unwrap().is_none());
    assert_eq!(storage.len(), 1);
  }
}
