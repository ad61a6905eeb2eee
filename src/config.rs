use chrono::Duration;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::cache::DEFAULT_CACHE_LIFE_MS;
use crate::gallery::{GalleryOptions, DEFAULT_MAX_RESULTS};
use crate::youtube::client::{DEFAULT_API_BASE, DEFAULT_REQUEST_TIMEOUT_SECS};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  pub playlist_id: Option<String>,
  /// Custom title for header (defaults to the playlist title)
  pub title: Option<String>,
  #[serde(default)]
  pub youtube: YoutubeConfig,
  #[serde(default)]
  pub gallery: GalleryConfig,
  #[serde(default)]
  pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
  pub api_base: String,
  pub request_timeout_secs: u64,
}

impl Default for YoutubeConfig {
  fn default() -> Self {
    Self {
      api_base: DEFAULT_API_BASE.to_string(),
      request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
  /// Cards per row in the grid
  pub num_columns: usize,
  pub max_results: usize,
  /// Unset means enabled
  pub search_enabled: Option<bool>,
  pub cache_life_ms: i64,
}

impl Default for GalleryConfig {
  fn default() -> Self {
    Self {
      num_columns: 3,
      max_results: DEFAULT_MAX_RESULTS,
      search_enabled: None,
      cache_life_ms: DEFAULT_CACHE_LIFE_MS,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheConfig {
  /// SQLite file (defaults to $XDG_DATA_HOME/ytgallery/cache.db)
  pub path: Option<PathBuf>,
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./ytgallery.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/ytgallery/config.yaml
  ///
  /// With no file found the defaults are used; the playlist can still come
  /// from the command line.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Ok(Self::default()),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("ytgallery.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("ytgallery").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    // An empty file deserializes to unit, not to a mapping
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Get the YouTube Data API key from environment variables.
  ///
  /// Checks YTGALLERY_API_KEY first, then YOUTUBE_API_KEY as fallback.
  pub fn get_api_key() -> Result<String> {
    std::env::var("YTGALLERY_API_KEY")
      .or_else(|_| std::env::var("YOUTUBE_API_KEY"))
      .map_err(|_| {
        eyre!("YouTube API key not found. Set YTGALLERY_API_KEY or YOUTUBE_API_KEY environment variable.")
      })
  }

  /// Engine options for the configured playlist, not yet validated.
  pub fn gallery_options(&self) -> GalleryOptions {
    let mut options = GalleryOptions::new(self.playlist_id.clone().unwrap_or_default());
    options.max_results = self.gallery.max_results;
    options.search_enabled = self.gallery.search_enabled.unwrap_or(true);
    options.cache_life = Duration::milliseconds(self.gallery.cache_life_ms);
    options
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn test_full_config() {
    let config = Config::parse(
      r#"
playlist_id: PLabc
title: Talks
youtube:
  api_base: http://localhost:9000/v3
  request_timeout_secs: 5
gallery:
  num_columns: 4
  max_results: 8
  search_enabled: false
  cache_life_ms: 60000
cache:
  path: /tmp/yt.db
"#,
    )
    .unwrap();

    assert_eq!(config.playlist_id.as_deref(), Some("PLabc"));
    assert_eq!(config.title.as_deref(), Some("Talks"));
    assert_eq!(config.youtube.api_base, "http://localhost:9000/v3");
    assert_eq!(config.youtube.request_timeout_secs, 5);
    assert_eq!(config.gallery.num_columns, 4);
    assert_eq!(config.cache.path, Some(PathBuf::from("/tmp/yt.db")));

    let options = config.gallery_options();
    assert_eq!(options.playlist_id, "PLabc");
    assert_eq!(options.max_results, 8);
    assert!(!options.search_enabled);
    assert_eq!(options.cache_life, Duration::seconds(60));
  }

  #[test]
  fn test_defaults_fill_missing_sections() {
    let config = Config::parse("playlist_id: PLabc\ngallery:\n  max_results: 2\n").unwrap();

    assert_eq!(config.youtube.api_base, DEFAULT_API_BASE);
    assert_eq!(config.youtube.request_timeout_secs, 30);
    assert_eq!(config.gallery.num_columns, 3);
    assert_eq!(config.gallery.cache_life_ms, 86_400_000);

    let options = config.gallery_options();
    assert_eq!(options.max_results, 2);
    assert!(options.search_enabled);
  }

  #[test]
  fn test_empty_file_is_default() {
    let config = Config::parse("").unwrap();
    assert!(config.playlist_id.is_none());
    assert!(config.gallery_options().validate().is_err());
  }

  #[test]
  fn test_load_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "playlist_id: PLfile").unwrap();

    let config = Config::load(Some(file.path())).unwrap();
    assert_eq!(config.playlist_id.as_deref(), Some("PLfile"));
  }

  #[test]
  fn test_load_missing_explicit_path_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load(Some(dir.path().join("nope.yaml").as_path())).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
  }

  #[test]
  fn test_bad_yaml_names_the_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "gallery: [not, a, map]").unwrap();

    let err = Config::load(Some(file.path())).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
  }
}
