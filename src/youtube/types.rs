use serde::{Deserialize, Serialize};

/// Raw detail record consumed by the normalizer
pub type RawVideoRecord = super::api_types::ApiVideo;

/// Playlist metadata, fetched once per build and embedded in the cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistInfo {
  pub id: String,
  pub title: String,
  pub description: String,
  pub channel_title: String,
  pub published_at: String,
}

/// One playlist entry, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoItem {
  pub id: String,
  pub title: String,
  pub description: String,
  /// Resolved display date, e.g. "December 25, 2021"
  pub date: String,
  pub thumbnail_url: String,
  /// "H:MM:SS", "M:SS", "LIVE" or "UPCOMING"
  pub duration: String,
  /// Comma-grouped view count
  pub views_display: String,
}

impl VideoItem {
  pub fn watch_url(&self) -> String {
    format!("https://www.youtube.com/watch?v={}", self.id)
  }

  /// Case-insensitive substring match on title or date.
  /// `needle` must already be lowercased.
  pub fn matches(&self, needle: &str) -> bool {
    self.title.to_lowercase().contains(needle) || self.date.to_lowercase().contains(needle)
  }
}

/// One response page of the listing endpoint, private entries removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
  pub video_ids: Vec<String>,
  pub next_page_token: Option<String>,
}
