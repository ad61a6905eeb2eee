//! Serde-deserializable types matching YouTube Data API v3 responses.
//!
//! These types are separate from domain types so that deserialization can
//! follow the wire format while the rest of the app works with display-ready
//! values.

use serde::{Deserialize, Serialize};

// ============================================================================
// playlistItems endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlaylistItemsResponse {
  #[serde(default)]
  pub items: Vec<ApiPlaylistItem>,
  pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPlaylistItem {
  pub snippet: ApiPlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlaylistItemSnippet {
  #[serde(default)]
  pub title: String,
  pub resource_id: ApiResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResourceId {
  pub video_id: String,
}

// ============================================================================
// videos endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiVideosResponse {
  #[serde(default)]
  pub items: Vec<ApiVideo>,
}

/// One video resource as returned by the detail endpoint.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVideo {
  pub id: String,
  #[serde(default)]
  pub snippet: ApiVideoSnippet,
  pub content_details: Option<ApiContentDetails>,
  pub statistics: Option<ApiStatistics>,
  pub recording_details: Option<ApiRecordingDetails>,
  pub live_streaming_details: Option<ApiLiveStreamingDetails>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVideoSnippet {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub published_at: String,
  #[serde(default)]
  pub thumbnails: ApiThumbnails,
  /// "live", "upcoming" or "none"
  pub live_broadcast_content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiThumbnails {
  pub default: Option<ApiThumbnail>,
  pub medium: Option<ApiThumbnail>,
  pub high: Option<ApiThumbnail>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiThumbnail {
  pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiContentDetails {
  #[serde(default)]
  pub duration: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatistics {
  // The API encodes counts as strings and omits them when hidden
  pub view_count: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRecordingDetails {
  pub recording_date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiLiveStreamingDetails {
  pub actual_start_time: Option<String>,
  pub scheduled_start_time: Option<String>,
}

// ============================================================================
// playlists endpoint
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiPlaylistsResponse {
  #[serde(default)]
  pub items: Vec<ApiPlaylist>,
}

#[derive(Debug, Deserialize)]
pub struct ApiPlaylist {
  pub id: String,
  #[serde(default)]
  pub snippet: ApiPlaylistSnippet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPlaylistSnippet {
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub channel_title: String,
  #[serde(default)]
  pub published_at: String,
}

// ============================================================================
// Error envelope
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
  pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
  #[serde(default)]
  pub code: u16,
  #[serde(default)]
  pub message: String,
  #[serde(default)]
  pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
  #[serde(default)]
  pub reason: String,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

use super::types::PlaylistInfo;

impl From<ApiPlaylist> for PlaylistInfo {
  fn from(api: ApiPlaylist) -> Self {
    PlaylistInfo {
      id: api.id,
      title: api.snippet.title,
      description: api.snippet.description,
      channel_title: api.snippet.channel_title,
      published_at: api.snippet.published_at,
    }
  }
}

impl ApiErrorBody {
  /// Prefer the first specific reason over the bare HTTP code.
  pub fn machine_code(&self) -> String {
    self
      .errors
      .iter()
      .map(|e| e.reason.as_str())
      .find(|r| !r.is_empty())
      .map(String::from)
      .unwrap_or_else(|| self.code.to_string())
  }
}
