use crate::error::{GalleryError, UpstreamFailure};
use crate::youtube::api_types::{
  ApiErrorResponse, ApiPlaylistItemsResponse, ApiPlaylistsResponse, ApiVideosResponse,
};
use crate::youtube::types::{ListingPage, PlaylistInfo, RawVideoRecord};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Default YouTube Data API base URL
pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

/// Default timeout for a single API request
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Upstream limit on ids per videos request (and items per listing page)
pub const MAX_IDS_PER_REQUEST: usize = 50;

/// Titles the API substitutes for entries the viewer cannot watch
const UNAVAILABLE_TITLES: &[&str] = &["Private video", "Deleted video"];

const DETAIL_PARTS: &str = "snippet,contentDetails,statistics,recordingDetails,liveStreamingDetails";

/// The upstream side of the gallery: a paginated listing, a batched detail
/// lookup and a playlist metadata lookup.
#[async_trait]
pub trait PlaylistSource: Send + Sync {
  /// Fetch one page of playlist membership. Private and deleted entries are
  /// skipped.
  async fn list_playlist_items(
    &self,
    playlist_id: &str,
    page_token: Option<&str>,
  ) -> Result<ListingPage, UpstreamFailure>;

  /// Fetch details for at most [`MAX_IDS_PER_REQUEST`] videos.
  async fn fetch_video_details(
    &self,
    ids: &[String],
  ) -> Result<Vec<RawVideoRecord>, UpstreamFailure>;

  /// Fetch playlist metadata.
  async fn fetch_playlist_info(&self, playlist_id: &str) -> Result<PlaylistInfo, UpstreamFailure>;
}

/// YouTube Data API v3 client
#[derive(Clone)]
pub struct YoutubeClient {
  http: reqwest::Client,
  api_base: String,
  api_key: String,
}

impl YoutubeClient {
  pub fn new(api_key: &str, api_base: &str, timeout: Duration) -> Result<Self, GalleryError> {
    if api_key.trim().is_empty() {
      return Err(GalleryError::config("No API key set"));
    }

    let http = reqwest::Client::builder()
      .timeout(timeout)
      .user_agent(concat!("ytgallery/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| GalleryError::config(format!("Failed to create HTTP client: {}", e)))?;

    Ok(Self {
      http,
      api_base: api_base.trim_end_matches('/').to_string(),
      api_key: api_key.to_string(),
    })
  }

  /// GET `{api_base}/{resource}` with the API key appended and decode the body.
  async fn get<T: DeserializeOwned>(
    &self,
    resource: &str,
    params: &[(&str, &str)],
  ) -> Result<T, UpstreamFailure> {
    let endpoint = format!("{}/{}", self.api_base, resource);
    let url = Url::parse_with_params(
      &endpoint,
      params
        .iter()
        .copied()
        .chain(std::iter::once(("key", self.api_key.as_str()))),
    )
    .map_err(|e| UpstreamFailure::new("invalidUrl", format!("{}: {}", endpoint, e)))?;

    debug!(resource, "GET {}", endpoint);

    let response = self
      .http
      .get(url)
      .send()
      .await
      .map_err(|e| UpstreamFailure::network(&e))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| UpstreamFailure::network(&e))?;

    // The API reports failures in an error envelope; trust it over the status line
    if let Ok(envelope) = serde_json::from_str::<ApiErrorResponse>(&body) {
      return Err(UpstreamFailure::new(
        envelope.error.machine_code(),
        envelope.error.message,
      ));
    }

    if !status.is_success() {
      return Err(UpstreamFailure::new(
        status.as_u16().to_string(),
        status.canonical_reason().unwrap_or("Request failed"),
      ));
    }

    serde_json::from_str(&body).map_err(UpstreamFailure::decode)
  }
}

#[async_trait]
impl PlaylistSource for YoutubeClient {
  async fn list_playlist_items(
    &self,
    playlist_id: &str,
    page_token: Option<&str>,
  ) -> Result<ListingPage, UpstreamFailure> {
    let max_results = MAX_IDS_PER_REQUEST.to_string();
    let response: ApiPlaylistItemsResponse = self
      .get(
        "playlistItems",
        &[
          ("playlistId", playlist_id),
          ("part", "snippet"),
          ("maxResults", max_results.as_str()),
          ("pageToken", page_token.unwrap_or_default()),
        ],
      )
      .await?;

    let mut video_ids = Vec::with_capacity(response.items.len());
    for item in response.items {
      let video_id = item.snippet.resource_id.video_id;
      if UNAVAILABLE_TITLES.contains(&item.snippet.title.as_str()) {
        warn!(
          "Video with ID \"{}\" is unavailable ({})... skipping.",
          video_id, item.snippet.title
        );
        continue;
      }
      video_ids.push(video_id);
    }

    Ok(ListingPage {
      video_ids,
      next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
    })
  }

  async fn fetch_video_details(
    &self,
    ids: &[String],
  ) -> Result<Vec<RawVideoRecord>, UpstreamFailure> {
    if ids.len() > MAX_IDS_PER_REQUEST {
      return Err(UpstreamFailure::new(
        "batchTooLarge",
        format!(
          "{} ids requested, the API accepts at most {}",
          ids.len(),
          MAX_IDS_PER_REQUEST
        ),
      ));
    }
    if ids.is_empty() {
      return Ok(Vec::new());
    }

    let joined = ids.join(",");
    let max_results = MAX_IDS_PER_REQUEST.to_string();
    let response: ApiVideosResponse = self
      .get(
        "videos",
        &[
          ("id", joined.as_str()),
          ("part", DETAIL_PARTS),
          ("maxResults", max_results.as_str()),
        ],
      )
      .await?;

    Ok(response.items)
  }

  async fn fetch_playlist_info(&self, playlist_id: &str) -> Result<PlaylistInfo, UpstreamFailure> {
    let response: ApiPlaylistsResponse = self
      .get("playlists", &[("id", playlist_id), ("part", "snippet")])
      .await?;

    response
      .items
      .into_iter()
      .next()
      .map(PlaylistInfo::from)
      .ok_or_else(|| {
        UpstreamFailure::new(
          "playlistNotFound",
          format!("Playlist {} was not found", playlist_id),
        )
      })
  }
}
