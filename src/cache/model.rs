//! The persisted gallery structure and its page-layout invariants.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::youtube::types::{PlaylistInfo, VideoItem};

/// One display page: at most `max_results` items
pub type CachePage = Vec<VideoItem>;

/// Root record persisted per playlist.
///
/// Items are laid out in listing order, filling each page to `max_results`
/// before starting the next, so every page but the last is full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistCache {
  pub playlist_info: PlaylistInfo,
  /// Written once when a rebuild starts
  pub built_at: DateTime<Utc>,
  /// Page size the record was laid out with
  pub max_results: usize,
  /// Number of videos the finished record will hold
  pub total_videos: usize,
  pub page_count: usize,
  pub pages: Vec<CachePage>,
}

impl PlaylistCache {
  pub fn new(playlist_info: PlaylistInfo, max_results: usize, built_at: DateTime<Utc>) -> Self {
    Self {
      playlist_info,
      built_at,
      max_results: max_results.max(1),
      total_videos: 0,
      page_count: 0,
      pages: Vec::new(),
    }
  }

  /// Declare how many videos the listing produced.
  pub fn set_total(&mut self, total_videos: usize) {
    self.total_videos = total_videos;
    self.relayout();
  }

  /// Append the next batch in listing order.
  ///
  /// `missing` counts ids requested for this batch that the detail endpoint
  /// did not return; they shrink the expected total. Returns the 0-based
  /// indices of pages that became complete with this merge.
  pub fn merge_batch(&mut self, items: Vec<VideoItem>, missing: usize) -> std::ops::Range<usize> {
    let complete_before = self.complete_pages();

    self.total_videos = self.total_videos.saturating_sub(missing);
    self.relayout();

    for item in items {
      let index = self.fetched_count() / self.max_results;
      if index >= self.pages.len() {
        // More items than announced; grow rather than lose them
        self.pages.push(Vec::new());
        self.total_videos = self.total_videos.max(self.fetched_count() + 1);
      }
      self.pages[index].push(item);
    }
    self.relayout();

    complete_before..self.complete_pages()
  }

  /// Recompute `page_count` from the total and size `pages` to match.
  fn relayout(&mut self) {
    self.total_videos = self.total_videos.max(self.fetched_count());
    self.page_count = self.total_videos.div_ceil(self.max_results);
    self.pages.resize_with(self.page_count, Vec::new);
  }

  /// Items assembled so far.
  pub fn fetched_count(&self) -> usize {
    self.pages.iter().map(Vec::len).sum()
  }

  /// Whether every announced video has been assembled.
  pub fn is_complete(&self) -> bool {
    self.fetched_count() == self.total_videos
  }

  /// Number of leading pages holding all their items.
  pub fn complete_pages(&self) -> usize {
    if self.is_complete() {
      self.page_count
    } else {
      self.fetched_count() / self.max_results
    }
  }

  /// Whether page `index` (0-based) holds all of its items.
  pub fn is_page_complete(&self, index: usize) -> bool {
    index < self.complete_pages()
  }

  /// Page `index` (0-based), if `index < page_count`.
  pub fn page(&self, index: usize) -> Option<&CachePage> {
    if index < self.page_count {
      self.pages.get(index)
    } else {
      None
    }
  }

  /// All assembled items in listing order.
  pub fn items(&self) -> impl Iterator<Item = &VideoItem> {
    self.pages.iter().flatten()
  }

  /// Stale once older than `cache_life`.
  pub fn is_stale(&self, now: DateTime<Utc>, cache_life: Duration) -> bool {
    now - self.built_at > cache_life
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;

  pub(crate) fn item(id: &str) -> VideoItem {
    VideoItem {
      id: id.to_string(),
      title: format!("Video {}", id),
      description: String::new(),
      date: "January 1, 2021".to_string(),
      thumbnail_url: String::new(),
      duration: "1:00".to_string(),
      views_display: "1".to_string(),
    }
  }

  fn items(range: std::ops::Range<usize>) -> Vec<VideoItem> {
    range.map(|i| item(&format!("v{}", i))).collect()
  }

  fn cache(max_results: usize) -> PlaylistCache {
    PlaylistCache::new(PlaylistInfo::default(), max_results, Utc::now())
  }

  #[test]
  fn test_page_count_is_ceiling() {
    for max_results in 1..=7 {
      for total in 0..=20 {
        let mut c = cache(max_results);
        c.set_total(total);
        c.merge_batch(items(0..total), 0);
        assert_eq!(c.page_count, total.div_ceil(max_results));
        assert_eq!(c.pages.len(), c.page_count);
      }
    }
  }

  #[test]
  fn test_pages_full_except_last_and_order_preserved() {
    let mut c = cache(3);
    c.set_total(8);
    c.merge_batch(items(0..2), 0);
    c.merge_batch(items(2..7), 0);
    c.merge_batch(items(7..8), 0);

    assert_eq!(c.page_count, 3);
    assert_eq!(c.pages[0].len(), 3);
    assert_eq!(c.pages[1].len(), 3);
    assert_eq!(c.pages[2].len(), 2);

    let ids: Vec<&str> = c.items().map(|i| i.id.as_str()).collect();
    let expected: Vec<String> = (0..8).map(|i| format!("v{}", i)).collect();
    assert_eq!(ids, expected);
  }

  #[test]
  fn test_merge_reports_completed_pages() {
    let mut c = cache(2);
    c.set_total(5);

    assert_eq!(c.merge_batch(items(0..1), 0), 0..0);
    assert_eq!(c.merge_batch(items(1..4), 0), 0..2);
    assert!(c.is_page_complete(1));
    assert!(!c.is_page_complete(2));
    assert_eq!(c.merge_batch(items(4..5), 0), 2..3);
    assert!(c.is_complete());
  }

  #[test]
  fn test_missing_items_shrink_total() {
    let mut c = cache(2);
    c.set_total(4);

    let completed = c.merge_batch(items(0..1), 1);
    assert_eq!(completed, 0..0);
    assert_eq!(c.total_videos, 3);
    assert_eq!(c.page_count, 2);

    let completed = c.merge_batch(items(1..2), 1);
    assert_eq!(completed, 0..1);
    assert_eq!(c.total_videos, 2);
    assert_eq!(c.page_count, 1);
    assert!(c.is_complete());
  }

  #[test]
  fn test_unfetched_pages_are_empty_but_addressable() {
    let mut c = cache(5);
    c.set_total(12);
    assert_eq!(c.page(2).map(Vec::len), Some(0));
    assert!(c.page(3).is_none());
  }

  #[test]
  fn test_staleness_boundary() {
    let life = Duration::milliseconds(86_400_000);
    let now = Utc::now();
    let mut c = cache(5);

    c.built_at = now - life - Duration::milliseconds(1);
    assert!(c.is_stale(now, life));

    c.built_at = now - life + Duration::milliseconds(1);
    assert!(!c.is_stale(now, life));
  }
}
