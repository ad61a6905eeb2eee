//! Converts raw video resources into display-ready [`VideoItem`]s.

use chrono::{DateTime, NaiveDate, Utc};

use super::types::{RawVideoRecord, VideoItem};

pub const LIVE: &str = "LIVE";
pub const UPCOMING: &str = "UPCOMING";

/// Normalize one detail record.
pub fn to_video_item(raw: &RawVideoRecord) -> VideoItem {
  let duration = raw
    .content_details
    .as_ref()
    .map(|d| d.duration.as_str())
    .unwrap_or_default();

  let views_display = raw
    .statistics
    .as_ref()
    .and_then(|s| s.view_count.as_deref())
    .map(group_digits)
    .unwrap_or_default();

  VideoItem {
    id: raw.id.clone(),
    title: raw.snippet.title.clone(),
    description: raw.snippet.description.clone(),
    date: format_display_date(resolve_date(raw)),
    thumbnail_url: thumbnail_url(raw),
    duration: format_duration(duration, raw.snippet.live_broadcast_content.as_deref()),
    views_display,
  }
}

/// Pick the date a viewer cares about.
///
/// A manually set recording date wins, then the moment a livestream actually
/// started, then when it was scheduled to start, and finally publish time.
pub fn resolve_date(raw: &RawVideoRecord) -> &str {
  let recording = raw
    .recording_details
    .as_ref()
    .and_then(|r| r.recording_date.as_deref());
  let live = raw.live_streaming_details.as_ref();
  let actual_start = live.and_then(|l| l.actual_start_time.as_deref());
  let scheduled_start = live.and_then(|l| l.scheduled_start_time.as_deref());

  [recording, actual_start, scheduled_start]
    .into_iter()
    .flatten()
    .find(|s| !s.is_empty())
    .unwrap_or(raw.snippet.published_at.as_str())
}

/// Render an ISO-8601 timestamp as "Month D, YYYY" (UTC).
pub fn format_display_date(s: &str) -> String {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return dt.with_timezone(&Utc).format("%B %-d, %Y").to_string();
  }
  if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
    return date.format("%B %-d, %Y").to_string();
  }
  s.to_string()
}

/// Render a video length for the thumbnail badge.
///
/// `broadcast` is the snippet's `liveBroadcastContent`; live and upcoming
/// streams get a label instead of a length.
pub fn format_duration(iso: &str, broadcast: Option<&str>) -> String {
  match broadcast {
    Some("live") => return LIVE.to_string(),
    Some("upcoming") => return UPCOMING.to_string(),
    _ => {}
  }

  let (hours, minutes, seconds) = parse_iso_duration(iso);
  if hours == 0 {
    format!("{minutes}:{seconds:02}")
  } else {
    format!("{hours}:{minutes:02}:{seconds:02}")
  }
}

/// Split `P[nD]T[nH][nM][nS]` into hours, minutes and seconds.
/// Days fold into hours; fractional seconds are truncated; anything
/// unrecognised counts as zero.
fn parse_iso_duration(iso: &str) -> (u64, u64, u64) {
  let Some(rest) = iso.trim().strip_prefix('P') else {
    return (0, 0, 0);
  };

  let (mut hours, mut minutes, mut seconds) = (0u64, 0u64, 0u64);
  let mut in_time = false;
  let mut number = String::new();

  for c in rest.chars() {
    match c {
      '0'..='9' | '.' => number.push(c),
      'T' => {
        in_time = true;
        number.clear();
      }
      unit => {
        let value = number.parse::<f64>().map(|v| v as u64).unwrap_or(0);
        number.clear();
        match (in_time, unit) {
          (false, 'D') => hours = hours.saturating_add(value.saturating_mul(24)),
          (true, 'H') => hours = hours.saturating_add(value),
          (true, 'M') => minutes = value,
          (true, 'S') => seconds = value,
          _ => {}
        }
      }
    }
  }

  (hours, minutes, seconds)
}

/// Format a number with a comma every three digits from the right.
pub fn number_with_commas(n: u64) -> String {
  group_digits(&n.to_string())
}

/// Insert grouping separators into a string of ASCII digits.
/// Anything that is not a plain digit string is returned unchanged.
pub fn group_digits(digits: &str) -> String {
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return digits.to_string();
  }

  let len = digits.len();
  let mut out = String::with_capacity(len + len / 3);
  for (i, c) in digits.chars().enumerate() {
    if i > 0 && (len - i) % 3 == 0 {
      out.push(',');
    }
    out.push(c);
  }
  out
}

fn thumbnail_url(raw: &RawVideoRecord) -> String {
  let thumbs = &raw.snippet.thumbnails;
  thumbs
    .medium
    .as_ref()
    .or(thumbs.high.as_ref())
    .or(thumbs.default.as_ref())
    .map(|t| t.url.clone())
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::youtube::api_types::{
    ApiContentDetails, ApiLiveStreamingDetails, ApiRecordingDetails, ApiStatistics, ApiThumbnail,
    ApiVideo,
  };

  fn raw_video() -> ApiVideo {
    let mut raw = ApiVideo {
      id: "vid1".to_string(),
      ..Default::default()
    };
    raw.snippet.title = "Opening night".to_string();
    raw.snippet.published_at = "2021-12-25T18:30:00Z".to_string();
    raw.content_details = Some(ApiContentDetails {
      duration: "PT4M13S".to_string(),
    });
    raw.statistics = Some(ApiStatistics {
      view_count: Some("1234567".to_string()),
    });
    raw
  }

  #[test]
  fn test_duration_with_hours() {
    assert_eq!(format_duration("PT1H2M3S", None), "1:02:03");
  }

  #[test]
  fn test_duration_minutes_and_seconds() {
    assert_eq!(format_duration("PT5M9S", None), "5:09");
  }

  #[test]
  fn test_duration_seconds_only() {
    assert_eq!(format_duration("PT45S", None), "0:45");
  }

  #[test]
  fn test_duration_pads_zero_minutes_under_an_hour_mark() {
    assert_eq!(format_duration("PT1H5S", None), "1:00:05");
    assert_eq!(format_duration("PT2H", None), "2:00:00");
  }

  #[test]
  fn test_duration_days_fold_into_hours() {
    assert_eq!(format_duration("P1DT2H3M4S", None), "26:03:04");
  }

  #[test]
  fn test_duration_huge_values_saturate() {
    assert_eq!(parse_iso_duration("P999999999999999999D"), (u64::MAX, 0, 0));
    assert_eq!(
      parse_iso_duration("P999999999999999999DT99999999999999999999H5M"),
      (u64::MAX, 5, 0)
    );
  }

  #[test]
  fn test_duration_unparseable_is_zero() {
    assert_eq!(format_duration("", None), "0:00");
    assert_eq!(format_duration("garbage", None), "0:00");
  }

  #[test]
  fn test_broadcast_flags_override_duration() {
    assert_eq!(format_duration("PT1H2M3S", Some("live")), "LIVE");
    assert_eq!(format_duration("P0D", Some("upcoming")), "UPCOMING");
    assert_eq!(format_duration("PT5M9S", Some("none")), "5:09");
  }

  #[test]
  fn test_number_with_commas() {
    assert_eq!(number_with_commas(1234567), "1,234,567");
    assert_eq!(number_with_commas(999), "999");
    assert_eq!(number_with_commas(1000), "1,000");
    assert_eq!(number_with_commas(0), "0");
  }

  #[test]
  fn test_group_digits_leaves_non_numeric_alone() {
    assert_eq!(group_digits("12a45"), "12a45");
    assert_eq!(group_digits(""), "");
  }

  #[test]
  fn test_recording_date_wins_over_publish_date() {
    let mut raw = raw_video();
    raw.recording_details = Some(ApiRecordingDetails {
      recording_date: Some("2020-06-01T00:00:00Z".to_string()),
    });
    raw.live_streaming_details = Some(ApiLiveStreamingDetails {
      actual_start_time: Some("2020-07-01T00:00:00Z".to_string()),
      scheduled_start_time: None,
    });

    assert_eq!(resolve_date(&raw), "2020-06-01T00:00:00Z");
    assert_eq!(to_video_item(&raw).date, "June 1, 2020");
  }

  #[test]
  fn test_live_start_times_before_publish() {
    let mut raw = raw_video();
    raw.live_streaming_details = Some(ApiLiveStreamingDetails {
      actual_start_time: None,
      scheduled_start_time: Some("2022-03-04T10:00:00Z".to_string()),
    });
    assert_eq!(resolve_date(&raw), "2022-03-04T10:00:00Z");

    raw.live_streaming_details = Some(ApiLiveStreamingDetails {
      actual_start_time: Some("2022-03-05T10:00:00Z".to_string()),
      scheduled_start_time: Some("2022-03-04T10:00:00Z".to_string()),
    });
    assert_eq!(resolve_date(&raw), "2022-03-05T10:00:00Z");
  }

  #[test]
  fn test_publish_date_fallback() {
    let raw = raw_video();
    assert_eq!(to_video_item(&raw).date, "December 25, 2021");
  }

  #[test]
  fn test_display_date_formats() {
    assert_eq!(format_display_date("2019-01-09"), "January 9, 2019");
    assert_eq!(format_display_date("2019-01-09T23:30:00-02:00"), "January 10, 2019");
    assert_eq!(format_display_date("not a date"), "not a date");
  }

  #[test]
  fn test_to_video_item() {
    let mut raw = raw_video();
    raw.snippet.thumbnails.default = Some(ApiThumbnail {
      url: "https://i.ytimg.com/vi/vid1/default.jpg".to_string(),
    });
    raw.snippet.thumbnails.medium = Some(ApiThumbnail {
      url: "https://i.ytimg.com/vi/vid1/mqdefault.jpg".to_string(),
    });

    let item = to_video_item(&raw);
    assert_eq!(item.id, "vid1");
    assert_eq!(item.title, "Opening night");
    assert_eq!(item.duration, "4:13");
    assert_eq!(item.views_display, "1,234,567");
    assert_eq!(item.thumbnail_url, "https://i.ytimg.com/vi/vid1/mqdefault.jpg");
  }

  #[test]
  fn test_hidden_view_count_renders_empty() {
    let mut raw = raw_video();
    raw.statistics = Some(ApiStatistics { view_count: None });
    assert_eq!(to_video_item(&raw).views_display, "");
  }
}
