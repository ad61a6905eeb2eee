use chrono::{DateTime, Utc};
use ratatui::prelude::Color;

use crate::cache::CacheSource;

/// Truncate to at most `max_len` characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Number of grid rows needed for `len` cards
pub fn grid_rows(len: usize, num_columns: usize) -> usize {
  len.div_ceil(num_columns.max(1))
}

/// Move a linear selection by `delta`, staying inside `0..len`
pub fn step_selection(selected: usize, delta: isize, len: usize) -> usize {
  if len == 0 {
    return 0;
  }
  selected.saturating_add_signed(delta).min(len - 1)
}

/// Border color for a card
pub fn card_color(selected: bool) -> Color {
  if selected {
    Color::Yellow
  } else {
    Color::Blue
  }
}

/// "live" for a fresh build, or the age of the persisted copy
pub fn source_label(source: Option<CacheSource>, now: DateTime<Utc>) -> String {
  match source {
    None => String::new(),
    Some(CacheSource::Network) => "live".to_string(),
    Some(CacheSource::Cache { built_at }) => {
      let age = now.signed_duration_since(built_at);
      if age.num_hours() > 0 {
        format!("cached {}h ago", age.num_hours())
      } else if age.num_minutes() > 0 {
        format!("cached {}m ago", age.num_minutes())
      } else {
        "cached just now".to_string()
      }
    }
  }
}
