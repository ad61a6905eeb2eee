mod components;
mod renderfns;
mod screen;

pub use components::{CommandEvent, CommandInput, KeyResult, SearchEvent, SearchInput};
pub use renderfns::header_title;
pub use screen::GalleryScreen;

use crate::app::App;
use crate::cache::CacheStorage;
use chrono::Utc;
use ratatui::prelude::*;
use renderfns::{draw_footer, draw_header, source_label, FooterStatus};

/// Main draw function
pub fn draw<C: CacheStorage>(frame: &mut Frame, app: &App<C>) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Card grid
      Constraint::Length(1), // Footer
    ])
    .split(frame.area());

  let channel = app
    .playlist_info()
    .map(|info| info.channel_title.as_str())
    .unwrap_or_default();
  draw_header(frame, chunks[0], app.title(), channel, app.search_enabled());

  let screen = app.screen();
  screen.render(frame, chunks[1]);

  let status = if let Some(error) = screen.error() {
    FooterStatus::Error(error)
  } else if let Some(notice) = app.notice() {
    FooterStatus::Notice(notice)
  } else {
    FooterStatus::Position {
      label: screen.position_label(),
      source: source_label(app.cache_source(), Utc::now()),
      loading: app.is_loading(),
    }
  };
  draw_footer(frame, chunks[2], &status);

  // Overlays last so they sit on top of the grid
  app.search().render_overlay(frame, chunks[1]);
  app.command().render_overlay(frame, chunks[1]);
}
