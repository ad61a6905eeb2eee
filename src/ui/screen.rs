use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::gallery::RenderSink;
use crate::ui::renderfns::{card_color, grid_rows, step_selection, truncate};
use crate::youtube::types::VideoItem;

/// Rows a card occupies, borders included
const CARD_HEIGHT: u16 = 6;

/// What the grid is currently showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Showing {
  /// Nothing delivered yet, or the last build failed
  #[default]
  Nothing,
  /// A playlist page, 1-based
  Page { number: usize, count: usize },
  SearchResults,
}

/// The terminal side of the engine: keeps whatever was last delivered and
/// draws it as a grid of video cards.
#[derive(Debug, Default)]
pub struct GalleryScreen {
  num_columns: usize,
  items: Vec<VideoItem>,
  showing: Showing,
  loading: bool,
  error: Option<String>,
  selected: usize,
}

impl GalleryScreen {
  pub fn new(num_columns: usize) -> Self {
    Self {
      num_columns: num_columns.max(1),
      ..Default::default()
    }
  }

  pub fn items(&self) -> &[VideoItem] {
    &self.items
  }

  pub fn showing(&self) -> Showing {
    self.showing
  }

  pub fn is_loading(&self) -> bool {
    self.loading
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  pub fn selected_item(&self) -> Option<&VideoItem> {
    self.items.get(self.selected)
  }

  /// Move the highlighted card; a row step is `num_columns` cards.
  pub fn move_selection(&mut self, delta: isize) {
    self.selected = step_selection(self.selected, delta, self.items.len());
  }

  pub fn move_row(&mut self, rows: isize) {
    self.move_selection(rows * self.num_columns as isize);
  }

  /// Footer label for the current content
  pub fn position_label(&self) -> String {
    match self.showing {
      Showing::Nothing => String::new(),
      Showing::Page { count: 0, .. } => "Empty playlist".to_string(),
      Showing::Page { number, count } => format!("Page {} of {}", number, count),
      Showing::SearchResults => format!("{} search results (Esc to clear)", self.items.len()),
    }
  }

  fn replace_items(&mut self, items: &[VideoItem], showing: Showing) {
    self.items = items.to_vec();
    self.showing = showing;
    self.selected = 0;
    self.error = None;
  }

  pub fn render(&self, frame: &mut Frame, area: Rect) {
    if self.items.is_empty() {
      let content = match (self.showing, self.loading, &self.error) {
        (_, _, Some(_)) => "Failed to load the playlist. Press 'r' to retry.",
        (_, true, _) => "Loading videos...",
        (Showing::Page { .. }, _, _) => "This playlist has no videos.",
        _ => "",
      };
      let paragraph = Paragraph::new(content)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let rows = grid_rows(self.items.len(), self.num_columns);
    let row_areas = Layout::default()
      .direction(Direction::Vertical)
      .constraints(vec![Constraint::Length(CARD_HEIGHT); rows])
      .split(area);

    for (row, chunk) in self.items.chunks(self.num_columns).enumerate() {
      let Some(row_area) = row_areas.get(row) else {
        break;
      };
      let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, self.num_columns as u32); self.num_columns])
        .split(*row_area);

      for (col, item) in chunk.iter().enumerate() {
        let index = row * self.num_columns + col;
        render_card(frame, cells[col], item, index == self.selected);
      }
    }
  }
}

fn render_card(frame: &mut Frame, area: Rect, item: &VideoItem, selected: bool) {
  let inner_width = area.width.saturating_sub(2) as usize;

  let block = Block::default()
    .title(format!(" {} ", truncate(&item.title, inner_width.saturating_sub(2))))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(card_color(selected)));

  let mut meta = vec![Span::styled(
    format!("▶ {}", item.duration),
    Style::default().fg(Color::Cyan),
  )];
  if !item.views_display.is_empty() {
    meta.push(Span::styled(
      format!("  {} views", item.views_display),
      Style::default().fg(Color::DarkGray),
    ));
  }

  let lines = vec![
    Line::from(meta),
    Line::from(Span::styled(item.date.clone(), Style::default().fg(Color::White))),
    Line::from(Span::styled(
      item.description.lines().next().unwrap_or_default().to_string(),
      Style::default().fg(Color::DarkGray),
    )),
  ];

  let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
  frame.render_widget(paragraph, area);
}

impl RenderSink for GalleryScreen {
  fn on_page_ready(&mut self, items: &[VideoItem], page_number: usize, page_count: usize) {
    self.replace_items(
      items,
      Showing::Page {
        number: page_number,
        count: page_count,
      },
    );
  }

  fn on_search_results(&mut self, items: &[VideoItem]) {
    self.replace_items(items, Showing::SearchResults);
  }

  fn on_error(&mut self, code: &str, message: &str) {
    self.items.clear();
    self.showing = Showing::Nothing;
    self.selected = 0;
    self.error = Some(format!("Error {}: {}", code, message));
  }

  fn on_loading_start(&mut self) {
    self.items.clear();
    self.showing = Showing::Nothing;
    self.selected = 0;
    self.error = None;
    self.loading = true;
  }

  fn on_loading_end(&mut self) {
    self.loading = false;
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::test_item;

  fn page(n: usize) -> Vec<VideoItem> {
    (0..n).map(|i| test_item(&format!("v{}", i))).collect()
  }

  #[test]
  fn test_page_replaces_content_and_selection() {
    let mut screen = GalleryScreen::new(3);
    screen.on_page_ready(&page(5), 1, 2);
    screen.move_selection(4);
    assert_eq!(screen.selected_item().map(|i| i.id.as_str()), Some("v4"));

    screen.on_page_ready(&page(2), 2, 2);
    assert_eq!(screen.items().len(), 2);
    assert_eq!(screen.selected_item().map(|i| i.id.as_str()), Some("v0"));
    assert_eq!(screen.showing(), Showing::Page { number: 2, count: 2 });
    assert_eq!(screen.position_label(), "Page 2 of 2");
  }

  #[test]
  fn test_row_movement() {
    let mut screen = GalleryScreen::new(3);
    screen.on_page_ready(&page(7), 1, 1);

    screen.move_row(1);
    assert_eq!(screen.selected_item().map(|i| i.id.as_str()), Some("v3"));
    screen.move_row(5);
    assert_eq!(screen.selected_item().map(|i| i.id.as_str()), Some("v6"));
    screen.move_row(-1);
    assert_eq!(screen.selected_item().map(|i| i.id.as_str()), Some("v3"));
  }

  #[test]
  fn test_error_clears_grid_until_next_page() {
    let mut screen = GalleryScreen::new(3);
    screen.on_page_ready(&page(3), 1, 4);
    screen.on_loading_start();
    screen.on_loading_end();
    screen.on_error("quotaExceeded", "Quota exceeded");

    assert!(screen.items().is_empty());
    assert!(!screen.is_loading());
    assert_eq!(screen.error(), Some("Error quotaExceeded: Quota exceeded"));

    screen.on_page_ready(&page(3), 1, 4);
    assert!(screen.error().is_none());
  }

  #[test]
  fn test_loading_start_drops_the_served_page() {
    let mut screen = GalleryScreen::new(3);
    screen.on_page_ready(&page(5), 2, 4);
    screen.move_selection(3);
    screen.on_loading_start();

    assert!(screen.items().is_empty());
    assert!(screen.selected_item().is_none());
    assert_eq!(screen.showing(), Showing::Nothing);
    assert_eq!(screen.position_label(), "");
    assert!(screen.is_loading());

    screen.on_page_ready(&page(2), 1, 3);
    screen.on_loading_end();
    assert_eq!(screen.selected_item().map(|i| i.id.as_str()), Some("v0"));
    assert!(!screen.is_loading());
  }

  #[test]
  fn test_labels() {
    let mut screen = GalleryScreen::new(2);
    assert_eq!(screen.position_label(), "");

    screen.on_page_ready(&[], 1, 0);
    assert_eq!(screen.position_label(), "Empty playlist");

    screen.on_search_results(&page(2));
    assert_eq!(screen.showing(), Showing::SearchResults);
    assert_eq!(screen.position_label(), "2 search results (Esc to clear)");
  }
}
