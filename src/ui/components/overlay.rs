use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::input::TextInput;

/// Draw a bordered single-line prompt near the top-left of `area` with
/// `extra_rows` spare rows below the input. Returns the spare area.
pub fn render_prompt(
  frame: &mut Frame,
  area: Rect,
  title: &str,
  prefix: &str,
  input: &TextInput,
  extra_rows: u16,
) -> Rect {
  let width = (area.width * 60 / 100).clamp(30, 60).min(area.width.saturating_sub(2));
  let height = (3 + extra_rows).min(area.height.saturating_sub(1));
  let overlay_area = Rect::new(area.x + 1, area.y + 1, width, height);

  frame.render_widget(Clear, overlay_area);

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow))
    .title(format!(" {} ", title));

  let inner = block.inner(overlay_area);
  frame.render_widget(block, overlay_area);

  if inner.height == 0 {
    return inner;
  }

  let (before, after) = input.split_at_cursor();
  let input_line = Line::from(vec![
    Span::styled(prefix.to_string(), Style::default().fg(Color::Yellow)),
    Span::raw(before.to_string()),
    Span::styled("_", Style::default().fg(Color::Yellow)),
    Span::raw(after.to_string()),
  ]);
  frame.render_widget(Paragraph::new(input_line), Rect { height: 1, ..inner });

  Rect {
    y: inner.y + 1,
    height: inner.height.saturating_sub(1),
    ..inner
  }
}
