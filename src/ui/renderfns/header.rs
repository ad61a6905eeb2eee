use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::youtube::types::PlaylistInfo;

/// Draw the header bar with logo, playlist context, and shortcuts
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, channel: &str, search: bool) {
  let mut spans = vec![
    Span::styled(" ytgallery ", Style::default().fg(Color::Red).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::Yellow).bold()),
  ];
  if !channel.is_empty() {
    spans.push(Span::styled("│", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(format!(" {} ", channel), Style::default().fg(Color::White)));
  }
  spans.push(Span::raw("  "));

  let mut shortcuts = vec![("<←/→>", " page"), ("<:>", " command")];
  if search {
    shortcuts.push(("</>", " search"));
  }
  shortcuts.extend([("<r>", " refresh"), ("<q>", " quit")]);

  for (i, (key, label)) in shortcuts.into_iter().enumerate() {
    if i > 0 {
      spans.push(Span::raw("   "));
    }
    // Keys and brackets highlighted, descriptions dimmed
    spans.push(Span::styled(key, Style::default().fg(Color::Cyan)));
    spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}

/// Header title: configured title, else the playlist's, else its id
pub fn header_title<'a>(configured: Option<&'a str>, info: Option<&'a PlaylistInfo>, playlist_id: &'a str) -> &'a str {
  configured
    .filter(|t| !t.is_empty())
    .or_else(|| info.map(|i| i.title.as_str()).filter(|t| !t.is_empty()))
    .unwrap_or(playlist_id)
}
