use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// What the footer reports, most urgent first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FooterStatus<'a> {
  Error(&'a str),
  Notice(&'a str),
  Position {
    label: String,
    source: String,
    loading: bool,
  },
}

/// Draw the footer bar with page position and cache provenance
pub fn draw_footer(frame: &mut Frame, area: Rect, status: &FooterStatus<'_>) {
  let mut spans = vec![Span::raw(" ")];

  match status {
    FooterStatus::Error(msg) => {
      spans.push(Span::styled(msg.to_string(), Style::default().fg(Color::Red).bold()));
      spans.push(Span::styled("  (r to retry)", Style::default().fg(Color::DarkGray)));
    }
    FooterStatus::Notice(msg) => {
      spans.push(Span::styled(msg.to_string(), Style::default().fg(Color::White)));
    }
    FooterStatus::Position {
      label,
      source,
      loading,
    } => {
      spans.push(Span::styled(label.clone(), Style::default().fg(Color::Cyan).bold()));
      if !source.is_empty() {
        spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(source.clone(), Style::default().fg(Color::White)));
      }
      if *loading {
        spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled("loading...", Style::default().fg(Color::Yellow)));
      }
    }
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));

  frame.render_widget(paragraph, area);
}
