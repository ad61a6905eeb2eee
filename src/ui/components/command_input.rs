use super::input::{InputResult, TextInput};
use super::overlay::render_prompt;
use super::KeyResult;
use crate::commands::{self, Command};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, ListState};

/// Suggestions shown under the prompt
const MAX_SUGGESTIONS: usize = 6;

/// Events emitted by command input that parent needs to handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEvent {
  /// Command line with the name completed from the selected suggestion
  Submitted(String),
  Cancelled,
}

/// `:` prompt with autocomplete on the command name
#[derive(Debug, Clone, Default)]
pub struct CommandInput {
  input: TextInput,
  active: bool,
  selected_suggestion: usize,
}

impl CommandInput {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn is_active(&self) -> bool {
    self.active
  }

  pub fn activate(&mut self) {
    self.active = true;
    self.input.clear();
    self.selected_suggestion = 0;
  }

  /// Suggestions for the command name typed so far
  pub fn suggestions(&self) -> Vec<&'static Command> {
    let (name, _) = split_name(self.input.value());
    commands::get_suggestions(name)
  }

  /// Handle a key event. Call this regardless of active state - it handles
  /// activation too.
  pub fn handle_key(&mut self, key: KeyEvent) -> KeyResult<CommandEvent> {
    if !self.active {
      if key.code == KeyCode::Char(':') {
        self.activate();
        return KeyResult::Handled;
      }
      return KeyResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.active = false;
        self.input.clear();
        return KeyResult::Event(CommandEvent::Cancelled);
      }
      KeyCode::Enter => {
        self.active = false;
        let line = self.resolve_command();
        self.input.clear();
        self.selected_suggestion = 0;
        return KeyResult::Event(CommandEvent::Submitted(line));
      }
      KeyCode::Tab | KeyCode::Down => {
        let count = self.suggestions().len();
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + 1) % count;
        }
        return KeyResult::Handled;
      }
      KeyCode::BackTab | KeyCode::Up => {
        let count = self.suggestions().len();
        if count > 0 {
          self.selected_suggestion = (self.selected_suggestion + count - 1) % count;
        }
        return KeyResult::Handled;
      }
      _ => {}
    }

    if self.input.handle_key(key) == InputResult::Consumed {
      self.selected_suggestion = 0;
    }
    KeyResult::Handled
  }

  /// Complete the command name from the selected suggestion, keep arguments
  fn resolve_command(&self) -> String {
    let (name, args) = split_name(self.input.value());
    if name.is_empty() {
      return String::new();
    }
    let name = self
      .suggestions()
      .get(self.selected_suggestion)
      .map(|cmd| cmd.name.to_string())
      .unwrap_or_else(|| name.to_lowercase());
    if args.is_empty() {
      name
    } else {
      format!("{} {}", name, args)
    }
  }

  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let suggestions = self.suggestions();
    let shown = suggestions.len().min(MAX_SUGGESTIONS);
    let rest = render_prompt(frame, area, "Command", ":", &self.input, shown as u16);

    if shown == 0 || rest.height == 0 {
      return;
    }

    let items: Vec<ListItem> = suggestions
      .iter()
      .take(MAX_SUGGESTIONS)
      .map(|cmd| {
        ListItem::new(Line::from(vec![
          Span::styled(format!("{:<12}", cmd.usage), Style::default().fg(Color::Cyan)),
          Span::styled(cmd.description, Style::default().fg(Color::DarkGray)),
        ]))
      })
      .collect();

    let list = List::new(items).highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));
    let mut state = ListState::default();
    state.select(Some(self.selected_suggestion));

    frame.render_stateful_widget(list, rest, &mut state);
  }
}

fn split_name(line: &str) -> (&str, &str) {
  let line = line.trim_start();
  match line.split_once(char::is_whitespace) {
    Some((name, args)) => (name, args.trim()),
    None => (line.trim_end(), ""),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::KeyModifiers;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  fn submit(text: &str) -> KeyResult<CommandEvent> {
    let mut input = CommandInput::new();
    input.activate();
    for c in text.chars() {
      input.handle_key(key(KeyCode::Char(c)));
    }
    input.handle_key(key(KeyCode::Enter))
  }

  #[test]
  fn test_name_completed_from_suggestion() {
    assert_eq!(
      submit("ref"),
      KeyResult::Event(CommandEvent::Submitted("refresh".to_string()))
    );
  }

  #[test]
  fn test_arguments_survive_completion() {
    assert_eq!(
      submit("pa 3"),
      KeyResult::Event(CommandEvent::Submitted("page 3".to_string()))
    );
  }

  #[test]
  fn test_unknown_name_passed_through() {
    assert_eq!(
      submit("Zap"),
      KeyResult::Event(CommandEvent::Submitted("zap".to_string()))
    );
  }

  #[test]
  fn test_empty_line_submits_nothing() {
    assert_eq!(submit("  "), KeyResult::Event(CommandEvent::Submitted(String::new())));
  }

  #[test]
  fn test_split_name() {
    assert_eq!(split_name("  page   4 "), ("page", "4"));
    assert_eq!(split_name("quit "), ("quit", ""));
    assert_eq!(split_name(""), ("", ""));
  }
}
