/// Available `:` commands, autocomplete and parsing

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  /// Name with its argument placeholder, for the suggestion list
  pub usage: &'static str,
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "refresh",
    aliases: &["r", "reload"],
    usage: "refresh",
    description: "Rebuild the gallery from YouTube",
  },
  Command {
    name: "first",
    aliases: &["f", "home"],
    usage: "first",
    description: "Go to the first page",
  },
  Command {
    name: "last",
    aliases: &["l", "end"],
    usage: "last",
    description: "Go to the last page",
  },
  Command {
    name: "page",
    aliases: &["p", "goto"],
    usage: "page N",
    description: "Go to page N",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    usage: "quit",
    description: "Exit ytgallery",
  },
];

/// A parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryCommand {
  Refresh,
  First,
  Last,
  /// 1-based page number
  Page(usize),
  Quit,
}

/// Parse a submitted command line; `Err` carries a message for the status bar.
pub fn parse(line: &str) -> Result<GalleryCommand, String> {
  let mut words = line.split_whitespace();
  let Some(word) = words.next() else {
    return Err("Empty command".to_string());
  };
  let word = word.to_lowercase();
  let Some(cmd) = COMMANDS
    .iter()
    .find(|c| c.name == word || c.aliases.contains(&word.as_str()))
  else {
    return Err(format!("Unknown command: {}", word));
  };

  let parsed = match cmd.name {
    "refresh" => GalleryCommand::Refresh,
    "first" => GalleryCommand::First,
    "last" => GalleryCommand::Last,
    "quit" => GalleryCommand::Quit,
    _ => {
      let page = words
        .next()
        .and_then(|n| n.parse::<usize>().ok())
        .ok_or_else(|| format!("Usage: {}", cmd.usage))?;
      GalleryCommand::Page(page)
    }
  };

  if words.next().is_some() {
    return Err(format!("Usage: {}", cmd.usage));
  }
  Ok(parsed)
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input_lower = input.to_lowercase();

  if input_lower.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = Vec::new();

  for cmd in COMMANDS {
    let priority = if cmd.name == input_lower {
      0
    } else if cmd.aliases.contains(&input_lower.as_str()) {
      1
    } else if cmd.name.starts_with(&input_lower) {
      2
    } else if cmd.aliases.iter().any(|a| a.starts_with(&input_lower)) {
      3
    } else if cmd.name.contains(&input_lower) {
      4
    } else {
      continue;
    };
    matches.push((cmd, priority));
  }

  matches.sort_by_key(|(_, priority)| *priority);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    assert_eq!(get_suggestions("").len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_and_alias_match() {
    assert_eq!(get_suggestions("last")[0].name, "last");
    assert_eq!(get_suggestions("goto")[0].name, "page");
    assert_eq!(get_suggestions("R")[0].name, "refresh");
  }

  #[test]
  fn test_prefix_match() {
    assert_eq!(get_suggestions("fi")[0].name, "first");
    assert_eq!(get_suggestions("qu")[0].name, "quit");
  }

  #[test]
  fn test_no_match() {
    assert!(get_suggestions("zap").is_empty());
  }

  #[test]
  fn test_parse_commands() {
    assert_eq!(parse("refresh"), Ok(GalleryCommand::Refresh));
    assert_eq!(parse("  FIRST "), Ok(GalleryCommand::First));
    assert_eq!(parse("end"), Ok(GalleryCommand::Last));
    assert_eq!(parse("page 12"), Ok(GalleryCommand::Page(12)));
    assert_eq!(parse("p 2"), Ok(GalleryCommand::Page(2)));
    assert_eq!(parse("q"), Ok(GalleryCommand::Quit));
  }

  #[test]
  fn test_parse_errors() {
    assert_eq!(parse(""), Err("Empty command".to_string()));
    assert_eq!(parse("zap"), Err("Unknown command: zap".to_string()));
    assert_eq!(parse("page"), Err("Usage: page N".to_string()));
    assert_eq!(parse("page two"), Err("Usage: page N".to_string()));
    assert_eq!(parse("quit now"), Err("Usage: quit".to_string()));
  }
}
