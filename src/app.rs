use crate::cache::{CacheLayer, CacheSource, CacheStorage};
use crate::commands::{self, GalleryCommand};
use crate::config::Config;
use crate::event::{Event, EventHandler};
use crate::gallery::{Direction, GalleryOptions, PaginationEngine, SearchOutcome};
use crate::ui::{self, CommandEvent, CommandInput, GalleryScreen, KeyResult, SearchEvent, SearchInput};
use crate::youtube::client::YoutubeClient;
use crate::youtube::types::PlaylistInfo;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::{stdout, Stdout};
use std::time::Duration;
use tracing::info;

type Engine<C> = PaginationEngine<YoutubeClient, C, GalleryScreen>;

/// Main application state
pub struct App<C: CacheStorage> {
  engine: Engine<C>,

  /// Search prompt (after pressing /)
  search: SearchInput,

  /// Command prompt (after pressing :)
  command: CommandInput,

  /// Header title from the config file
  title: Option<String>,

  /// One-shot status line message, cleared on the next key
  notice: Option<String>,

  should_quit: bool,
}

impl<C: CacheStorage> App<C> {
  pub fn new(
    config: &Config,
    options: GalleryOptions,
    client: YoutubeClient,
    storage: C,
  ) -> Result<Self> {
    let cache_layer = CacheLayer::new(storage);
    let screen = GalleryScreen::new(config.gallery.num_columns);
    let engine = PaginationEngine::new(options, client, cache_layer, screen)?;

    Ok(Self {
      engine,
      search: SearchInput::new(),
      command: CommandInput::new(),
      title: config.title.clone(),
      notice: None,
      should_quit: false,
    })
  }

  /// Take over the terminal until the user quits.
  pub async fn run(&mut self, force_refresh: bool) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.main_loop(&mut terminal, force_refresh).await;

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn main_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    force_refresh: bool,
  ) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));

    if force_refresh {
      self.engine.refresh();
    } else {
      self.engine.start();
    }

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      tokio::select! {
        event = events.next() => match event {
          Some(event) => self.handle_event(event),
          None => break,
        },
        message = self.engine.next_message() => self.engine.apply(message),
      }
    }

    info!("Quitting");
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Resize | Event::Tick => {}
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    self.notice = None;

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    // An open prompt gets every key
    if self.search.is_active() {
      self.handle_search_key(key);
      return;
    }

    match self.command.handle_key(key) {
      KeyResult::NotHandled => {}
      KeyResult::Handled => return,
      KeyResult::Event(CommandEvent::Submitted(line)) => {
        self.execute_command(&line);
        return;
      }
      KeyResult::Event(CommandEvent::Cancelled) => return,
    }

    if self.engine.options().search_enabled && key.code == KeyCode::Char('/') {
      self.handle_search_key(key);
      return;
    }

    self.handle_normal_key(key);
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match self.search.handle_key(key) {
      KeyResult::Event(SearchEvent::Changed(query)) => {
        // Only an active search can be cleared; partial queries that match
        // too much or nothing leave the grid alone
        if self.engine.search(&query) == SearchOutcome::Cleared {
          self.notice = Some("Search cleared".to_string());
        }
      }
      KeyResult::Event(SearchEvent::Submitted) => {
        if !self.search.query().trim().is_empty() && !self.engine.cursor().search_active {
          self.notice = Some(format!(
            "No page-sized result for \"{}\" (1 to {} matches)",
            self.search.query().trim(),
            self.engine.options().max_results
          ));
        }
      }
      KeyResult::Handled | KeyResult::NotHandled => {}
    }
  }

  fn handle_normal_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,

      KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => {
        self.engine.paginate(Direction::Back);
      }
      KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => {
        self.engine.paginate(Direction::Next);
      }
      KeyCode::Home | KeyCode::Char('g') => {
        self.engine.first_page();
      }
      KeyCode::End | KeyCode::Char('G') => {
        self.engine.last_page();
      }

      KeyCode::Up | KeyCode::Char('k') => self.engine.sink_mut().move_row(-1),
      KeyCode::Down | KeyCode::Char('j') => self.engine.sink_mut().move_row(1),
      KeyCode::Tab => self.engine.sink_mut().move_selection(1),
      KeyCode::BackTab => self.engine.sink_mut().move_selection(-1),

      KeyCode::Enter => {
        self.notice = self.engine.sink().selected_item().map(|item| item.watch_url());
      }
      KeyCode::Esc => {
        self.engine.search("");
      }
      KeyCode::Char('r') => self.engine.refresh(),

      _ => {}
    }
  }

  fn execute_command(&mut self, line: &str) {
    if line.is_empty() {
      return;
    }

    match commands::parse(line) {
      Ok(GalleryCommand::Refresh) => self.engine.refresh(),
      Ok(GalleryCommand::First) => {
        self.engine.first_page();
      }
      Ok(GalleryCommand::Last) => {
        self.engine.last_page();
      }
      Ok(GalleryCommand::Page(page)) => {
        if !self.engine.goto_page(page) && page != self.engine.cursor().current_page {
          self.notice = Some(format!(
            "Cannot go to page {} of {}",
            page,
            self.engine.cursor().page_count
          ));
        }
      }
      Ok(GalleryCommand::Quit) => self.should_quit = true,
      Err(msg) => self.notice = Some(msg),
    }
  }

  // Accessors for UI rendering

  pub fn screen(&self) -> &GalleryScreen {
    self.engine.sink()
  }

  pub fn search(&self) -> &SearchInput {
    &self.search
  }

  pub fn command(&self) -> &CommandInput {
    &self.command
  }

  pub fn notice(&self) -> Option<&str> {
    self.notice.as_deref()
  }

  pub fn search_enabled(&self) -> bool {
    self.engine.options().search_enabled
  }

  pub fn title(&self) -> &str {
    ui::header_title(
      self.title.as_deref(),
      self.engine.playlist_info(),
      &self.engine.options().playlist_id,
    )
  }

  pub fn playlist_info(&self) -> Option<&PlaylistInfo> {
    self.engine.playlist_info()
  }

  pub fn cache_source(&self) -> Option<CacheSource> {
    self.engine.cache_source()
  }

  pub fn is_loading(&self) -> bool {
    self.engine.is_loading() || self.screen().is_loading()
  }
}
