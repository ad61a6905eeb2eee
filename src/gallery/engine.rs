//! Pagination engine: owns the playlist cache and the cursor, drives builds,
//! and serves pages and searches to a [`RenderSink`].

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use super::build::{spawn_build, BuildMessage, BuildStep};
use super::cursor::{Direction, PaginationCursor};
use super::options::GalleryOptions;
use super::sink::RenderSink;
use crate::cache::{CacheLayer, CachePage, CacheSource, CacheStorage, PlaylistCache};
use crate::error::{Result, UpstreamFailure};
use crate::youtube::client::PlaylistSource;
use crate::youtube::types::{PlaylistInfo, VideoItem};

/// Lifecycle of a gallery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
  Uninitialized,
  /// Walking the listing endpoint
  LoadingListing,
  /// Fetching details; `page` is the 1-based page being assembled
  LoadingDetails { page: usize },
  Ready,
  Failed(UpstreamFailure),
}

/// What a call to [`PaginationEngine::search`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
  /// Results were delivered to the sink
  Matched(usize),
  /// An empty query ended an active search
  Cleared,
  /// Nothing changed: empty query without an active search, or a match
  /// count outside `1..=max_results`
  Ignored,
  /// Search is turned off in the options
  Disabled,
}

pub struct PaginationEngine<S, C, K>
where
  S: PlaylistSource + 'static,
  C: CacheStorage,
  K: RenderSink,
{
  options: GalleryOptions,
  source: Arc<S>,
  cache_layer: CacheLayer<C>,
  sink: K,
  state: EngineState,
  cache: Option<PlaylistCache>,
  cache_source: Option<CacheSource>,
  cursor: PaginationCursor,
  /// Bumped on every build; messages from older builds are dropped
  generation: u64,
  build_rx: Option<mpsc::Receiver<BuildMessage>>,
}

impl<S, C, K> PaginationEngine<S, C, K>
where
  S: PlaylistSource + 'static,
  C: CacheStorage,
  K: RenderSink,
{
  /// Create an engine. Fails with a configuration error before any network
  /// call when the options are unusable. The layer's time-to-live is taken
  /// from `options.cache_life`.
  pub fn new(
    options: GalleryOptions,
    source: S,
    cache_layer: CacheLayer<C>,
    sink: K,
  ) -> Result<Self> {
    options.validate()?;

    Ok(Self {
      source: Arc::new(source),
      cache_layer: cache_layer.with_cache_life(options.cache_life),
      options,
      sink,
      state: EngineState::Uninitialized,
      cache: None,
      cache_source: None,
      cursor: PaginationCursor::default(),
      generation: 0,
      build_rx: None,
    })
  }

  /// Serve a fresh persisted gallery, or start building one.
  pub fn start(&mut self) {
    let key = self.options.playlist_id.clone();
    match self.cache_layer.load_fresh(&key, self.options.max_results) {
      Some(cached) => self.serve_cached(cached),
      None => self.begin_build(),
    }
  }

  /// Throw away the cursor and the in-memory gallery and rebuild from the
  /// listing, whatever the age of the persisted copy.
  pub fn refresh(&mut self) {
    info!("Refreshing \"{}\"", self.options.playlist_id);
    self.begin_build();
  }

  fn serve_cached(&mut self, cached: PlaylistCache) {
    self.cursor = PaginationCursor {
      page_count: cached.page_count,
      ..Default::default()
    };
    self.cache_source = Some(CacheSource::Cache {
      built_at: cached.built_at,
    });
    self.cache = Some(cached);
    self.state = EngineState::Ready;
    self.emit_current_page();
  }

  fn begin_build(&mut self) {
    self.generation += 1;
    self.cache = None;
    self.cache_source = None;
    self.cursor = PaginationCursor::default();
    self.state = EngineState::LoadingListing;
    self.sink.on_loading_start();

    info!(
      generation = self.generation,
      "Building gallery for \"{}\"", self.options.playlist_id
    );

    // Replacing the receiver cancels any build still in flight
    self.build_rx = Some(spawn_build(
      Arc::clone(&self.source),
      self.options.playlist_id.clone(),
      self.options.max_results,
      self.generation,
    ));
  }

  // ==========================================================================
  // Build progress
  // ==========================================================================

  /// Wait for the next message from the running build. Never resolves when
  /// no build is running.
  pub async fn next_message(&mut self) -> BuildMessage {
    let generation = self.generation;
    match self.build_rx.as_mut() {
      Some(rx) => rx
        .recv()
        .await
        .unwrap_or_else(|| BuildMessage::aborted(generation)),
      None => std::future::pending().await,
    }
  }

  /// Apply every message that is already waiting. Returns whether anything
  /// was applied.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    loop {
      let Some(rx) = self.build_rx.as_mut() else {
        return changed;
      };
      match rx.try_recv() {
        Ok(message) => {
          self.apply(message);
          changed = true;
        }
        Err(mpsc::error::TryRecvError::Empty) => return changed,
        Err(mpsc::error::TryRecvError::Disconnected) => {
          self.apply(BuildMessage::aborted(self.generation));
          return true;
        }
      }
    }
  }

  /// Drive the running build to completion.
  pub async fn settle(&mut self) {
    while self.is_loading() {
      let message = self.next_message().await;
      self.apply(message);
    }
  }

  /// Merge one build message into the engine.
  pub fn apply(&mut self, message: BuildMessage) {
    if message.generation != self.generation {
      debug!(
        stale = message.generation,
        current = self.generation,
        "Dropping message from superseded build"
      );
      return;
    }

    match message.step {
      BuildStep::Listed {
        playlist_info,
        total,
      } => {
        let mut cache = PlaylistCache::new(playlist_info, self.options.max_results, Utc::now());
        cache.set_total(total);
        self.cursor.page_count = cache.page_count;
        self.cache = Some(cache);
        self.state = EngineState::LoadingDetails { page: 1 };
      }
      BuildStep::Batch { items, missing } => self.merge_batch(items, missing),
      BuildStep::Finished => self.finish_build(),
      BuildStep::Failed(failure) => self.fail_build(failure),
    }
  }

  fn merge_batch(&mut self, items: Vec<VideoItem>, missing: usize) {
    let Some(cache) = self.cache.as_mut() else {
      return;
    };

    let completed = cache.merge_batch(items, missing);
    self.cursor.page_count = cache.page_count;
    self.cursor.clamp();
    self.state = EngineState::LoadingDetails {
      page: (cache.complete_pages() + 1).min(cache.page_count.max(1)),
    };

    for index in completed {
      debug!("Page {} data has been retrieved.", index + 1);
    }

    // Progressive reveal of the page the user is waiting on
    let current = self.cursor.current_page - 1;
    if !self.cursor.render_complete
      && !self.cursor.search_active
      && cache.is_page_complete(current)
    {
      self.emit_current_page();
    }
  }

  fn finish_build(&mut self) {
    self.build_rx = None;
    let Some(cache) = self.cache.as_ref() else {
      return;
    };

    self.cache_layer.store(&self.options.playlist_id, cache);
    info!(
      "Gallery for \"{}\" built: {} videos on {} pages",
      self.options.playlist_id, cache.total_videos, cache.page_count
    );

    self.cache_source = Some(CacheSource::Network);
    self.state = EngineState::Ready;
    self.sink.on_loading_end();

    if !self.cursor.render_complete && !self.cursor.search_active {
      self.emit_current_page();
    }
  }

  fn fail_build(&mut self, failure: UpstreamFailure) {
    error!(
      "Build for \"{}\" failed: {}",
      self.options.playlist_id, failure
    );

    self.build_rx = None;
    self.cache = None;
    self.cursor = PaginationCursor::default();
    self.state = EngineState::Failed(failure.clone());
    self.sink.on_loading_end();
    self.sink.on_error(&failure.code, &failure.message);
  }

  // ==========================================================================
  // Serving
  // ==========================================================================

  /// Page `index` (0-based), or the cursor's page when `index` is `None`.
  pub fn get_page(&self, index: Option<usize>) -> Option<&CachePage> {
    let index = index.unwrap_or(self.cursor.current_page - 1);
    self.cache.as_ref().and_then(|c| c.page(index))
  }

  /// Move one page. Returns whether the cursor moved.
  pub fn paginate(&mut self, direction: Direction) -> bool {
    let target = self.cursor.step(direction);
    self.move_to(target)
  }

  pub fn first_page(&mut self) -> bool {
    self.goto_page(1)
  }

  pub fn last_page(&mut self) -> bool {
    self.goto_page(self.cursor.page_count)
  }

  /// Jump to a 1-based page. Returns whether the cursor moved.
  pub fn goto_page(&mut self, page: usize) -> bool {
    let target = self.cursor.jump(page);
    self.move_to(target)
  }

  fn move_to(&mut self, target: Option<usize>) -> bool {
    // Pagination controls are hidden while a search is shown
    if self.cursor.search_active {
      return false;
    }
    if !self.cursor.render_complete {
      debug!("Ignoring pagination while page {} renders", self.cursor.current_page);
      return false;
    }
    let Some(page) = target else {
      return false;
    };

    self.cursor.current_page = page;
    self.cursor.render_complete = false;

    let ready = self
      .cache
      .as_ref()
      .is_some_and(|c| c.is_page_complete(page - 1));
    if ready {
      self.emit_current_page();
    } else {
      // Revealed when the build reaches it
      self.sink.on_loading_start();
    }
    true
  }

  /// Filter the assembled items by title or date.
  ///
  /// Results are only shown when there is at least one and no more than a
  /// page's worth; other counts leave the view as it is. The query is
  /// trimmed; an empty one ends an active search and re-serves the cursor's
  /// page.
  pub fn search(&mut self, query: &str) -> SearchOutcome {
    if !self.options.search_enabled {
      return SearchOutcome::Disabled;
    }

    let query = query.trim();
    if query.is_empty() {
      if !self.cursor.search_active {
        return SearchOutcome::Ignored;
      }
      self.cursor.clear_search();
      self.cursor.render_complete = false;
      let current = self.cursor.current_page - 1;
      if self
        .cache
        .as_ref()
        .is_some_and(|c| c.is_page_complete(current) || c.page_count == 0)
      {
        self.emit_current_page();
      }
      return SearchOutcome::Cleared;
    }

    let needle = query.to_lowercase();
    let results: Vec<VideoItem> = self
      .cache
      .iter()
      .flat_map(|c| c.items())
      .filter(|item| item.matches(&needle))
      .cloned()
      .collect();

    if results.is_empty() || results.len() > self.options.max_results {
      debug!(
        "Search \"{}\" matched {} items, outside 1..={}",
        query,
        results.len(),
        self.options.max_results
      );
      return SearchOutcome::Ignored;
    }

    let count = results.len();
    self.sink.on_search_results(&results);
    self.cursor.search_active = true;
    self.cursor.last_search_results = Some(results);
    SearchOutcome::Matched(count)
  }

  fn emit_current_page(&mut self) {
    let index = self.cursor.current_page - 1;
    let items: &[VideoItem] = self
      .cache
      .as_ref()
      .and_then(|c| c.page(index))
      .map(Vec::as_slice)
      .unwrap_or(&[]);

    self
      .sink
      .on_page_ready(items, self.cursor.current_page, self.cursor.page_count);
    self.cursor.render_complete = true;
  }

  // ==========================================================================
  // Accessors
  // ==========================================================================

  pub fn state(&self) -> &EngineState {
    &self.state
  }

  pub fn is_loading(&self) -> bool {
    matches!(
      self.state,
      EngineState::LoadingListing | EngineState::LoadingDetails { .. }
    )
  }

  pub fn cursor(&self) -> &PaginationCursor {
    &self.cursor
  }

  pub fn options(&self) -> &GalleryOptions {
    &self.options
  }

  pub fn playlist_info(&self) -> Option<&PlaylistInfo> {
    self.cache.as_ref().map(|c| &c.playlist_info)
  }

  pub fn cache(&self) -> Option<&PlaylistCache> {
    self.cache.as_ref()
  }

  pub fn cache_source(&self) -> Option<CacheSource> {
    self.cache_source
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  pub fn sink(&self) -> &K {
    &self.sink
  }

  pub fn sink_mut(&mut self) -> &mut K {
    &mut self.sink
  }
}
