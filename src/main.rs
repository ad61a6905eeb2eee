mod app;
mod cache;
mod commands;
mod config;
mod error;
mod event;
mod gallery;
mod logging;
mod ui;
mod youtube;

use cache::{CacheStorage, MemoryStorage, SqliteStorage};
use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;
use youtube::client::YoutubeClient;

#[derive(Parser, Debug)]
#[command(name = "ytgallery")]
#[command(about = "A terminal gallery for YouTube playlists")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/ytgallery/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Playlist ID to show
  #[arg(short, long)]
  playlist: Option<String>,

  /// Videos per page
  #[arg(short, long)]
  max_results: Option<usize>,

  /// Rebuild from YouTube even if the cached gallery is fresh
  #[arg(long)]
  refresh: bool,

  /// Keep the gallery in memory only
  #[arg(long)]
  no_cache: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init()?;

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Command line overrides
  if let Some(playlist) = args.playlist {
    config.playlist_id = Some(playlist);
  }
  if let Some(max_results) = args.max_results {
    config.gallery.max_results = max_results;
  }

  let options = config.gallery_options();
  options.validate()?;

  let api_key = config::Config::get_api_key()?;
  let client = YoutubeClient::new(
    &api_key,
    &config.youtube.api_base,
    Duration::from_secs(config.youtube.request_timeout_secs),
  )?;

  if args.no_cache {
    return run(&config, options, client, MemoryStorage::new(), args.refresh).await;
  }

  match SqliteStorage::open(config.cache.path.as_deref()) {
    Ok(storage) => run(&config, options, client, storage, args.refresh).await,
    Err(e) => {
      // The gallery still works, it just won't outlive the process
      warn!("Cache storage unavailable, keeping the gallery in memory: {}", e);
      run(&config, options, client, MemoryStorage::new(), args.refresh).await
    }
  }
}

async fn run<C: CacheStorage>(
  config: &config::Config,
  options: gallery::GalleryOptions,
  client: YoutubeClient,
  storage: C,
  force_refresh: bool,
) -> Result<()> {
  let mut app = app::App::new(config, options, client, storage)?;
  app.run(force_refresh).await
}
