//! The build task: walks the listing, then fetches details page by page.
//!
//! One task runs per build generation. It reports to the engine over a
//! capacity-1 channel and reserves a slot before every detail request, so
//! batch *i+1* is not requested until the engine has taken batch *i*.
//! Dropping the receiver cancels the task at its next reservation.

use futures::{Stream, TryStreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::error::UpstreamFailure;
use crate::youtube::client::{PlaylistSource, MAX_IDS_PER_REQUEST};
use crate::youtube::normalize::to_video_item;
use crate::youtube::types::{ListingPage, PlaylistInfo, RawVideoRecord, VideoItem};

/// Progress reported by a build task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildStep {
  /// Listing walked to the end
  Listed {
    playlist_info: PlaylistInfo,
    total: usize,
  },
  /// Next detail batch, normalized, in listing order
  Batch {
    items: Vec<VideoItem>,
    /// Requested ids the detail endpoint did not return
    missing: usize,
  },
  Finished,
  Failed(UpstreamFailure),
}

/// A step tagged with the generation of the build that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMessage {
  pub generation: u64,
  pub step: BuildStep,
}

impl BuildMessage {
  pub fn new(generation: u64, step: BuildStep) -> Self {
    Self { generation, step }
  }

  /// Stand-in for a task that vanished without reporting.
  pub fn aborted(generation: u64) -> Self {
    Self::new(
      generation,
      BuildStep::Failed(UpstreamFailure::new(
        "buildAborted",
        "The build task ended unexpectedly",
      )),
    )
  }
}

enum Abort {
  Failed(UpstreamFailure),
  Cancelled,
}

impl From<UpstreamFailure> for Abort {
  fn from(failure: UpstreamFailure) -> Self {
    Abort::Failed(failure)
  }
}

/// Start a build and return the receiving end of its progress channel.
pub fn spawn_build<S>(
  source: Arc<S>,
  playlist_id: String,
  max_results: usize,
  generation: u64,
) -> mpsc::Receiver<BuildMessage>
where
  S: PlaylistSource + ?Sized + 'static,
{
  let (tx, rx) = mpsc::channel(1);

  tokio::spawn(async move {
    let step = match run(&*source, &playlist_id, max_results, generation, &tx).await {
      Ok(()) => BuildStep::Finished,
      Err(Abort::Failed(failure)) => BuildStep::Failed(failure),
      Err(Abort::Cancelled) => {
        debug!(generation, "Build cancelled");
        return;
      }
    };
    // Ignore send errors - the engine may have moved on
    let _ = tx.send(BuildMessage::new(generation, step)).await;
  });

  rx
}

async fn run<S>(
  source: &S,
  playlist_id: &str,
  max_results: usize,
  generation: u64,
  tx: &mpsc::Sender<BuildMessage>,
) -> Result<(), Abort>
where
  S: PlaylistSource + ?Sized,
{
  let playlist_info = source.fetch_playlist_info(playlist_id).await?;

  let video_ids: Vec<String> = listing_pages(source, playlist_id)
    .try_fold(Vec::new(), |mut ids, page| async move {
      ids.extend(page.video_ids);
      Ok::<_, UpstreamFailure>(ids)
    })
    .await?;

  info!(
    "Playlist items successfully grabbed with {} items... grabbing item data.",
    video_ids.len()
  );

  tx.send(BuildMessage::new(
    generation,
    BuildStep::Listed {
      playlist_info,
      total: video_ids.len(),
    },
  ))
  .await
  .map_err(|_| Abort::Cancelled)?;

  for (page_index, page_ids) in video_ids.chunks(max_results.max(1)).enumerate() {
    // A display page larger than the upstream limit takes several requests
    for batch in page_ids.chunks(MAX_IDS_PER_REQUEST) {
      let permit = tx.reserve().await.map_err(|_| Abort::Cancelled)?;
      let records = source.fetch_video_details(batch).await?;
      let (items, missing) = assemble(batch, records);
      permit.send(BuildMessage::new(
        generation,
        BuildStep::Batch { items, missing },
      ));
    }
    debug!("Page {} data has been retrieved.", page_index + 1);
  }

  Ok(())
}

/// Follow `nextPageToken` until the listing runs out, one page at a time.
fn listing_pages<'a, S>(
  source: &'a S,
  playlist_id: &'a str,
) -> impl Stream<Item = Result<ListingPage, UpstreamFailure>> + 'a
where
  S: PlaylistSource + ?Sized,
{
  // State: Some(token) while there is a page left to fetch
  futures::stream::try_unfold(Some(None::<String>), move |state| async move {
    let Some(token) = state else {
      return Ok::<_, UpstreamFailure>(None);
    };
    let page = source.list_playlist_items(playlist_id, token.as_deref()).await?;
    let next = page.next_page_token.clone().map(Some);
    Ok(Some((page, next)))
  })
}

/// Normalize a detail response in the order the ids were requested.
fn assemble(requested: &[String], records: Vec<RawVideoRecord>) -> (Vec<VideoItem>, usize) {
  let mut by_id: HashMap<String, RawVideoRecord> =
    records.into_iter().map(|r| (r.id.clone(), r)).collect();

  let mut items = Vec::with_capacity(requested.len());
  let mut missing = 0;
  for id in requested {
    match by_id.remove(id) {
      Some(record) => items.push(to_video_item(&record)),
      None => {
        warn!("Video with ID \"{}\" returned no details... skipping.", id);
        missing += 1;
      }
    }
  }

  (items, missing)
}
