//! The gallery: build tasks, the pagination cursor and the engine that
//! ties them to a cache and a renderer.

mod build;
mod cursor;
mod engine;
mod options;
mod sink;

pub use build::{BuildMessage, BuildStep};
pub use cursor::{Direction, PaginationCursor};
pub use engine::{EngineState, PaginationEngine, SearchOutcome};
pub use options::{GalleryOptions, DEFAULT_MAX_RESULTS};
pub use sink::RenderSink;
