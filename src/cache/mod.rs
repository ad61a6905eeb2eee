//! Playlist cache: the persisted page structure, its storage backends and a
//! TTL gate in front of them.

mod layer;
mod model;
mod storage;
mod traits;

pub use layer::{CacheLayer, DEFAULT_CACHE_LIFE_MS};
pub use model::{CachePage, PlaylistCache};
pub use storage::{MemoryStorage, SqliteStorage};
pub use traits::{CacheSource, CacheStorage};

#[cfg(test)]
pub(crate) use model::tests::item as test_item;
