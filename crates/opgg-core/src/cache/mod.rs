//! Persistent metadata cache.
//!
//! Slow-changing upstream metadata (champion catalog, seasons, keywords,
//! versions) is kept in a single SQLite database with one table per
//! [`EntityType`]. Reads are cache-first; a store failure on the read path is
//! treated as a miss by callers.

mod sqlite;
mod traits;

pub use sqlite::MetadataCache;
pub use traits::{
    is_fresh, CacheBackend, CacheItem, CacheRecord, CacheStats, ClearTarget, EntityStats,
    EntityType,
};
