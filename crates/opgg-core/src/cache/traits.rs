//! Cache backend trait and types.

use crate::error::Result;
use crate::params::CacheType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Kinds of cached metadata. Each lives in its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Individual catalog entries.
    Champions,
    /// One row per language recording when the full catalog was last stored.
    ChampionCatalog,
    Seasons,
    Keywords,
    /// One row per language holding the version list.
    Versions,
    /// Lower-cased champion name to id.
    ChampionNames,
}

impl EntityType {
    pub const ALL: [EntityType; 6] = [
        EntityType::Champions,
        EntityType::ChampionCatalog,
        EntityType::Seasons,
        EntityType::Keywords,
        EntityType::Versions,
        EntityType::ChampionNames,
    ];

    pub fn table_name(&self) -> &'static str {
        match self {
            EntityType::Champions => "champions",
            EntityType::ChampionCatalog => "champion_catalog",
            EntityType::Seasons => "seasons",
            EntityType::Keywords => "keywords",
            EntityType::Versions => "versions",
            EntityType::ChampionNames => "champion_names",
        }
    }

    /// Tables belonging to a user-facing cache family.
    pub fn for_cache_type(cache_type: CacheType) -> &'static [EntityType] {
        match cache_type {
            CacheType::Champions => &[
                EntityType::Champions,
                EntityType::ChampionCatalog,
                EntityType::ChampionNames,
            ],
            CacheType::Seasons => &[EntityType::Seasons],
            CacheType::Versions => &[EntityType::Versions],
            CacheType::Keywords => &[EntityType::Keywords],
            CacheType::All => &EntityType::ALL,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// One entity to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheItem {
    pub key: String,
    /// Display name used by substring lookups.
    pub name: Option<String>,
    pub payload: Value,
}

impl CacheItem {
    pub fn new(key: impl Into<String>, payload: Value) -> Self {
        Self {
            key: key.into(),
            name: None,
            payload,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A stored row.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheRecord {
    pub entity_type: EntityType,
    pub key: String,
    pub lang: String,
    pub name: Option<String>,
    pub payload: Value,
    pub cached_at: DateTime<Utc>,
}

/// Which tables a clear applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget {
    Entity(EntityType),
    All,
}

impl ClearTarget {
    pub fn entity_types(&self) -> Vec<EntityType> {
        match self {
            ClearTarget::Entity(entity_type) => vec![*entity_type],
            ClearTarget::All => EntityType::ALL.to_vec(),
        }
    }
}

/// Per-table statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityStats {
    pub entity_type: EntityType,
    pub row_count: usize,
    pub languages: BTreeSet<String>,
    pub oldest: Option<DateTime<Utc>>,
    pub newest: Option<DateTime<Utc>>,
}

/// Statistics across every table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entities: Vec<EntityStats>,
}

impl CacheStats {
    pub fn get(&self, entity_type: EntityType) -> Option<&EntityStats> {
        self.entities.iter().find(|s| s.entity_type == entity_type)
    }

    pub fn total_rows(&self) -> usize {
        self.entities.iter().map(|s| s.row_count).sum()
    }

    /// Languages present for any of `entity_types`.
    pub fn languages_for(&self, entity_types: &[EntityType]) -> BTreeSet<String> {
        self.entities
            .iter()
            .filter(|s| entity_types.contains(&s.entity_type))
            .flat_map(|s| s.languages.iter().cloned())
            .collect()
    }
}

/// Whether a batch stored at `newest` is still fresh.
///
/// `None` never expires; a zero TTL is always stale.
pub fn is_fresh(newest: DateTime<Utc>, ttl: Option<Duration>, now: DateTime<Utc>) -> bool {
    match ttl {
        None => true,
        Some(ttl) if ttl.is_zero() => false,
        Some(ttl) => {
            let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
            now.signed_duration_since(newest) <= ttl
        }
    }
}

/// Metadata cache backend.
///
/// Records are scoped by entity type and language. Reads judge each row
/// against the caller's TTL from its own `cached_at`; `is_stale` looks at the
/// newest row of a scope. All operations are synchronous to match rusqlite's
/// API.
pub trait CacheBackend: Send + Sync {
    /// Upsert `items` in one transaction with a single shared timestamp.
    ///
    /// Returns the number of rows written.
    fn write(&self, entity_type: EntityType, items: &[CacheItem], lang: &str) -> Result<usize>;

    /// Swap every row of the (entity type, language) scope for `items`.
    ///
    /// Rows absent from `items` are deleted in the same transaction.
    fn replace(&self, entity_type: EntityType, items: &[CacheItem], lang: &str)
        -> Result<usize>;

    /// Rows of the scope whose own timestamp is within `ttl`.
    fn read(&self, entity_type: EntityType, lang: &str, ttl: Option<Duration>)
        -> Result<Vec<CacheRecord>>;

    fn read_by_id(
        &self,
        entity_type: EntityType,
        key: &str,
        lang: &str,
        ttl: Option<Duration>,
    ) -> Result<Option<CacheRecord>>;

    /// Case-insensitive substring match on the `name` column.
    fn read_by_name_substring(
        &self,
        entity_type: EntityType,
        text: &str,
        lang: &str,
        ttl: Option<Duration>,
    ) -> Result<Vec<CacheRecord>>;

    /// True when the scope has no rows or its newest row is older than `ttl`.
    fn is_stale(&self, entity_type: EntityType, lang: &str, ttl: Option<Duration>) -> Result<bool>;

    fn stats(&self) -> Result<CacheStats>;

    /// Delete rows, optionally limited to one language.
    ///
    /// Returns the deleted count per table.
    fn clear(&self, target: ClearTarget, lang: Option<&str>) -> Result<Vec<(EntityType, usize)>>;
}
