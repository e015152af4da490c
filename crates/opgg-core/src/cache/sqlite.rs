//! SQLite-backed metadata cache.

use super::traits::{
    is_fresh, CacheBackend, CacheItem, CacheRecord, CacheStats, ClearTarget, EntityStats,
    EntityType,
};
use crate::error::{OpggError, Result};
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};

/// SQLite-based cache backend.
///
/// One table per [`EntityType`], rows keyed by (entity key, language).
/// Thread-safe via internal mutex on the connection.
#[derive(Debug, Clone)]
pub struct MetadataCache {
    conn: Arc<Mutex<Connection>>,
}

impl MetadataCache {
    /// Open (or create) the cache at `db_path`.
    ///
    /// Creates the parent directory and tables if they don't exist.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let db_path = db_path.as_ref();

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| OpggError::Io {
                    message: format!("Failed to create cache directory: {}", e),
                    path: Some(parent.to_path_buf()),
                    source: Some(e),
                })?;
            }
        }

        let conn = Connection::open(db_path).map_err(|e| OpggError::Cache {
            message: format!("Failed to open cache database: {}", e),
            source: Some(e),
        })?;

        // WAL lets readers in other processes proceed during a write.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| OpggError::Cache {
                message: format!("Failed to set pragmas: {}", e),
                source: Some(e),
            })?;

        let cache = Self::from_connection(conn)?;
        info!(path = %db_path.display(), "Opened metadata cache");
        Ok(cache)
    }

    /// A private cache that disappears with the process.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| OpggError::Cache {
            message: format!("Failed to open in-memory cache: {}", e),
            source: Some(e),
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let cache = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        cache.init_schema()?;
        Ok(cache)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        let schema: String = EntityType::ALL
            .iter()
            .map(|entity_type| {
                let table = entity_type.table_name();
                format!(
                    r#"
                    CREATE TABLE IF NOT EXISTS {table} (
                        entity_key TEXT NOT NULL,
                        lang_code TEXT NOT NULL,
                        name TEXT,
                        data TEXT NOT NULL,
                        cached_at INTEGER NOT NULL,
                        PRIMARY KEY (entity_key, lang_code)
                    );
                    CREATE INDEX IF NOT EXISTS idx_{table}_freshness
                        ON {table}(lang_code, cached_at);
                    "#
                )
            })
            .collect();

        conn.execute_batch(&schema).map_err(|e| OpggError::Cache {
            message: format!("Failed to initialize cache schema: {}", e),
            source: Some(e),
        })?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| OpggError::cache(format!("Failed to lock database: {}", e)))
    }

    /// Write with an explicit timestamp instead of now.
    ///
    /// Used to backdate rows when exercising staleness.
    pub fn write_at(
        &self,
        entity_type: EntityType,
        items: &[CacheItem],
        lang: &str,
        cached_at: DateTime<Utc>,
    ) -> Result<usize> {
        self.store(entity_type, items, lang, cached_at, false)
    }

    /// [`CacheBackend::replace`] with an explicit timestamp.
    pub fn replace_at(
        &self,
        entity_type: EntityType,
        items: &[CacheItem],
        lang: &str,
        cached_at: DateTime<Utc>,
    ) -> Result<usize> {
        self.store(entity_type, items, lang, cached_at, true)
    }

    fn store(
        &self,
        entity_type: EntityType,
        items: &[CacheItem],
        lang: &str,
        cached_at: DateTime<Utc>,
        replace_scope: bool,
    ) -> Result<usize> {
        let mut conn = self.lock()?;
        let table = entity_type.table_name();
        let stamp = cached_at.timestamp_millis();

        let tx = conn.transaction().map_err(|e| OpggError::Cache {
            message: format!("Failed to begin transaction: {}", e),
            source: Some(e),
        })?;

        if replace_scope {
            let removed = tx
                .execute(
                    &format!("DELETE FROM {table} WHERE lang_code = ?1"),
                    params![lang],
                )
                .map_err(|e| OpggError::Cache {
                    message: format!("Failed to clear {} before replace: {}", table, e),
                    source: Some(e),
                })?;
            debug!(table, lang, removed, "Replacing cached scope");
        }

        {
            let mut stmt = tx
                .prepare(&format!(
                    r#"
                    INSERT INTO {table} (entity_key, lang_code, name, data, cached_at)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    ON CONFLICT(entity_key, lang_code) DO UPDATE SET
                        name = excluded.name,
                        data = excluded.data,
                        cached_at = excluded.cached_at
                    "#
                ))
                .map_err(|e| OpggError::Cache {
                    message: format!("Failed to prepare upsert into {}: {}", table, e),
                    source: Some(e),
                })?;

            for item in items {
                let data = serde_json::to_string(&item.payload)?;
                stmt.execute(params![item.key, lang, item.name, data, stamp])
                    .map_err(|e| OpggError::Cache {
                        message: format!("Failed to write {} '{}': {}", table, item.key, e),
                        source: Some(e),
                    })?;
            }
        }

        tx.commit().map_err(|e| OpggError::Cache {
            message: format!("Failed to commit {} write: {}", table, e),
            source: Some(e),
        })?;

        debug!(table, lang, rows = items.len(), "Cached entities");
        Ok(items.len())
    }

    /// Newest timestamp in a scope, if it has rows.
    fn newest(
        conn: &Connection,
        entity_type: EntityType,
        lang: &str,
    ) -> Result<Option<DateTime<Utc>>> {
        let table = entity_type.table_name();
        let newest: Option<i64> = conn
            .query_row(
                &format!("SELECT MAX(cached_at) FROM {table} WHERE lang_code = ?1"),
                params![lang],
                |row| row.get(0),
            )
            .map_err(|e| OpggError::Cache {
                message: format!("Failed to query freshness of {}: {}", table, e),
                source: Some(e),
            })?;
        Ok(newest.map(from_millis))
    }

    /// Oldest `cached_at` (unix ms) a row may carry and still be fresh.
    ///
    /// `None` when nothing can be fresh (zero TTL).
    fn fresh_cutoff(ttl: Option<Duration>, now: DateTime<Utc>) -> Option<i64> {
        match ttl {
            None => Some(i64::MIN),
            Some(ttl) if ttl.is_zero() => None,
            Some(ttl) => Some(
                chrono::Duration::from_std(ttl)
                    .ok()
                    .and_then(|ttl| now.checked_sub_signed(ttl))
                    .map_or(i64::MIN, |cutoff| cutoff.timestamp_millis()),
            ),
        }
    }

    fn scope_is_fresh(
        conn: &Connection,
        entity_type: EntityType,
        lang: &str,
        ttl: Option<Duration>,
    ) -> Result<bool> {
        Ok(match Self::newest(conn, entity_type, lang)? {
            Some(newest) => is_fresh(newest, ttl, Utc::now()),
            None => false,
        })
    }

    fn query_records(
        conn: &Connection,
        entity_type: EntityType,
        filter: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<CacheRecord>> {
        let table = entity_type.table_name();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT entity_key, lang_code, name, data, cached_at FROM {table} \
                 WHERE {filter} ORDER BY rowid"
            ))
            .map_err(|e| OpggError::Cache {
                message: format!("Failed to prepare read of {}: {}", table, e),
                source: Some(e),
            })?;

        let rows = stmt
            .query_map(params, raw_row)
            .map_err(|e| OpggError::Cache {
                message: format!("Failed to read {}: {}", table, e),
                source: Some(e),
            })?;

        let mut records = Vec::new();
        for row in rows {
            let (key, lang, name, data, cached_at) = row?;
            records.push(CacheRecord {
                entity_type,
                key,
                lang,
                name,
                payload: serde_json::from_str(&data)?,
                cached_at: from_millis(cached_at),
            });
        }
        Ok(records)
    }
}

type RawRow = (String, String, Option<String>, String, i64);

fn raw_row(row: &Row<'_>) -> rusqlite::Result<RawRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

impl CacheBackend for MetadataCache {
    fn write(&self, entity_type: EntityType, items: &[CacheItem], lang: &str) -> Result<usize> {
        self.write_at(entity_type, items, lang, Utc::now())
    }

    fn replace(&self, entity_type: EntityType, items: &[CacheItem], lang: &str) -> Result<usize> {
        self.replace_at(entity_type, items, lang, Utc::now())
    }

    fn read(
        &self,
        entity_type: EntityType,
        lang: &str,
        ttl: Option<Duration>,
    ) -> Result<Vec<CacheRecord>> {
        let Some(cutoff) = Self::fresh_cutoff(ttl, Utc::now()) else {
            return Ok(Vec::new());
        };
        let conn = self.lock()?;
        Self::query_records(
            &conn,
            entity_type,
            "lang_code = ?1 AND cached_at >= ?2",
            params![lang, cutoff],
        )
    }

    fn read_by_id(
        &self,
        entity_type: EntityType,
        key: &str,
        lang: &str,
        ttl: Option<Duration>,
    ) -> Result<Option<CacheRecord>> {
        let Some(cutoff) = Self::fresh_cutoff(ttl, Utc::now()) else {
            return Ok(None);
        };
        let conn = self.lock()?;
        let table = entity_type.table_name();
        let row = conn
            .query_row(
                &format!(
                    "SELECT entity_key, lang_code, name, data, cached_at FROM {table} \
                     WHERE entity_key = ?1 AND lang_code = ?2 AND cached_at >= ?3"
                ),
                params![key, lang, cutoff],
                raw_row,
            )
            .optional()
            .map_err(|e| OpggError::Cache {
                message: format!("Failed to read {} '{}': {}", table, key, e),
                source: Some(e),
            })?;

        row.map(|(key, lang, name, data, cached_at)| {
            Ok(CacheRecord {
                entity_type,
                key,
                lang,
                name,
                payload: serde_json::from_str(&data)?,
                cached_at: from_millis(cached_at),
            })
        })
        .transpose()
    }

    fn read_by_name_substring(
        &self,
        entity_type: EntityType,
        text: &str,
        lang: &str,
        ttl: Option<Duration>,
    ) -> Result<Vec<CacheRecord>> {
        let Some(cutoff) = Self::fresh_cutoff(ttl, Utc::now()) else {
            return Ok(Vec::new());
        };
        let conn = self.lock()?;
        // instr() avoids LIKE's wildcard characters in user text.
        let needle = text.to_lowercase();
        Self::query_records(
            &conn,
            entity_type,
            "lang_code = ?1 AND cached_at >= ?2 \
             AND name IS NOT NULL AND instr(LOWER(name), ?3) > 0",
            params![lang, cutoff, needle],
        )
    }

    fn is_stale(&self, entity_type: EntityType, lang: &str, ttl: Option<Duration>) -> Result<bool> {
        let conn = self.lock()?;
        Ok(!Self::scope_is_fresh(&conn, entity_type, lang, ttl)?)
    }

    fn stats(&self) -> Result<CacheStats> {
        let conn = self.lock()?;
        let mut entities = Vec::with_capacity(EntityType::ALL.len());

        for entity_type in EntityType::ALL {
            let table = entity_type.table_name();
            let (count, oldest, newest): (i64, Option<i64>, Option<i64>) = conn
                .query_row(
                    &format!("SELECT COUNT(*), MIN(cached_at), MAX(cached_at) FROM {table}"),
                    [],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .map_err(|e| OpggError::Cache {
                    message: format!("Failed to count {}: {}", table, e),
                    source: Some(e),
                })?;

            let mut stmt = conn
                .prepare(&format!("SELECT DISTINCT lang_code FROM {table}"))
                .map_err(|e| OpggError::Cache {
                    message: format!("Failed to list languages of {}: {}", table, e),
                    source: Some(e),
                })?;
            let languages = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<BTreeSet<String>>>()?;

            entities.push(EntityStats {
                entity_type,
                row_count: count as usize,
                languages,
                oldest: oldest.map(from_millis),
                newest: newest.map(from_millis),
            });
        }

        Ok(CacheStats { entities })
    }

    fn clear(&self, target: ClearTarget, lang: Option<&str>) -> Result<Vec<(EntityType, usize)>> {
        let conn = self.lock()?;
        let mut deleted = Vec::new();

        for entity_type in target.entity_types() {
            let table = entity_type.table_name();
            let count = match lang {
                Some(lang) => conn.execute(
                    &format!("DELETE FROM {table} WHERE lang_code = ?1"),
                    params![lang],
                ),
                None => conn.execute(&format!("DELETE FROM {table}"), []),
            }
            .map_err(|e| OpggError::Cache {
                message: format!("Failed to clear {}: {}", table, e),
                source: Some(e),
            })?;
            deleted.push((entity_type, count));
        }

        info!(?target, lang, ?deleted, "Cleared cache");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn create_test_cache() -> (MetadataCache, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_cache.db");
        let cache = MetadataCache::open(&db_path).unwrap();
        (cache, temp_dir)
    }

    fn champion(id: i64, name: &str) -> CacheItem {
        CacheItem::new(id.to_string(), json!({"id": id, "name": name})).with_name(name)
    }

    #[test]
    fn test_write_then_read() {
        let (cache, _temp) = create_test_cache();
        let items = vec![champion(1, "Annie"), champion(103, "Ahri")];

        assert_eq!(cache.write(EntityType::Champions, &items, "en_US").unwrap(), 2);

        let records = cache.read(EntityType::Champions, "en_US", Some(DAY)).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].payload["name"], "Annie");
        assert_eq!(records[0].cached_at, records[1].cached_at);
    }

    #[test]
    fn test_write_is_upsert() {
        let (cache, _temp) = create_test_cache();
        cache
            .write(EntityType::Champions, &[champion(1, "Annie")], "en_US")
            .unwrap();
        cache
            .write(EntityType::Champions, &[champion(1, "Annie v2")], "en_US")
            .unwrap();

        let records = cache.read(EntityType::Champions, "en_US", None).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name.as_deref(), Some("Annie v2"));
    }

    #[test]
    fn test_zero_ttl_reads_nothing() {
        let (cache, _temp) = create_test_cache();
        cache
            .write(EntityType::Champions, &[champion(1, "Annie")], "en_US")
            .unwrap();

        assert!(cache
            .read(EntityType::Champions, "en_US", Some(Duration::ZERO))
            .unwrap()
            .is_empty());
        assert!(cache
            .is_stale(EntityType::Champions, "en_US", Some(Duration::ZERO))
            .unwrap());
    }

    #[test]
    fn test_stale_rows_are_kept() {
        let (cache, _temp) = create_test_cache();
        let two_days_ago = Utc::now() - chrono::Duration::days(2);
        cache
            .write_at(
                EntityType::Seasons,
                &[CacheItem::new("27", json!({"id": 27}))],
                "en_US",
                two_days_ago,
            )
            .unwrap();

        assert!(cache.read(EntityType::Seasons, "en_US", Some(DAY)).unwrap().is_empty());
        assert!(cache.is_stale(EntityType::Seasons, "en_US", Some(DAY)).unwrap());

        // Still there for a caller with a longer TTL.
        let records = cache.read(EntityType::Seasons, "en_US", Some(3 * DAY)).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_ttl_applies_to_each_row() {
        let (cache, _temp) = create_test_cache();
        let three_days_ago = Utc::now() - chrono::Duration::days(3);
        cache
            .write_at(EntityType::Champions, &[champion(1, "Annie")], "en", three_days_ago)
            .unwrap();
        cache
            .write(EntityType::Champions, &[champion(2, "Ahri")], "en")
            .unwrap();

        // A recent write elsewhere in the scope does not revive the old row.
        assert!(cache
            .read_by_id(EntityType::Champions, "1", "en", Some(DAY))
            .unwrap()
            .is_none());
        let records = cache.read(EntityType::Champions, "en", Some(DAY)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "2");
        let hits = cache
            .read_by_name_substring(EntityType::Champions, "a", "en", Some(DAY))
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name.as_deref(), Some("Ahri"));

        // The scope itself is fresh through its newest row.
        assert!(!cache.is_stale(EntityType::Champions, "en", Some(DAY)).unwrap());
        assert_eq!(cache.read(EntityType::Champions, "en", None).unwrap().len(), 2);
    }

    #[test]
    fn test_replace_drops_rows_missing_from_batch() {
        let (cache, _temp) = create_test_cache();
        let items = vec![champion(1, "Annie"), champion(103, "Ahri"), champion(34, "Anivia")];
        cache.write(EntityType::Champions, &items, "en_US").unwrap();
        cache
            .write(EntityType::Champions, &[champion(1, "애니")], "ko_KR")
            .unwrap();

        let written = cache
            .replace(
                EntityType::Champions,
                &[champion(1, "Annie"), champion(103, "Ahri")],
                "en_US",
            )
            .unwrap();
        assert_eq!(written, 2);

        let records = cache.read(EntityType::Champions, "en_US", None).unwrap();
        let keys: Vec<_> = records.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "103"]);
        // Other languages are untouched.
        assert_eq!(cache.read(EntityType::Champions, "ko_KR", None).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_scope_is_stale() {
        let (cache, _temp) = create_test_cache();
        assert!(cache.is_stale(EntityType::Keywords, "en_US", None).unwrap());
    }

    #[test]
    fn test_language_scopes_are_independent() {
        let (cache, _temp) = create_test_cache();
        cache
            .write(EntityType::Champions, &[champion(1, "Annie")], "en_US")
            .unwrap();
        cache
            .write(EntityType::Champions, &[champion(1, "애니")], "ko_KR")
            .unwrap();

        let en = cache.read_by_id(EntityType::Champions, "1", "en_US", None).unwrap().unwrap();
        let ko = cache.read_by_id(EntityType::Champions, "1", "ko_KR", None).unwrap().unwrap();
        assert_eq!(en.name.as_deref(), Some("Annie"));
        assert_eq!(ko.name.as_deref(), Some("애니"));
        assert!(cache.read(EntityType::Champions, "ja_JP", None).unwrap().is_empty());
    }

    #[test]
    fn test_read_by_name_substring() {
        let (cache, _temp) = create_test_cache();
        let items = vec![champion(1, "Annie"), champion(103, "Ahri"), champion(34, "Anivia")];
        cache.write(EntityType::Champions, &items, "en_US").unwrap();

        let hits = cache
            .read_by_name_substring(EntityType::Champions, "ANI", "en_US", None)
            .unwrap();
        let names: Vec<_> = hits.iter().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["Anivia"]);

        let hits = cache
            .read_by_name_substring(EntityType::Champions, "a", "en_US", None)
            .unwrap();
        assert_eq!(hits.len(), 3);

        // LIKE wildcards are matched literally.
        assert!(cache
            .read_by_name_substring(EntityType::Champions, "%", "en_US", None)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_read_by_id_missing() {
        let (cache, _temp) = create_test_cache();
        cache
            .write(EntityType::Champions, &[champion(1, "Annie")], "en_US")
            .unwrap();
        assert!(cache
            .read_by_id(EntityType::Champions, "999", "en_US", None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_stats() {
        let (cache, _temp) = create_test_cache();
        let old = Utc::now() - chrono::Duration::hours(5);
        cache
            .write_at(EntityType::Champions, &[champion(1, "Annie")], "en_US", old)
            .unwrap();
        cache
            .write(
                EntityType::Champions,
                &[champion(1, "애니"), champion(103, "아리")],
                "ko_KR",
            )
            .unwrap();

        let stats = cache.stats().unwrap();
        let champions = stats.get(EntityType::Champions).unwrap();
        assert_eq!(champions.row_count, 3);
        assert_eq!(
            champions.languages.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["en_US", "ko_KR"]
        );
        assert!(champions.oldest.unwrap() < champions.newest.unwrap());
        assert_eq!(stats.get(EntityType::Keywords).unwrap().row_count, 0);
        assert_eq!(stats.total_rows(), 3);
    }

    #[test]
    fn test_clear_by_language() {
        let (cache, _temp) = create_test_cache();
        cache
            .write(EntityType::Champions, &[champion(1, "Annie")], "en_US")
            .unwrap();
        cache
            .write(EntityType::Champions, &[champion(1, "애니")], "ko_KR")
            .unwrap();

        let deleted = cache
            .clear(ClearTarget::Entity(EntityType::Champions), Some("en_US"))
            .unwrap();
        assert_eq!(deleted, vec![(EntityType::Champions, 1)]);
        assert!(cache.read(EntityType::Champions, "en_US", None).unwrap().is_empty());
        assert_eq!(cache.read(EntityType::Champions, "ko_KR", None).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_all() {
        let (cache, _temp) = create_test_cache();
        cache
            .write(EntityType::Champions, &[champion(1, "Annie")], "en_US")
            .unwrap();
        cache
            .write(EntityType::Versions, &[CacheItem::new("versions", json!(["15.1"]))], "en_US")
            .unwrap();

        let deleted = cache.clear(ClearTarget::All, None).unwrap();
        assert_eq!(deleted.len(), EntityType::ALL.len());
        assert_eq!(deleted.iter().map(|(_, n)| n).sum::<usize>(), 2);
        assert_eq!(cache.stats().unwrap().total_rows(), 0);
    }

    #[test]
    fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("nested").join("cache.db");
        {
            let cache = MetadataCache::open(&db_path).unwrap();
            cache
                .write(EntityType::Champions, &[champion(1, "Annie")], "en_US")
                .unwrap();
        }
        let cache = MetadataCache::open(&db_path).unwrap();
        assert_eq!(cache.read(EntityType::Champions, "en_US", None).unwrap().len(), 1);
    }

    #[test]
    fn test_catalog_lookup_scenario() {
        let (cache, _temp) = create_test_cache();
        let items = vec![champion(1, "Annie"), champion(2, "Ahri")];
        cache.write(EntityType::Champions, &items, "en").unwrap();

        let hits = cache
            .read_by_name_substring(EntityType::Champions, "ah", "en", None)
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].payload["id"], 2);

        let annie = cache.read_by_id(EntityType::Champions, "1", "en", None).unwrap().unwrap();
        assert_eq!(annie.payload["name"], "Annie");

        cache
            .clear(ClearTarget::Entity(EntityType::Champions), Some("en"))
            .unwrap();
        assert!(cache.read(EntityType::Champions, "en", None).unwrap().is_empty());
    }

    #[test]
    fn test_in_memory() {
        let cache = MetadataCache::open_in_memory().unwrap();
        cache
            .write(EntityType::Keywords, &[CacheItem::new("k", json!({"keyword": "k"}))], "en_US")
            .unwrap();
        assert!(!cache.is_stale(EntityType::Keywords, "en_US", Some(DAY)).unwrap());
    }
}
