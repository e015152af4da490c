//! Champion catalog on Opgg, cache-first.
//!
//! A full catalog fetch writes three tables: the entries, the name index and
//! a per-language catalog marker. The marker alone decides whether the cached
//! catalog counts as complete; single-entry fetches never touch it.

use super::{decode_records, rejected, Fetched, Opgg};
use crate::cache::{CacheItem, EntityType};
use crate::error::{OpggError, Result};
use crate::models::{decode_many, decode_one, Champion};
use crate::params::LangCode;
use serde_json::{json, Value};
use tracing::{debug, info};

const CATALOG_MARKER_KEY: &str = "catalog";

impl Opgg {
    /// Every champion for `lang`.
    pub async fn get_all_champions(
        &self,
        lang: &LangCode,
        force_refresh: bool,
    ) -> Result<Fetched<Vec<Champion>>> {
        if !force_refresh && self.catalog_is_fresh(lang) {
            let ttl = Some(self.config.champion_ttl);
            let records = self.read_cached(EntityType::Champions, lang, ttl);
            if !records.is_empty() {
                debug!(lang = %lang, count = records.len(), "Champion catalog served from cache");
                return Ok(Fetched::cached(decode_records(&records)));
            }
        }

        let raws = self
            .context()
            .run(self.upstream.fetch_catalog(lang))
            .await?;
        let decoded = decode_many::<Champion>(&raws);
        let cache_error = self.store_catalog(&raws, lang);

        info!(lang = %lang, count = decoded.value.len(), "Fetched champion catalog");
        Ok(Fetched::fetched(decoded, cache_error))
    }

    pub async fn get_champion_by_id(
        &self,
        champion_id: i64,
        lang: &LangCode,
    ) -> Result<Fetched<Champion>> {
        let ttl = Some(self.config.champion_ttl);
        if let Some(record) =
            self.read_cached_by_id(EntityType::Champions, &champion_id.to_string(), lang, ttl)
        {
            if let Ok(decoded) = decode_one::<Champion>(&record.payload) {
                return Ok(Fetched::cached(decoded));
            }
        }

        let raw = self
            .context()
            .run(self.upstream.fetch_catalog_item(champion_id, lang))
            .await?;
        let decoded = decode_one::<Champion>(&raw)
            .map_err(|w| rejected(format!("champion/{}", champion_id), w))?;

        let (entries, names) = catalog_items(std::slice::from_ref(&raw));
        let cache_error = self
            .write_cached(EntityType::Champions, &entries, lang)
            .or_else(|| self.write_cached(EntityType::ChampionNames, &names, lang));

        Ok(Fetched::fetched(decoded, cache_error))
    }

    /// Champions whose name contains `text`, ignoring case.
    pub async fn get_champions_by_name(
        &self,
        text: &str,
        lang: &LangCode,
    ) -> Result<Fetched<Vec<Champion>>> {
        if self.catalog_is_fresh(lang) {
            let ttl = Some(self.config.champion_ttl);
            match self
                .cache
                .read_by_name_substring(EntityType::Champions, text, lang.as_str(), ttl)
            {
                Ok(records) => return Ok(Fetched::cached(decode_records(&records))),
                Err(e) => debug!(error = %e, "Name lookup failed in cache, using catalog"),
            }
        }

        let catalog = self.get_all_champions(lang, false).await?;
        let needle = text.to_lowercase();
        let value = catalog
            .value
            .into_iter()
            .filter(|c| {
                c.name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
            })
            .collect();

        Ok(Fetched {
            value,
            source: catalog.source,
            warnings: catalog.warnings,
            cache_error: catalog.cache_error,
        })
    }

    /// Exact (case-insensitive) name to id.
    pub async fn champion_id_by_name(&self, name: &str, lang: &LangCode) -> Result<Option<i64>> {
        let key = name.to_lowercase();
        let ttl = Some(self.config.champion_ttl);
        if let Some(id) = self
            .read_cached_by_id(EntityType::ChampionNames, &key, lang, ttl)
            .and_then(|record| record.payload.get("id").and_then(Value::as_i64))
        {
            return Ok(Some(id));
        }

        let catalog = self.get_all_champions(lang, false).await?;
        Ok(catalog
            .value
            .iter()
            .find(|c| c.name.as_deref().is_some_and(|n| n.to_lowercase() == key))
            .map(|c| c.id))
    }

    fn catalog_is_fresh(&self, lang: &LangCode) -> bool {
        self.scope_is_fresh(
            EntityType::ChampionCatalog,
            lang,
            Some(self.config.champion_ttl),
        )
    }

    /// Entries, then the name index, then the marker. Entries and names
    /// replace the whole language scope so champions dropped upstream go
    /// away. Stops at the first failure so a marker never claims a catalog
    /// that was not stored.
    fn store_catalog(&self, raws: &[Value], lang: &LangCode) -> Option<OpggError> {
        let (entries, names) = catalog_items(raws);
        let marker = [CacheItem::new(
            CATALOG_MARKER_KEY,
            json!({ "count": entries.len() }),
        )];

        self.replace_cached(EntityType::Champions, &entries, lang)
            .or_else(|| self.replace_cached(EntityType::ChampionNames, &names, lang))
            .or_else(|| self.write_cached(EntityType::ChampionCatalog, &marker, lang))
    }
}

/// Cache rows for catalog entries and the lower-cased name index.
fn catalog_items(raws: &[Value]) -> (Vec<CacheItem>, Vec<CacheItem>) {
    let mut entries = Vec::with_capacity(raws.len());
    let mut names = Vec::with_capacity(raws.len());

    for raw in raws {
        let Some(id) = raw.get("id").and_then(Value::as_i64) else {
            continue;
        };
        let name = raw.get("name").and_then(Value::as_str);

        let mut entry = CacheItem::new(id.to_string(), raw.clone());
        if let Some(name) = name {
            entry = entry.with_name(name);
            names.push(CacheItem::new(name.to_lowercase(), json!({ "id": id })).with_name(name));
        }
        entries.push(entry);
    }

    (entries, names)
}
