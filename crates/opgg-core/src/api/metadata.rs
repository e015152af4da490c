//! Versions, seasons and keywords on Opgg, cache-first.

use super::{decode_records, Fetched, Opgg};
use crate::cache::{CacheItem, EntityType};
use crate::config::CacheTtlConfig;
use crate::error::Result;
use crate::models::{
    decode_many, Keyword, Schema, Season, Validated, ValidationWarning, WarningKind,
};
use crate::network::MetadataKind;
use crate::params::LangCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Key of the single row holding the version list.
const VERSIONS_KEY: &str = "versions";

impl Opgg {
    /// Game versions, newest first.
    pub async fn get_versions(
        &self,
        lang: &LangCode,
        force_refresh: bool,
    ) -> Result<Fetched<Vec<String>>> {
        let ttl = Some(CacheTtlConfig::VERSIONS);
        if !force_refresh {
            let cached = self.read_cached_by_id(EntityType::Versions, VERSIONS_KEY, lang, ttl);
            if let Some(list) = cached.as_ref().and_then(|record| record.payload.as_array()) {
                return Ok(Fetched::cached(version_strings(list)));
            }
        }

        let raws = self
            .context()
            .run(self.upstream.fetch_metadata(MetadataKind::Versions, lang))
            .await?;
        let item = CacheItem::new(VERSIONS_KEY, Value::Array(raws.clone()));
        let cache_error = self.write_cached(EntityType::Versions, &[item], lang);

        Ok(Fetched::fetched(version_strings(&raws), cache_error))
    }

    pub async fn get_seasons(
        &self,
        lang: &LangCode,
        force_refresh: bool,
    ) -> Result<Fetched<Vec<Season>>> {
        self.cached_metadata(
            MetadataKind::Seasons,
            EntityType::Seasons,
            CacheTtlConfig::SEASONS,
            lang,
            force_refresh,
            |raw| raw.get("id").and_then(Value::as_i64).map(|id| id.to_string()),
        )
        .await
    }

    pub async fn get_keywords(
        &self,
        lang: &LangCode,
        force_refresh: bool,
    ) -> Result<Fetched<Vec<Keyword>>> {
        self.cached_metadata(
            MetadataKind::Keywords,
            EntityType::Keywords,
            CacheTtlConfig::KEYWORDS,
            lang,
            force_refresh,
            |raw| raw.get("keyword").and_then(Value::as_str).map(str::to_string),
        )
        .await
    }

    /// Cache-first list of one row per entity, keyed by `key_of`. A fetch
    /// replaces the cached list for `lang` wholesale.
    async fn cached_metadata<T: Schema>(
        &self,
        kind: MetadataKind,
        entity_type: EntityType,
        ttl: Duration,
        lang: &LangCode,
        force_refresh: bool,
        key_of: fn(&Value) -> Option<String>,
    ) -> Result<Fetched<Vec<T>>> {
        if !force_refresh {
            let records = self.read_cached(entity_type, lang, Some(ttl));
            if !records.is_empty() {
                debug!(table = %entity_type, lang = %lang, "Metadata served from cache");
                return Ok(Fetched::cached(decode_records(&records)));
            }
        }

        let raws = self
            .context()
            .run(self.upstream.fetch_metadata(kind, lang))
            .await?;
        let decoded = decode_many::<T>(&raws);

        let items: Vec<CacheItem> = raws
            .iter()
            .filter_map(|raw| key_of(raw).map(|key| CacheItem::new(key, raw.clone())))
            .collect();
        let cache_error = self.replace_cached(entity_type, &items, lang);

        Ok(Fetched::fetched(decoded, cache_error))
    }
}

fn version_strings(raws: &[Value]) -> Validated<Vec<String>> {
    let mut versions = Vec::with_capacity(raws.len());
    let mut warnings = Vec::new();
    for raw in raws {
        match raw.as_str() {
            Some(version) => versions.push(version.to_string()),
            None => warnings.push(ValidationWarning::new(
                "version",
                "*",
                WarningKind::Rejected(format!("expected string, got {}", raw)),
            )),
        }
    }
    Validated {
        value: versions,
        warnings,
    }
}
