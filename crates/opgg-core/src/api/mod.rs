//! The client facade.
//!
//! [`Opgg`] ties the fetch primitives, the orchestrator and the metadata cache
//! together. Methods are split across submodules by concern; each holds an
//! `impl Opgg` block.

mod builder;
mod cache_ops;
mod champions;
mod metadata;
mod summoners;

pub use builder::OpggBuilder;
pub use cache_ops::RefreshReport;
pub use summoners::{GameHistory, SearchResults};

use crate::cache::{CacheBackend, CacheItem, CacheRecord, EntityType};
use crate::cancel::{CancellationToken, OperationContext};
use crate::config::OpggConfig;
use crate::error::{OpggError, Result};
use crate::fetch::Upstream;
use crate::models::{decode_many, Schema, Validated, ValidationWarning};
use crate::params::LangCode;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Where a value was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Cache,
    Upstream,
}

/// A value plus how it was obtained.
///
/// `cache_error` is set when the value came from upstream but could not be
/// written back; the value itself is still good.
#[derive(Debug)]
pub struct Fetched<T> {
    pub value: T,
    pub source: DataSource,
    pub warnings: Vec<ValidationWarning>,
    pub cache_error: Option<OpggError>,
}

impl<T> Fetched<T> {
    fn cached(validated: Validated<T>) -> Self {
        Self {
            value: validated.value,
            source: DataSource::Cache,
            warnings: validated.warnings,
            cache_error: None,
        }
    }

    fn fetched(validated: Validated<T>, cache_error: Option<OpggError>) -> Self {
        Self {
            value: validated.value,
            source: DataSource::Upstream,
            warnings: validated.warnings,
            cache_error,
        }
    }

    pub fn from_cache(&self) -> bool {
        self.source == DataSource::Cache
    }
}

/// OP.GG client with a persistent metadata cache.
pub struct Opgg {
    pub(crate) upstream: Arc<dyn Upstream>,
    pub(crate) cache: Arc<dyn CacheBackend>,
    pub(crate) config: OpggConfig,
    pub(crate) operation_timeout: Option<Duration>,
    pub(crate) token: CancellationToken,
}

impl Opgg {
    pub fn builder() -> OpggBuilder {
        OpggBuilder::new()
    }

    pub fn config(&self) -> &OpggConfig {
        &self.config
    }

    /// Token shared by every operation of this client; cancelling it aborts
    /// whatever is in flight.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn cache(&self) -> &Arc<dyn CacheBackend> {
        &self.cache
    }

    pub(crate) fn context(&self) -> OperationContext {
        let ctx = OperationContext::new().with_token(self.token.clone());
        match self.operation_timeout {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }

    /// Cache read that degrades to a miss on store failure.
    pub(crate) fn read_cached(
        &self,
        entity_type: EntityType,
        lang: &LangCode,
        ttl: Option<Duration>,
    ) -> Vec<CacheRecord> {
        match self.cache.read(entity_type, lang.as_str(), ttl) {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    table = %entity_type,
                    lang = %lang,
                    error = %e,
                    "Cache read failed, treating as miss"
                );
                Vec::new()
            }
        }
    }

    pub(crate) fn read_cached_by_id(
        &self,
        entity_type: EntityType,
        key: &str,
        lang: &LangCode,
        ttl: Option<Duration>,
    ) -> Option<CacheRecord> {
        match self.cache.read_by_id(entity_type, key, lang.as_str(), ttl) {
            Ok(record) => record,
            Err(e) => {
                warn!(table = %entity_type, key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Whether a scope is fresh; store failures count as stale.
    pub(crate) fn scope_is_fresh(
        &self,
        entity_type: EntityType,
        lang: &LangCode,
        ttl: Option<Duration>,
    ) -> bool {
        match self.cache.is_stale(entity_type, lang.as_str(), ttl) {
            Ok(stale) => !stale,
            Err(e) => {
                warn!(table = %entity_type, error = %e, "Cache freshness check failed");
                false
            }
        }
    }

    /// Write-through; the error is returned for `Fetched::cache_error`.
    pub(crate) fn write_cached(
        &self,
        entity_type: EntityType,
        items: &[CacheItem],
        lang: &LangCode,
    ) -> Option<OpggError> {
        let result = self.cache.write(entity_type, items, lang.as_str());
        Self::cache_outcome(entity_type, lang, result)
    }

    /// Like [`Opgg::write_cached`] but for a complete list: rows the upstream
    /// no longer returns are dropped.
    pub(crate) fn replace_cached(
        &self,
        entity_type: EntityType,
        items: &[CacheItem],
        lang: &LangCode,
    ) -> Option<OpggError> {
        let result = self.cache.replace(entity_type, items, lang.as_str());
        Self::cache_outcome(entity_type, lang, result)
    }

    fn cache_outcome(
        entity_type: EntityType,
        lang: &LangCode,
        result: Result<usize>,
    ) -> Option<OpggError> {
        match result {
            Ok(_) => None,
            Err(e) => {
                warn!(table = %entity_type, lang = %lang, error = %e, "Cache write failed");
                Some(e)
            }
        }
    }
}

/// Decode cached payloads.
pub(crate) fn decode_records<T: Schema>(records: &[CacheRecord]) -> Validated<Vec<T>> {
    let payloads: Vec<_> = records.iter().map(|r| r.payload.clone()).collect();
    decode_many(&payloads)
}

/// A record that failed decoding where one value was required.
pub(crate) fn rejected(what: String, warning: ValidationWarning) -> OpggError {
    OpggError::ShapeMismatch {
        url: what,
        expected: format!("decodable {}", warning.entity),
        got: warning.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::cache::{CacheStats, ClearTarget, MetadataCache};
    use crate::test_support::FakeUpstream;

    /// A cache whose writes always fail.
    pub struct ReadOnlyCache(pub MetadataCache);

    impl CacheBackend for ReadOnlyCache {
        fn write(&self, _: EntityType, _: &[CacheItem], _: &str) -> Result<usize> {
            Err(OpggError::cache("attempt to write a readonly database"))
        }
        fn replace(&self, _: EntityType, _: &[CacheItem], _: &str) -> Result<usize> {
            Err(OpggError::cache("attempt to write a readonly database"))
        }
        fn read(&self, e: EntityType, l: &str, t: Option<Duration>) -> Result<Vec<CacheRecord>> {
            self.0.read(e, l, t)
        }
        fn read_by_id(
            &self,
            e: EntityType,
            k: &str,
            l: &str,
            t: Option<Duration>,
        ) -> Result<Option<CacheRecord>> {
            self.0.read_by_id(e, k, l, t)
        }
        fn read_by_name_substring(
            &self,
            e: EntityType,
            s: &str,
            l: &str,
            t: Option<Duration>,
        ) -> Result<Vec<CacheRecord>> {
            self.0.read_by_name_substring(e, s, l, t)
        }
        fn is_stale(&self, e: EntityType, l: &str, t: Option<Duration>) -> Result<bool> {
            self.0.is_stale(e, l, t)
        }
        fn stats(&self) -> Result<CacheStats> {
            self.0.stats()
        }
        fn clear(&self, t: ClearTarget, l: Option<&str>) -> Result<Vec<(EntityType, usize)>> {
            self.0.clear(t, l)
        }
    }

    pub fn client(fake: FakeUpstream) -> (Opgg, Arc<FakeUpstream>) {
        let fake = Arc::new(fake);
        let client = Opgg::builder()
            .in_memory()
            .upstream(fake.clone())
            .build()
            .unwrap();
        (client, fake)
    }

    pub fn client_with_cache(
        fake: FakeUpstream,
        cache: Arc<dyn CacheBackend>,
    ) -> (Opgg, Arc<FakeUpstream>) {
        let fake = Arc::new(fake);
        let client = Opgg::builder()
            .cache(cache)
            .upstream(fake.clone())
            .build()
            .unwrap();
        (client, fake)
    }
}
