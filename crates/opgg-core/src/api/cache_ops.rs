//! Cache maintenance on Opgg.

use super::Opgg;
use crate::cache::{CacheStats, ClearTarget, EntityType};
use crate::error::{OpggError, Result};
use crate::params::{CacheType, LangCode};
use tracing::{info, warn};

/// Families re-fetched by [`Opgg::refresh_cache`].
const REFRESHABLE: [CacheType; 4] = [
    CacheType::Champions,
    CacheType::Seasons,
    CacheType::Versions,
    CacheType::Keywords,
];

/// Outcome of [`Opgg::refresh_cache`].
#[derive(Debug, Default)]
pub struct RefreshReport {
    pub refreshed: Vec<(CacheType, LangCode)>,
    pub failed: Vec<(CacheType, LangCode, OpggError)>,
}

impl Opgg {
    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.cache.stats()
    }

    /// Delete cached rows of one family (or all), optionally for one language.
    pub fn clear_cache(
        &self,
        cache_type: CacheType,
        lang: Option<&LangCode>,
    ) -> Result<Vec<(EntityType, usize)>> {
        let lang = lang.map(LangCode::as_str);
        if cache_type == CacheType::All {
            return self.cache.clear(ClearTarget::All, lang);
        }

        let mut deleted = Vec::new();
        for entity_type in EntityType::for_cache_type(cache_type) {
            deleted.extend(self.cache.clear(ClearTarget::Entity(*entity_type), lang)?);
        }
        Ok(deleted)
    }

    /// Re-fetch every family for every language already in the cache.
    ///
    /// Failures are collected per (family, language); a failed write counts
    /// as a failure even though the fetch succeeded.
    pub async fn refresh_cache(&self) -> Result<RefreshReport> {
        let stats = self.cache.stats()?;
        let mut report = RefreshReport::default();

        for cache_type in REFRESHABLE {
            let languages = stats.languages_for(EntityType::for_cache_type(cache_type));
            for lang in languages.into_iter().map(LangCode::from) {
                let result = match cache_type {
                    CacheType::Champions => self
                        .get_all_champions(&lang, true)
                        .await
                        .map(|f| f.cache_error),
                    CacheType::Seasons => {
                        self.get_seasons(&lang, true).await.map(|f| f.cache_error)
                    }
                    CacheType::Versions => {
                        self.get_versions(&lang, true).await.map(|f| f.cache_error)
                    }
                    CacheType::Keywords => {
                        self.get_keywords(&lang, true).await.map(|f| f.cache_error)
                    }
                    CacheType::All => Ok(None),
                };

                match result {
                    Ok(None) => report.refreshed.push((cache_type, lang)),
                    Ok(Some(error)) | Err(error) => {
                        warn!(
                            cache_type = cache_type.as_str(),
                            lang = %lang,
                            error = %error,
                            "Refresh failed"
                        );
                        report.failed.push((cache_type, lang, error));
                    }
                }
            }
        }

        info!(
            refreshed = report.refreshed.len(),
            failed = report.failed.len(),
            "Cache refresh complete"
        );
        Ok(report)
    }
}
