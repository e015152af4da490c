//! Builder for configuring an [`Opgg`] client.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::api::Opgg;
use crate::cache::{CacheBackend, MetadataCache};
use crate::cancel::CancellationToken;
use crate::config::OpggConfig;
use crate::error::{OpggError, Result};
use crate::fetch::{HttpUpstream, Upstream};
use crate::network::{Endpoints, HttpClient};

/// Builder for configuring an [`Opgg`] client.
///
/// # Example
///
/// ```rust,ignore
/// use opgg_core::Opgg;
///
/// let client = Opgg::builder()
///     .db_path("/tmp/opgg.db")
///     .champion_ttl(std::time::Duration::from_secs(3600))
///     .build()?;
/// ```
pub struct OpggBuilder {
    config: OpggConfig,
    in_memory: bool,
    endpoints: Endpoints,
    operation_timeout: Option<Duration>,
    cache: Option<Arc<dyn CacheBackend>>,
    upstream: Option<Arc<dyn Upstream>>,
}

impl Default for OpggBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OpggBuilder {
    pub fn new() -> Self {
        Self::with_config(OpggConfig::default())
    }

    /// Start from an existing configuration (e.g. [`OpggConfig::from_env`]).
    pub fn with_config(config: OpggConfig) -> Self {
        Self {
            config,
            in_memory: false,
            endpoints: Endpoints::default(),
            operation_timeout: None,
            cache: None,
            upstream: None,
        }
    }

    /// Location of the SQLite cache file.
    pub fn db_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.db_path = path.into();
        self
    }

    /// Keep the cache in memory instead of on disk.
    pub fn in_memory(mut self) -> Self {
        self.in_memory = true;
        self
    }

    pub fn endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Total timeout for a single upstream request.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    pub fn champion_ttl(mut self, ttl: Duration) -> Self {
        self.config.champion_ttl = ttl;
        self
    }

    /// Maximum simultaneous requests for batch operations.
    pub fn batch_concurrency(mut self, limit: usize) -> Self {
        self.config.batch_concurrency = limit;
        self
    }

    /// Deadline applied to each orchestrated operation as a whole.
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = Some(timeout);
        self
    }

    /// Use an already constructed cache backend.
    pub fn cache(mut self, cache: Arc<dyn CacheBackend>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Use a custom upstream instead of HTTP.
    pub fn upstream(mut self, upstream: Arc<dyn Upstream>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Opgg> {
        if self.config.batch_concurrency == 0 {
            return Err(OpggError::Config {
                message: "batch_concurrency must be at least 1".to_string(),
            });
        }

        let cache: Arc<dyn CacheBackend> = match self.cache {
            Some(cache) => cache,
            None if self.in_memory => Arc::new(MetadataCache::open_in_memory()?),
            None => Arc::new(MetadataCache::open(&self.config.db_path)?),
        };

        let upstream: Arc<dyn Upstream> = match self.upstream {
            Some(upstream) => upstream,
            None => {
                let http = HttpClient::with_timeout(self.config.request_timeout)?;
                Arc::new(HttpUpstream::new(http, self.endpoints))
            }
        };

        Ok(Opgg {
            upstream,
            cache,
            config: self.config,
            operation_timeout: self.operation_timeout,
            token: CancellationToken::new(),
        })
    }
}
