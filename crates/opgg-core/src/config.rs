//! Centralized configuration for the OP.GG client.
//!
//! Constant groups follow the layout used across the crate; [`OpggConfig`] is
//! the runtime configuration handed to the builder.

use crate::error::{OpggError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Network-related configuration.
pub struct NetworkConfig;

impl NetworkConfig {
    pub const SUMMONER_API_BASE: &'static str = "https://lol-api-summoner.op.gg/api";
    pub const CHAMPION_API_BASE: &'static str = "https://lol-api-champion.op.gg/api";
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
    /// Upper bound on simultaneous requests for identifier-addressed batches.
    pub const BATCH_CONCURRENCY: usize = 8;
    /// Default number of games requested per history page.
    pub const GAMES_PAGE_SIZE: usize = 20;
}

/// Freshness thresholds for each cached metadata family.
pub struct CacheTtlConfig;

impl CacheTtlConfig {
    /// Champion catalog (overridable through [`OpggConfig`]).
    pub const CHAMPIONS: Duration = Duration::from_secs(7 * 24 * 60 * 60);
    pub const SEASONS: Duration = Duration::from_secs(7 * 24 * 60 * 60);
    pub const KEYWORDS: Duration = Duration::from_secs(24 * 60 * 60);
    pub const VERSIONS: Duration = Duration::from_secs(24 * 60 * 60);
    /// Environment variable overriding the champion catalog TTL, in seconds.
    pub const CHAMPION_TTL_ENV: &'static str = "OPGG_CHAMPION_CACHE_TTL";
}

/// Shared directory and path configurations.
pub struct PathsConfig;

impl PathsConfig {
    pub const CACHE_DIR_NAME: &'static str = "opgg";
    pub const CACHE_DB_FILENAME: &'static str = "opgg.db";
}

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct OpggConfig {
    /// SQLite file backing the metadata cache.
    pub db_path: PathBuf,
    /// Total timeout applied to every upstream request.
    pub request_timeout: Duration,
    /// TTL for the champion catalog.
    pub champion_ttl: Duration,
    /// Concurrency limit for identifier-addressed batches.
    pub batch_concurrency: usize,
}

impl Default for OpggConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            request_timeout: NetworkConfig::REQUEST_TIMEOUT,
            champion_ttl: CacheTtlConfig::CHAMPIONS,
            batch_concurrency: NetworkConfig::BATCH_CONCURRENCY,
        }
    }
}

impl OpggConfig {
    /// Defaults with the champion TTL override applied from the environment.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(CacheTtlConfig::CHAMPION_TTL_ENV) {
            config.champion_ttl = parse_ttl_override(&raw)?;
        }
        Ok(config)
    }
}

/// Parse a TTL override expressed in whole seconds.
pub fn parse_ttl_override(raw: &str) -> Result<Duration> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| OpggError::Config {
            message: format!(
                "{} must be a number of seconds, got '{}': {}",
                CacheTtlConfig::CHAMPION_TTL_ENV,
                raw,
                e
            ),
        })
}

/// `<platform cache dir>/opgg/opgg.db`, falling back to the working directory.
pub fn default_db_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(PathsConfig::CACHE_DIR_NAME)
        .join(PathsConfig::CACHE_DB_FILENAME)
}
