//! OP.GG Core - Client library for League of Legends player data and metadata.
//!
//! This crate fetches player profiles, match history and live games from the
//! OP.GG API, and keeps slow-changing metadata (champion catalog, seasons,
//! keywords, versions) in a local SQLite cache.
//!
//! # Example
//!
//! ```rust,ignore
//! use opgg_core::{LangCode, Opgg, Region};
//!
//! #[tokio::main]
//! async fn main() -> opgg_core::Result<()> {
//!     let client = Opgg::builder().build()?;
//!
//!     // Search every region for a Riot ID
//!     let found = client.search("Hide on bush#KR1", None, &LangCode::English).await?;
//!     println!("Found {} players", found.results.len());
//!
//!     // Champion catalog, served from cache after the first call
//!     let champions = client.get_all_champions(&LangCode::English, false).await?;
//!     println!("{} champions", champions.value.len());
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cancel;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;
pub mod network;
pub mod orchestrator;
pub mod params;

mod api;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use api::{DataSource, Fetched, GameHistory, Opgg, OpggBuilder, RefreshReport, SearchResults};
pub use cache::{CacheBackend, CacheStats, EntityType, MetadataCache};
pub use cancel::{CancellationToken, OperationContext};
pub use config::OpggConfig;
pub use error::{OpggError, Result};
pub use fetch::{HttpUpstream, Upstream};
pub use models::{
    Champion, Game, Keyword, LiveGame, SearchResult, Season, SummonerProfile, SummonerSummary,
    Validated, ValidationWarning,
};
pub use network::Endpoints;
pub use orchestrator::{HistoryOutcome, HistoryRequest, SearchOutcome, StopReason};
pub use params::{CacheType, GameType, LangCode, Region};
