//! Fetch primitives.
//!
//! Each method issues exactly one upstream request and hands the response to
//! the classifier. No caching and no retries live at this layer; see
//! [`crate::orchestrator`] for composition and [`crate::api`] for caching.

use crate::error::{OpggError, Result};
use crate::network::{classify, ClassifyOptions, Endpoints, HttpClient, MetadataKind};
use crate::params::{GameType, LangCode, Region};
use async_trait::async_trait;
use chrono::DateTime;
use serde_json::Value;
use tracing::debug;

/// Parameters for one page of match history.
#[derive(Debug, Clone)]
pub struct GamePageRequest<'a> {
    pub summoner_id: &'a str,
    pub region: Region,
    pub game_type: GameType,
    pub limit: usize,
    pub lang: &'a LangCode,
    /// Only return games that ended before this timestamp.
    pub ended_at: Option<&'a str>,
}

/// One page of match history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GamePage {
    pub games: Vec<Value>,
    /// `created_at` of the oldest game in the page.
    pub cursor: Option<String>,
}

impl GamePage {
    pub fn new(games: Vec<Value>) -> Self {
        let cursor = oldest_created_at(&games);
        Self { games, cursor }
    }
}

/// The upstream API, one request per call.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Player descriptors matching `riot_id` in one region.
    async fn search_region(&self, riot_id: &str, region: Region, lang: &LangCode)
        -> Result<Vec<Value>>;

    /// The `data.summoner` object of a profile summary.
    async fn fetch_profile(&self, summoner_id: &str, region: Region, lang: &LangCode)
        -> Result<Value>;

    async fn fetch_game_page(&self, request: &GamePageRequest<'_>) -> Result<GamePage>;

    /// Every catalog entry for a language.
    async fn fetch_catalog(&self, lang: &LangCode) -> Result<Vec<Value>>;

    async fn fetch_catalog_item(&self, champion_id: i64, lang: &LangCode) -> Result<Value>;

    /// Entries of a metadata list (versions, seasons or keywords).
    async fn fetch_metadata(&self, kind: MetadataKind, lang: &LangCode) -> Result<Vec<Value>>;

    /// The spectator payload, or `None` when the player is not in a match.
    async fn fetch_live_game(
        &self,
        summoner_id: &str,
        region: Region,
        lang: &LangCode,
    ) -> Result<Option<Value>>;
}

/// [`Upstream`] over HTTP.
#[derive(Debug)]
pub struct HttpUpstream {
    http: HttpClient,
    endpoints: Endpoints,
}

impl HttpUpstream {
    pub fn new(http: HttpClient, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get(&self, url: &str, options: ClassifyOptions<'_>) -> Result<Option<Value>> {
        let response = self.http.get(url).await?;
        classify(&response, &options)
    }

    /// GET and classify where 404 is an error, so a body is always present.
    async fn get_required(&self, url: &str, keys: &[&str]) -> Result<Value> {
        self.get(url, ClassifyOptions::require(keys))
            .await?
            .ok_or_else(|| OpggError::NotFound {
                url: url.to_string(),
                body: None,
            })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn search_region(
        &self,
        riot_id: &str,
        region: Region,
        lang: &LangCode,
    ) -> Result<Vec<Value>> {
        let url = self.endpoints.search(riot_id, region, lang)?;
        let body = self.get_required(&url, &["data"]).await?;
        let hits = data_list(&url, body)?;
        debug!(region = %region, hits = hits.len(), "Region search complete");
        Ok(hits)
    }

    async fn fetch_profile(
        &self,
        summoner_id: &str,
        region: Region,
        lang: &LangCode,
    ) -> Result<Value> {
        let url = self.endpoints.profile(summoner_id, region, lang)?;
        let body = self.get_required(&url, &["data"]).await?;
        match body.get("data").and_then(|data| data.get("summoner")) {
            Some(summoner) if summoner.is_object() => Ok(summoner.clone()),
            _ => Err(OpggError::ShapeMismatch {
                url,
                expected: "data.summoner object".to_string(),
                got: "no summoner object".to_string(),
            }),
        }
    }

    async fn fetch_game_page(&self, request: &GamePageRequest<'_>) -> Result<GamePage> {
        let url = self.endpoints.games(
            request.summoner_id,
            request.region,
            request.limit,
            request.game_type,
            request.lang,
            request.ended_at,
        )?;
        let body = self.get_required(&url, &["data"]).await?;
        Ok(GamePage::new(data_list(&url, body)?))
    }

    async fn fetch_catalog(&self, lang: &LangCode) -> Result<Vec<Value>> {
        let url = self.endpoints.catalog(lang)?;
        let body = self.get_required(&url, &["data"]).await?;
        data_list(&url, body)
    }

    async fn fetch_catalog_item(&self, champion_id: i64, lang: &LangCode) -> Result<Value> {
        let url = self.endpoints.catalog_item(champion_id, lang)?;
        let mut body = self.get_required(&url, &["data"]).await?;
        match body.get_mut("data").map(Value::take) {
            Some(item @ Value::Object(_)) => Ok(item),
            _ => Err(OpggError::ShapeMismatch {
                url,
                expected: "data object".to_string(),
                got: "non-object data".to_string(),
            }),
        }
    }

    async fn fetch_metadata(&self, kind: MetadataKind, lang: &LangCode) -> Result<Vec<Value>> {
        let url = self.endpoints.metadata(kind, lang)?;
        // Some metadata lists come wrapped twice (`{"data": {"keywords": [...]}}`).
        let body = self.get_required(&url, &[]).await?;
        crate::models::extract_list(&body, &["data", kind.as_str()]).ok_or_else(|| {
            OpggError::ShapeMismatch {
                url,
                expected: format!("list of {}", kind.as_str()),
                got: "no list".to_string(),
            }
        })
    }

    async fn fetch_live_game(
        &self,
        summoner_id: &str,
        region: Region,
        lang: &LangCode,
    ) -> Result<Option<Value>> {
        let url = self.endpoints.live_game(summoner_id, region, lang)?;
        let body = self
            .get(&url, ClassifyOptions::require(&["data"]).allow_absent())
            .await?;
        Ok(body.and_then(|mut body| match body.get_mut("data").map(Value::take) {
            Some(Value::Null) | None => None,
            Some(data) => Some(data),
        }))
    }
}

fn data_list(url: &str, mut body: Value) -> Result<Vec<Value>> {
    match body.get_mut("data").map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(OpggError::ShapeMismatch {
            url: url.to_string(),
            expected: "data array".to_string(),
            got: format!("data {}", if other.is_object() { "object" } else { "scalar" }),
        }),
        None => Err(OpggError::ShapeMismatch {
            url: url.to_string(),
            expected: "data array".to_string(),
            got: "no data".to_string(),
        }),
    }
}

/// The earliest `created_at` among `games`.
///
/// Timestamps are compared as RFC 3339 instants when they parse; if none do,
/// the last record's raw value is used since pages arrive newest first.
pub fn oldest_created_at(games: &[Value]) -> Option<String> {
    let stamps: Vec<&str> = games
        .iter()
        .filter_map(|game| game.get("created_at").and_then(Value::as_str))
        .collect();

    stamps
        .iter()
        .filter_map(|raw| DateTime::parse_from_rfc3339(raw).ok().map(|ts| (ts, *raw)))
        .min_by_key(|(ts, _)| *ts)
        .map(|(_, raw)| raw.to_string())
        .or_else(|| stamps.last().map(|raw| raw.to_string()))
}
