//! Upstream URL construction.

use crate::config::NetworkConfig;
use crate::error::{OpggError, Result};
use crate::params::{GameType, LangCode, Region};
use url::Url;

/// Metadata families served as plain lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    Versions,
    Seasons,
    Keywords,
}

impl MetadataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataKind::Versions => "versions",
            MetadataKind::Seasons => "seasons",
            MetadataKind::Keywords => "keywords",
        }
    }
}

/// API base URLs. Overridable so tests can point at a local mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    summoner_base: String,
    champion_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(NetworkConfig::SUMMONER_API_BASE, NetworkConfig::CHAMPION_API_BASE)
    }
}

impl Endpoints {
    pub fn new(summoner_base: impl Into<String>, champion_base: impl Into<String>) -> Self {
        Self {
            summoner_base: summoner_base.into().trim_end_matches('/').to_string(),
            champion_base: champion_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Point both bases at one server, e.g. `http://127.0.0.1:PORT/api`.
    pub fn single_base(base: impl Into<String>) -> Self {
        let base = base.into();
        Self::new(base.clone(), base)
    }

    pub fn search(&self, riot_id: &str, region: Region, lang: &LangCode) -> Result<String> {
        build(
            &format!("{}/v3/{}/summoners", self.summoner_base, region.path_segment()),
            &[("riot_id", riot_id), ("hl", lang.as_str())],
        )
    }

    pub fn profile(&self, summoner_id: &str, region: Region, lang: &LangCode) -> Result<String> {
        build(
            &format!(
                "{}/{}/summoners/{}/summary",
                self.summoner_base,
                region.path_segment(),
                urlencoding::encode(summoner_id)
            ),
            &[("hl", lang.as_str())],
        )
    }

    pub fn games(
        &self,
        summoner_id: &str,
        region: Region,
        limit: usize,
        game_type: GameType,
        lang: &LangCode,
        ended_at: Option<&str>,
    ) -> Result<String> {
        let limit = limit.to_string();
        let mut params = vec![
            ("limit", limit.as_str()),
            ("game_type", game_type.as_str()),
            ("hl", lang.as_str()),
        ];
        if let Some(cursor) = ended_at {
            params.push(("ended_at", cursor));
        }
        build(
            &format!(
                "{}/{}/summoners/{}/games",
                self.summoner_base,
                region.path_segment(),
                urlencoding::encode(summoner_id)
            ),
            &params,
        )
    }

    pub fn live_game(&self, summoner_id: &str, region: Region, lang: &LangCode) -> Result<String> {
        build(
            &format!(
                "{}/{}/summoners/{}/spectate",
                self.summoner_base,
                region.path_segment(),
                urlencoding::encode(summoner_id)
            ),
            &[("hl", lang.as_str())],
        )
    }

    pub fn catalog(&self, lang: &LangCode) -> Result<String> {
        build(
            &format!("{}/meta/champions", self.champion_base),
            &[("hl", lang.as_str())],
        )
    }

    pub fn catalog_item(&self, champion_id: i64, lang: &LangCode) -> Result<String> {
        build(
            &format!("{}/meta/champions/{}", self.champion_base, champion_id),
            &[("hl", lang.as_str())],
        )
    }

    pub fn metadata(&self, kind: MetadataKind, lang: &LangCode) -> Result<String> {
        // Versions live on the champion API, the rest on the summoner API.
        let base = match kind {
            MetadataKind::Versions => &self.champion_base,
            MetadataKind::Seasons | MetadataKind::Keywords => &self.summoner_base,
        };
        build(
            &format!("{}/meta/{}", base, kind.as_str()),
            &[("hl", lang.as_str())],
        )
    }
}

fn build(path: &str, params: &[(&str, &str)]) -> Result<String> {
    Url::parse_with_params(path, params)
        .map(String::from)
        .map_err(|e| OpggError::Config {
            message: format!("Invalid endpoint URL '{}': {}", path, e),
        })
}
