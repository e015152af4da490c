//! Domain models decoded from upstream JSON.
//!
//! Only identifying fields are required. Everything else is optional, and
//! fields we do not model are kept in `extra` so callers (and the cache) lose
//! nothing.

mod validation;

pub use validation::{
    decode_many, decode_one, extract_list, Schema, Validated, ValidationWarning, WarningKind,
};

use crate::params::Region;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Player descriptor returned by a name search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummonerSummary {
    pub summoner_id: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schema for SummonerSummary {
    const ENTITY: &'static str = "summoner";
    const EXPECTED_FIELDS: &'static [&'static str] = &["game_name", "tagline", "level"];
}

impl SummonerSummary {
    /// `name#tag`, when both halves are known.
    pub fn riot_id(&self) -> Option<String> {
        match (&self.game_name, &self.tagline) {
            (Some(name), Some(tag)) => Some(format!("{}#{}", name, tag)),
            _ => None,
        }
    }
}

/// A search hit tagged with the region it was found in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub region: Region,
    pub summoner: SummonerSummary,
}

/// Full profile from the summary endpoint (`data.summoner`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummonerProfile {
    pub summoner_id: String,
    #[serde(default)]
    pub game_name: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub profile_image_url: Option<String>,
    #[serde(default)]
    pub league_stats: Option<Vec<Value>>,
    #[serde(default)]
    pub previous_seasons: Option<Vec<Value>>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schema for SummonerProfile {
    const ENTITY: &'static str = "summoner_profile";
    const EXPECTED_FIELDS: &'static [&'static str] =
        &["game_name", "tagline", "level", "league_stats"];
}

/// One match record from the history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    #[serde(alias = "game_id")]
    pub id: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub game_type: Option<String>,
    #[serde(default)]
    pub game_length_second: Option<i64>,
    #[serde(default)]
    pub participants: Option<Vec<Value>>,
    #[serde(default)]
    pub teams: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schema for Game {
    const ENTITY: &'static str = "game";
    const EXPECTED_FIELDS: &'static [&'static str] =
        &["created_at", "game_type", "game_length_second"];
}

/// Catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    pub id: i64,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schema for Champion {
    const ENTITY: &'static str = "champion";
    const EXPECTED_FIELDS: &'static [&'static str] = &["key", "name", "image_url"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: i64,
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub display_value: Option<String>,
    #[serde(default)]
    pub split: Option<i64>,
    #[serde(default)]
    pub season: Option<i64>,
    #[serde(default)]
    pub is_preseason: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schema for Season {
    const ENTITY: &'static str = "season";
    const EXPECTED_FIELDS: &'static [&'static str] = &["value", "display_value"];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    pub keyword: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_op: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schema for Keyword {
    const ENTITY: &'static str = "keyword";
    const EXPECTED_FIELDS: &'static [&'static str] = &["label", "description"];
}

/// Spectator view of a match in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveGame {
    #[serde(default, alias = "game_id")]
    pub id: Option<Value>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub queue_info: Option<Value>,
    #[serde(default)]
    pub participants: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Schema for LiveGame {
    const ENTITY: &'static str = "live_game";
    const EXPECTED_FIELDS: &'static [&'static str] = &["participants"];
}
