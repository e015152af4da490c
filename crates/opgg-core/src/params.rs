//! Request parameter enums shared by the fetch and cache layers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::OpggError;

/// Game server region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Region {
    NA,
    EUW,
    EUNE,
    KR,
    JP,
    BR,
    LAN,
    LAS,
    OCE,
    RU,
    TR,
}

impl Region {
    /// Every searchable region, in the order fan-out results are merged.
    pub const ALL: [Region; 11] = [
        Region::NA,
        Region::EUW,
        Region::EUNE,
        Region::KR,
        Region::JP,
        Region::BR,
        Region::LAN,
        Region::LAS,
        Region::OCE,
        Region::RU,
        Region::TR,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::NA => "NA",
            Region::EUW => "EUW",
            Region::EUNE => "EUNE",
            Region::KR => "KR",
            Region::JP => "JP",
            Region::BR => "BR",
            Region::LAN => "LAN",
            Region::LAS => "LAS",
            Region::OCE => "OCE",
            Region::RU => "RU",
            Region::TR => "TR",
        }
    }

    /// Path segment used by the upstream API (lower case).
    pub fn path_segment(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Region {
    type Err = OpggError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Region::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| OpggError::invalid_input("region", format!("unknown region '{}'", s)))
    }
}

/// Language scope for localized catalog and metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum LangCode {
    English,
    Korean,
    Japanese,
    Chinese,
    Other(String),
}

impl LangCode {
    pub fn as_str(&self) -> &str {
        match self {
            LangCode::English => "en_US",
            LangCode::Korean => "ko_KR",
            LangCode::Japanese => "ja_JP",
            LangCode::Chinese => "zh_CN",
            LangCode::Other(code) => code,
        }
    }
}

impl Default for LangCode {
    fn default() -> Self {
        LangCode::English
    }
}

impl From<String> for LangCode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "en_US" => LangCode::English,
            "ko_KR" => LangCode::Korean,
            "ja_JP" => LangCode::Japanese,
            "zh_CN" => LangCode::Chinese,
            _ => LangCode::Other(value),
        }
    }
}

impl From<&str> for LangCode {
    fn from(value: &str) -> Self {
        LangCode::from(value.to_string())
    }
}

impl From<LangCode> for String {
    fn from(value: LangCode) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for LangCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Match history filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    #[default]
    Total,
    Ranked,
    Normal,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Total => "total",
            GameType::Ranked => "ranked",
            GameType::Normal => "normal",
        }
    }
}

impl FromStr for GameType {
    type Err = OpggError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "total" => Ok(GameType::Total),
            "ranked" => Ok(GameType::Ranked),
            "normal" => Ok(GameType::Normal),
            _ => Err(OpggError::invalid_input(
                "game_type",
                format!("unknown game type '{}'", s),
            )),
        }
    }
}

/// Which cached metadata family an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    Champions,
    Seasons,
    Versions,
    Keywords,
    All,
}

impl CacheType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheType::Champions => "champions",
            CacheType::Seasons => "seasons",
            CacheType::Versions => "versions",
            CacheType::Keywords => "keywords",
            CacheType::All => "all",
        }
    }
}

impl FromStr for CacheType {
    type Err = OpggError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "champions" => Ok(CacheType::Champions),
            "seasons" => Ok(CacheType::Seasons),
            "versions" => Ok(CacheType::Versions),
            "keywords" => Ok(CacheType::Keywords),
            "all" => Ok(CacheType::All),
            _ => Err(OpggError::invalid_input(
                "cache_type",
                format!("unknown cache type '{}'", s),
            )),
        }
    }
}
