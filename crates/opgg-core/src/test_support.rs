//! Scripted [`Upstream`] used by unit tests.

use crate::error::{OpggError, Result};
use crate::fetch::{GamePage, GamePageRequest, Upstream};
use crate::network::MetadataKind;
use crate::params::{LangCode, Region};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A scripted history page.
pub enum FakePage {
    Games(Vec<Value>),
    Fail(u16),
    /// Never answers.
    Hang,
}

#[derive(Default)]
pub struct FakeUpstream {
    pub search_hits: HashMap<Region, Vec<Value>>,
    pub failing_regions: HashSet<Region>,
    pub profiles: HashMap<String, Value>,
    pub profile_delays: HashMap<String, Duration>,
    pub pages: Mutex<VecDeque<FakePage>>,
    /// Per-player pages, served before the shared queue.
    pub player_pages: Mutex<HashMap<String, VecDeque<FakePage>>>,
    pub page_cursors: Mutex<Vec<Option<String>>>,
    pub catalog: Vec<Value>,
    pub catalog_fails: bool,
    pub metadata: HashMap<&'static str, Vec<Value>>,
    pub live_game: Option<Value>,
    pub catalog_calls: AtomicUsize,
    pub item_calls: AtomicUsize,
    pub metadata_calls: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pages(self, pages: Vec<FakePage>) -> Self {
        *self.pages.lock().unwrap() = pages.into();
        self
    }

    pub fn with_player_pages(self, summoner_id: &str, pages: Vec<FakePage>) -> Self {
        self.player_pages
            .lock()
            .unwrap()
            .insert(summoner_id.to_string(), pages.into());
        self
    }

    pub fn cursors(&self) -> Vec<Option<String>> {
        self.page_cursors.lock().unwrap().clone()
    }

    fn fault(status: u16, what: &str) -> OpggError {
        OpggError::ServerFault {
            status,
            url: format!("fake://{}", what),
            body: None,
        }
    }
}

/// `count` games with strictly decreasing `created_at`, starting at `start`.
pub fn games(prefix: &str, start: u32, count: u32) -> Vec<Value> {
    (0..count)
        .map(|i| {
            let minute = start - i;
            json!({
                "id": format!("{}-{}", prefix, minute),
                "created_at": format!("2025-01-10T{:02}:{:02}:00+00:00", minute / 60, minute % 60),
                "game_type": "SOLORANKED",
                "game_length_second": 1800
            })
        })
        .collect()
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn search_region(
        &self,
        _riot_id: &str,
        region: Region,
        _lang: &LangCode,
    ) -> Result<Vec<Value>> {
        tokio::task::yield_now().await;
        if self.failing_regions.contains(&region) {
            return Err(Self::fault(503, region.as_str()));
        }
        Ok(self.search_hits.get(&region).cloned().unwrap_or_default())
    }

    async fn fetch_profile(
        &self,
        summoner_id: &str,
        _region: Region,
        _lang: &LangCode,
    ) -> Result<Value> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.profile_delays.get(summoner_id) {
            tokio::time::sleep(*delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.profiles
            .get(summoner_id)
            .cloned()
            .ok_or_else(|| OpggError::NotFound {
                url: format!("fake://profile/{}", summoner_id),
                body: None,
            })
    }

    async fn fetch_game_page(&self, request: &GamePageRequest<'_>) -> Result<GamePage> {
        self.page_cursors
            .lock()
            .unwrap()
            .push(request.ended_at.map(str::to_string));
        let own = self
            .player_pages
            .lock()
            .unwrap()
            .get_mut(request.summoner_id)
            .and_then(VecDeque::pop_front);
        let next = own.or_else(|| self.pages.lock().unwrap().pop_front());
        match next {
            Some(FakePage::Games(games)) => Ok(GamePage::new(games)),
            Some(FakePage::Fail(status)) => Err(Self::fault(status, "games")),
            Some(FakePage::Hang) => std::future::pending::<Result<GamePage>>().await,
            None => Ok(GamePage::default()),
        }
    }

    async fn fetch_catalog(&self, _lang: &LangCode) -> Result<Vec<Value>> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        if self.catalog_fails {
            return Err(Self::fault(500, "catalog"));
        }
        Ok(self.catalog.clone())
    }

    async fn fetch_catalog_item(&self, champion_id: i64, _lang: &LangCode) -> Result<Value> {
        self.item_calls.fetch_add(1, Ordering::SeqCst);
        self.catalog
            .iter()
            .find(|c| c["id"].as_i64() == Some(champion_id))
            .cloned()
            .ok_or_else(|| OpggError::NotFound {
                url: format!("fake://champion/{}", champion_id),
                body: None,
            })
    }

    async fn fetch_metadata(&self, kind: MetadataKind, _lang: &LangCode) -> Result<Vec<Value>> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.metadata
            .get(kind.as_str())
            .cloned()
            .ok_or_else(|| Self::fault(500, kind.as_str()))
    }

    async fn fetch_live_game(
        &self,
        _summoner_id: &str,
        _region: Region,
        _lang: &LangCode,
    ) -> Result<Option<Value>> {
        Ok(self.live_game.clone())
    }
}
