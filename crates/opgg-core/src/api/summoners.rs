//! Player lookups on Opgg: search, profiles, history, live games.
//!
//! None of these are cached; player data changes too quickly.

use super::{rejected, Opgg};
use crate::error::Result;
use crate::models::{
    decode_many, decode_one, Game, LiveGame, SearchResult, SummonerProfile, SummonerSummary,
    Validated, ValidationWarning,
};
use crate::orchestrator::{
    self, fetch_batch, paginate_history, paginate_many, HistoryOutcome, HistoryRequest,
    RegionFailure, StopReason,
};
use crate::params::{LangCode, Region};
use tracing::info;

/// Decoded search hits plus anything that went wrong along the way.
#[derive(Debug, Default)]
pub struct SearchResults {
    pub results: Vec<SearchResult>,
    pub failed_regions: Vec<RegionFailure>,
    pub warnings: Vec<ValidationWarning>,
}

/// Decoded match history for one player.
#[derive(Debug)]
pub struct GameHistory {
    pub games: Vec<Game>,
    pub pages_fetched: usize,
    pub stop: StopReason,
    pub warnings: Vec<ValidationWarning>,
}

impl From<HistoryOutcome> for GameHistory {
    fn from(outcome: HistoryOutcome) -> Self {
        let decoded = decode_many::<Game>(&outcome.games);
        Self {
            games: decoded.value,
            pages_fetched: outcome.pages_fetched,
            stop: outcome.stop,
            warnings: decoded.warnings,
        }
    }
}

impl Opgg {
    /// Search by Riot ID (`name#tag`).
    ///
    /// With a region, that region's failure is returned as an error. Without
    /// one, every region is searched and failures are reported per region.
    pub async fn search(
        &self,
        riot_id: &str,
        region: Option<Region>,
        lang: &LangCode,
    ) -> Result<SearchResults> {
        let regions: &[Region] = match &region {
            Some(region) => std::slice::from_ref(region),
            None => &Region::ALL,
        };

        let mut outcome = orchestrator::search_regions(
            self.upstream.as_ref(),
            riot_id,
            regions,
            lang,
            &self.context(),
        )
        .await;

        if region.is_some() {
            if let Some(failure) = outcome.failed_regions.pop() {
                return Err(failure.error);
            }
        }

        let mut results = SearchResults {
            results: Vec::with_capacity(outcome.matches.len()),
            failed_regions: outcome.failed_regions,
            warnings: outcome.warnings,
        };

        for hit in outcome.matches {
            match decode_one::<SummonerSummary>(&hit.descriptor) {
                Ok(decoded) => {
                    results.warnings.extend(decoded.warnings);
                    results.results.push(SearchResult {
                        region: hit.region,
                        summoner: decoded.value,
                    });
                }
                Err(warning) => results.warnings.push(warning),
            }
        }

        info!(
            riot_id,
            results = results.results.len(),
            failed_regions = results.failed_regions.len(),
            "Search complete"
        );
        Ok(results)
    }

    pub async fn get_summoner(
        &self,
        summoner_id: &str,
        region: Region,
        lang: &LangCode,
    ) -> Result<Validated<SummonerProfile>> {
        let raw = self
            .context()
            .run(self.upstream.fetch_profile(summoner_id, region, lang))
            .await?;
        decode_one::<SummonerProfile>(&raw)
            .map_err(|w| rejected(format!("summoner/{}", summoner_id), w))
    }

    /// Fetch several profiles concurrently; results follow input order.
    pub async fn get_summoners(
        &self,
        players: &[(String, Region)],
        lang: &LangCode,
    ) -> Result<Vec<Validated<SummonerProfile>>> {
        let ctx = self.context();
        let raws = fetch_batch(
            players.iter().collect(),
            self.config.batch_concurrency,
            &ctx,
            |(summoner_id, region)| self.upstream.fetch_profile(summoner_id, *region, lang),
        )
        .await?;

        raws.iter()
            .zip(players)
            .map(|(raw, (summoner_id, _))| {
                decode_one::<SummonerProfile>(raw)
                    .map_err(|w| rejected(format!("summoner/{}", summoner_id), w))
            })
            .collect()
    }

    pub async fn get_recent_games(&self, request: &HistoryRequest) -> Result<GameHistory> {
        let outcome = paginate_history(self.upstream.as_ref(), request, &self.context()).await?;
        Ok(outcome.into())
    }

    /// Histories for several players; any first-page failure fails the batch.
    pub async fn get_recent_games_batch(
        &self,
        requests: &[HistoryRequest],
    ) -> Result<Vec<GameHistory>> {
        let outcomes = paginate_many(
            self.upstream.as_ref(),
            requests,
            self.config.batch_concurrency,
            &self.context(),
        )
        .await?;
        Ok(outcomes.into_iter().map(GameHistory::from).collect())
    }

    /// The match in progress, or `None` when the player is not in one.
    pub async fn get_live_game(
        &self,
        summoner_id: &str,
        region: Region,
        lang: &LangCode,
    ) -> Result<Option<Validated<LiveGame>>> {
        let raw = self
            .context()
            .run(self.upstream.fetch_live_game(summoner_id, region, lang))
            .await?;
        raw.map(|raw| {
            decode_one::<LiveGame>(&raw)
                .map_err(|w| rejected(format!("spectate/{}", summoner_id), w))
        })
        .transpose()
    }

    pub async fn is_in_live_game(
        &self,
        summoner_id: &str,
        region: Region,
        lang: &LangCode,
    ) -> Result<bool> {
        Ok(self.get_live_game(summoner_id, region, lang).await?.is_some())
    }
}
