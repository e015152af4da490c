//! Multi-region name search.

use crate::cancel::OperationContext;
use crate::error::OpggError;
use crate::fetch::Upstream;
use crate::models::{ValidationWarning, WarningKind};
use crate::params::{LangCode, Region};
use futures::future::join_all;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

/// A player descriptor and the region it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub region: Region,
    pub descriptor: Value,
}

#[derive(Debug)]
pub struct RegionFailure {
    pub region: Region,
    pub error: OpggError,
}

#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// Unique players, first-seen in region order.
    pub matches: Vec<SearchMatch>,
    pub failed_regions: Vec<RegionFailure>,
    pub warnings: Vec<ValidationWarning>,
}

/// Search every region in `regions` concurrently and merge the hits.
///
/// A failing region is reported in `failed_regions` and contributes no
/// matches; it never fails the whole search.
pub async fn search_regions<U>(
    upstream: &U,
    riot_id: &str,
    regions: &[Region],
    lang: &LangCode,
    ctx: &OperationContext,
) -> SearchOutcome
where
    U: Upstream + ?Sized,
{
    let results = join_all(regions.iter().map(|&region| async move {
        let result = ctx.run(upstream.search_region(riot_id, region, lang)).await;
        (region, result)
    }))
    .await;

    let mut outcome = SearchOutcome::default();
    let mut seen = HashSet::new();

    for (region, result) in results {
        let hits = match result {
            Ok(hits) => hits,
            Err(error) => {
                warn!(region = %region, error = %error, "Region search failed");
                outcome.failed_regions.push(RegionFailure { region, error });
                continue;
            }
        };

        for descriptor in hits {
            let Some(id) = summoner_id(&descriptor) else {
                outcome.warnings.push(ValidationWarning::new(
                    "summoner",
                    "summoner_id",
                    WarningKind::Missing,
                ));
                continue;
            };
            if seen.insert(id) {
                outcome.matches.push(SearchMatch { region, descriptor });
            }
        }
    }

    debug!(
        riot_id,
        matches = outcome.matches.len(),
        failed = outcome.failed_regions.len(),
        "Multi-region search complete"
    );
    outcome
}

fn summoner_id(descriptor: &Value) -> Option<String> {
    match descriptor.get("summoner_id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeUpstream;
    use serde_json::json;

    fn hit(id: &str, name: &str) -> Value {
        json!({"summoner_id": id, "game_name": name, "tagline": "T1"})
    }

    #[tokio::test]
    async fn test_dedup_first_seen_in_region_order() {
        let mut fake = FakeUpstream::new();
        fake.search_hits.insert(Region::NA, vec![hit("a", "one"), hit("b", "two")]);
        fake.search_hits.insert(Region::KR, vec![hit("b", "two-kr"), hit("c", "three")]);

        let outcome = search_regions(
            &fake,
            "name#tag",
            &Region::ALL,
            &LangCode::English,
            &OperationContext::new(),
        )
        .await;

        let ids: Vec<_> = outcome
            .matches
            .iter()
            .map(|m| (m.region, m.descriptor["summoner_id"].as_str().unwrap()))
            .collect();
        assert_eq!(ids, vec![(Region::NA, "a"), (Region::NA, "b"), (Region::KR, "c")]);
        assert_eq!(outcome.matches[1].descriptor["game_name"], "two");
        assert!(outcome.failed_regions.is_empty());
    }

    #[tokio::test]
    async fn test_failing_region_contributes_nothing() {
        let mut fake = FakeUpstream::new();
        fake.search_hits.insert(Region::EUW, vec![hit("x", "eu")]);
        fake.search_hits.insert(Region::KR, vec![hit("y", "kr")]);
        fake.failing_regions.insert(Region::KR);

        let outcome = search_regions(
            &fake,
            "name#tag",
            &Region::ALL,
            &LangCode::English,
            &OperationContext::new(),
        )
        .await;

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].region, Region::EUW);
        assert_eq!(outcome.failed_regions.len(), 1);
        assert_eq!(outcome.failed_regions[0].region, Region::KR);
        assert_eq!(outcome.failed_regions[0].error.status_code(), Some(503));
    }

    #[tokio::test]
    async fn test_descriptor_without_id_is_dropped_with_warning() {
        let mut fake = FakeUpstream::new();
        fake.search_hits.insert(
            Region::NA,
            vec![json!({"game_name": "ghost"}), hit("a", "real")],
        );

        let outcome = search_regions(
            &fake,
            "ghost",
            &[Region::NA],
            &LangCode::English,
            &OperationContext::new(),
        )
        .await;

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].field, "summoner_id");
    }

    #[tokio::test]
    async fn test_cancelled_search_fails_every_region() {
        let fake = FakeUpstream::new();
        let ctx = OperationContext::new();
        ctx.token().cancel();

        let outcome = search_regions(&fake, "x", &Region::ALL, &LangCode::English, &ctx).await;
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.failed_regions.len(), Region::ALL.len());
        assert!(outcome
            .failed_regions
            .iter()
            .all(|f| matches!(f.error, OpggError::Cancelled)));
    }
}
