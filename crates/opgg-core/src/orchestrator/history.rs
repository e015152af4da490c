//! Cursor-paginated match history.

use super::batch::run_bounded;
use crate::cancel::OperationContext;
use crate::config::NetworkConfig;
use crate::error::{OpggError, Result};
use crate::fetch::{GamePageRequest, Upstream};
use crate::params::{GameType, LangCode, Region};
use serde_json::Value;
use tracing::{debug, warn};

/// What to page through for one player.
#[derive(Debug, Clone)]
pub struct HistoryRequest {
    pub summoner_id: String,
    pub region: Region,
    pub game_type: GameType,
    pub lang: LangCode,
    /// Games requested per page.
    pub page_size: usize,
    /// Stop once this many games have been collected.
    pub max_games: Option<usize>,
}

impl HistoryRequest {
    pub fn new(summoner_id: impl Into<String>, region: Region) -> Self {
        Self {
            summoner_id: summoner_id.into(),
            region,
            game_type: GameType::default(),
            lang: LangCode::default(),
            page_size: NetworkConfig::GAMES_PAGE_SIZE,
            max_games: None,
        }
    }

    pub fn game_type(mut self, game_type: GameType) -> Self {
        self.game_type = game_type;
        self
    }

    pub fn lang(mut self, lang: LangCode) -> Self {
        self.lang = lang;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn max_games(mut self, max_games: usize) -> Self {
        self.max_games = Some(max_games);
        self
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(OpggError::invalid_input("page_size", "must be at least 1"));
        }
        if self.max_games == Some(0) {
            return Err(OpggError::invalid_input("max_games", "must be at least 1"));
        }
        Ok(())
    }
}

/// Why a history chain ended.
#[derive(Debug)]
pub enum StopReason {
    /// The upstream returned an empty or short page.
    Exhausted,
    /// `max_games` was reached.
    LimitReached,
    /// A page after the first failed; earlier pages are kept.
    PartialFailure { error: OpggError },
}

#[derive(Debug)]
pub struct HistoryOutcome {
    pub games: Vec<Value>,
    pub pages_fetched: usize,
    pub stop: StopReason,
}

impl HistoryOutcome {
    pub fn is_partial(&self) -> bool {
        matches!(self.stop, StopReason::PartialFailure { .. })
    }
}

/// Page backwards through one player's history.
///
/// A failure on the first page is returned as an error; a failure on any
/// later page ends the chain with what was already collected.
pub async fn paginate_history<U>(
    upstream: &U,
    request: &HistoryRequest,
    ctx: &OperationContext,
) -> Result<HistoryOutcome>
where
    U: Upstream + ?Sized,
{
    request.validate()?;

    let mut games: Vec<Value> = Vec::new();
    let mut pages_fetched = 0;
    let mut cursor: Option<String> = None;

    let stop = loop {
        let page_request = GamePageRequest {
            summoner_id: &request.summoner_id,
            region: request.region,
            game_type: request.game_type,
            limit: request.page_size,
            lang: &request.lang,
            ended_at: cursor.as_deref(),
        };

        let page = match ctx.run(upstream.fetch_game_page(&page_request)).await {
            Ok(page) => page,
            Err(error) if pages_fetched == 0 => return Err(error),
            Err(error) => {
                warn!(
                    summoner_id = %request.summoner_id,
                    pages_fetched,
                    error = %error,
                    "History page failed, keeping earlier pages"
                );
                break StopReason::PartialFailure { error };
            }
        };

        pages_fetched += 1;
        let page_len = page.games.len();
        games.extend(page.games);

        if let Some(max_games) = request.max_games {
            if games.len() >= max_games {
                games.truncate(max_games);
                break StopReason::LimitReached;
            }
        }

        if page_len < request.page_size {
            break StopReason::Exhausted;
        }

        match page.cursor {
            Some(next) => cursor = Some(next),
            // A full page with no usable timestamps cannot be continued.
            None => break StopReason::Exhausted,
        }
    };

    debug!(
        summoner_id = %request.summoner_id,
        games = games.len(),
        pages_fetched,
        ?stop,
        "History pagination finished"
    );

    Ok(HistoryOutcome {
        games,
        pages_fetched,
        stop,
    })
}

/// Paginate several players concurrently, sequential within each player.
///
/// Any player whose first page fails fails the whole batch. A deadline or
/// cancellation after a player's first page ends only that chain, as a
/// partial failure.
pub async fn paginate_many<U>(
    upstream: &U,
    requests: &[HistoryRequest],
    concurrency: usize,
    ctx: &OperationContext,
) -> Result<Vec<HistoryOutcome>>
where
    U: Upstream + ?Sized,
{
    // Each page is already raced against ctx inside paginate_history.
    run_bounded(requests.iter().collect(), concurrency, |request| {
        paginate_history(upstream, request, ctx)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationToken;
    use crate::test_support::{games, FakePage, FakeUpstream};
    use std::time::Duration;

    fn request(page_size: usize) -> HistoryRequest {
        HistoryRequest::new("s1", Region::KR).page_size(page_size)
    }

    #[tokio::test]
    async fn test_short_page_ends_chain() {
        let fake = FakeUpstream::new().with_pages(vec![
            FakePage::Games(games("p1", 600, 20)),
            FakePage::Games(games("p2", 500, 7)),
        ]);

        let outcome = paginate_history(&fake, &request(20), &OperationContext::new())
            .await
            .unwrap();

        assert_eq!(outcome.games.len(), 27);
        assert_eq!(outcome.pages_fetched, 2);
        assert!(matches!(outcome.stop, StopReason::Exhausted));
    }

    #[tokio::test]
    async fn test_cursor_is_oldest_created_at_of_previous_page() {
        let fake = FakeUpstream::new().with_pages(vec![
            FakePage::Games(games("p1", 600, 3)),
            FakePage::Games(Vec::new()),
        ]);

        paginate_history(&fake, &request(3), &OperationContext::new())
            .await
            .unwrap();

        // Page one covers minutes 600, 599, 598; 598 minutes is 09:58.
        assert_eq!(
            fake.cursors(),
            vec![None, Some("2025-01-10T09:58:00+00:00".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_first_page() {
        let fake = FakeUpstream::new().with_pages(vec![FakePage::Games(Vec::new())]);
        let outcome = paginate_history(&fake, &request(20), &OperationContext::new())
            .await
            .unwrap();
        assert!(outcome.games.is_empty());
        assert_eq!(outcome.pages_fetched, 1);
    }

    #[tokio::test]
    async fn test_first_page_failure_is_error() {
        let fake = FakeUpstream::new().with_pages(vec![FakePage::Fail(503)]);
        let result = paginate_history(&fake, &request(20), &OperationContext::new()).await;
        assert!(matches!(result, Err(OpggError::ServerFault { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_later_failure_keeps_earlier_pages() {
        let fake = FakeUpstream::new().with_pages(vec![
            FakePage::Games(games("p1", 600, 20)),
            FakePage::Fail(500),
        ]);

        let outcome = paginate_history(&fake, &request(20), &OperationContext::new())
            .await
            .unwrap();

        assert_eq!(outcome.games.len(), 20);
        assert!(outcome.is_partial());
        match outcome.stop {
            StopReason::PartialFailure { error } => assert_eq!(error.status_code(), Some(500)),
            other => panic!("expected partial failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_max_games_caps_chain() {
        let fake = FakeUpstream::new().with_pages(vec![
            FakePage::Games(games("p1", 600, 10)),
            FakePage::Games(games("p2", 500, 10)),
            FakePage::Games(games("p3", 400, 10)),
        ]);

        let outcome = paginate_history(&fake, &request(10).max_games(15), &OperationContext::new())
            .await
            .unwrap();

        assert_eq!(outcome.games.len(), 15);
        assert_eq!(outcome.pages_fetched, 2);
        assert!(matches!(outcome.stop, StopReason::LimitReached));
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_after_first_page_is_partial() {
        let fake = FakeUpstream::new().with_pages(vec![
            FakePage::Games(games("p1", 600, 5)),
            FakePage::Hang,
        ]);
        let ctx = OperationContext::new().with_timeout(Duration::from_secs(2));

        let outcome = paginate_history(&fake, &request(5), &ctx).await.unwrap();

        assert_eq!(outcome.games.len(), 5);
        assert!(matches!(
            outcome.stop,
            StopReason::PartialFailure {
                error: OpggError::DeadlineExceeded(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_invalid_page_size() {
        let fake = FakeUpstream::new();
        let result = paginate_history(&fake, &request(0), &OperationContext::new()).await;
        assert!(matches!(result, Err(OpggError::InvalidInput { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_paginate_many_deadline_after_first_page_is_partial() {
        let fake = FakeUpstream::new()
            .with_player_pages("a", vec![FakePage::Games(games("a", 600, 5)), FakePage::Hang])
            .with_player_pages("b", vec![FakePage::Games(games("b", 500, 2))]);
        let requests = vec![
            HistoryRequest::new("a", Region::NA).page_size(5),
            HistoryRequest::new("b", Region::NA).page_size(5),
        ];
        let ctx = OperationContext::new().with_timeout(Duration::from_secs(2));

        let outcomes = paginate_many(&fake, &requests, 4, &ctx).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].games.len(), 5);
        assert!(matches!(
            outcomes[0].stop,
            StopReason::PartialFailure {
                error: OpggError::DeadlineExceeded(_)
            }
        ));
        assert_eq!(outcomes[1].games.len(), 2);
        assert!(matches!(outcomes[1].stop, StopReason::Exhausted));
    }

    #[tokio::test(start_paused = true)]
    async fn test_paginate_many_cancel_after_first_page_is_partial() {
        let fake = FakeUpstream::new()
            .with_player_pages("a", vec![FakePage::Games(games("a", 600, 3)), FakePage::Hang])
            .with_player_pages("b", vec![FakePage::Games(games("b", 500, 3)), FakePage::Hang]);
        let requests = vec![
            HistoryRequest::new("a", Region::NA).page_size(3),
            HistoryRequest::new("b", Region::NA).page_size(3),
        ];
        let token = CancellationToken::new();
        let ctx = OperationContext::new().with_token(token.clone());

        let (result, _) = tokio::join!(paginate_many(&fake, &requests, 2, &ctx), async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            token.cancel();
        });

        let outcomes = result.unwrap();
        assert_eq!(outcomes.len(), 2);
        for outcome in &outcomes {
            assert_eq!(outcome.games.len(), 3);
            assert_eq!(outcome.pages_fetched, 1);
            assert!(matches!(
                outcome.stop,
                StopReason::PartialFailure {
                    error: OpggError::Cancelled
                }
            ));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_paginate_many_deadline_before_first_page_fails() {
        let fake = FakeUpstream::new()
            .with_player_pages("a", vec![FakePage::Games(games("a", 600, 1))])
            .with_player_pages("b", vec![FakePage::Hang]);
        let requests = vec![
            HistoryRequest::new("a", Region::NA).page_size(5),
            HistoryRequest::new("b", Region::NA).page_size(5),
        ];
        let ctx = OperationContext::new().with_timeout(Duration::from_secs(2));

        let result = paginate_many(&fake, &requests, 4, &ctx).await;

        assert!(matches!(result, Err(OpggError::DeadlineExceeded(_))));
    }

    #[tokio::test]
    async fn test_paginate_many_keeps_order() {
        // Pages are handed out in request order; each player gets one short page.
        let fake = FakeUpstream::new().with_pages(vec![
            FakePage::Games(games("a", 600, 2)),
            FakePage::Games(games("b", 500, 1)),
        ]);
        let requests = vec![
            HistoryRequest::new("a", Region::NA).page_size(5),
            HistoryRequest::new("b", Region::NA).page_size(5),
        ];

        let outcomes = paginate_many(&fake, &requests, 1, &OperationContext::new())
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].games.len(), 2);
        assert_eq!(outcomes[1].games.len(), 1);
    }
}
