//! Bounded fan-out over explicit identifiers.

use crate::cancel::OperationContext;
use crate::error::Result;
use futures::stream::{self, StreamExt};
use std::future::Future;
use tracing::debug;

/// Run `fetch` once per id, at most `concurrency` at a time, each request
/// raced against `ctx`.
///
/// Results come back in input order. The first failure to complete (not
/// necessarily the earliest in input order) is returned and requests still
/// in flight are dropped.
pub async fn fetch_batch<I, T, F, Fut>(
    ids: Vec<I>,
    concurrency: usize,
    ctx: &OperationContext,
    fetch: F,
) -> Result<Vec<T>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    run_bounded(ids, concurrency, move |id| ctx.run(fetch(id))).await
}

/// [`fetch_batch`] for tasks that observe cancellation and deadlines
/// themselves and must be allowed to turn them into a result.
pub async fn run_bounded<I, T, F, Fut>(ids: Vec<I>, concurrency: usize, task: F) -> Result<Vec<T>>
where
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let total = ids.len();
    let mut slots: Vec<Option<T>> = (0..total).map(|_| None).collect();

    let mut results = stream::iter(ids.into_iter().enumerate())
        .map(|(index, id)| {
            let request = task(id);
            async move { (index, request.await) }
        })
        .buffer_unordered(concurrency.max(1));

    while let Some((index, result)) = results.next().await {
        slots[index] = Some(result?);
    }

    debug!(total, concurrency, "Batch fetch complete");
    Ok(slots.into_iter().flatten().collect())
}
