//! Bounded-concurrency settle-all execution for scan workloads.

use std::fmt::Display;
use std::future::Future;

use tokio::task::JoinSet;
use tracing::warn;

use crate::error::Result;

/// Run `task` over `items` in sequential batches of `width` concurrent tasks.
///
/// Every task in a batch is awaited before the next batch starts. A task may
/// resolve to `Ok(Some(value))` (collected), `Ok(None)` (skipped silently),
/// `Err` (logged and dropped) or panic (logged and dropped); one bad item
/// never aborts the batch. Completion order within a batch is arbitrary, so
/// callers must rank the collected values themselves.
pub async fn settle_batches<I, T, F, Fut>(items: Vec<I>, width: usize, task: F) -> Vec<T>
where
    I: Clone + Display + Send + 'static,
    T: Send + 'static,
    F: Fn(I) -> Fut,
    Fut: Future<Output = Result<Option<T>>> + Send + 'static,
{
    let mut out = Vec::new();
    if width == 0 {
        return out;
    }
    for chunk in items.chunks(width) {
        let mut set = JoinSet::new();
        for item in chunk {
            let label = item.to_string();
            let fut = task(item.clone());
            set.spawn(async move { (label, fut.await) });
        }
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((_, Ok(Some(value)))) => out.push(value),
                Ok((_, Ok(None))) => {}
                Ok((label, Err(err))) => {
                    warn!(item = %label, error = %err, "scan task failed");
                }
                Err(err) => {
                    warn!(error = %err, "scan task panicked");
                }
            }
        }
    }
    out
}
