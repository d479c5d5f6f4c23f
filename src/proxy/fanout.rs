//! Bounded fan-out/fan-in for per-item network tasks

use futures::stream::{self, StreamExt};
use std::future::Future;

/// Run `task` for every item with at most `limit` in flight, and collect
/// every result once all of them have settled.
///
/// Completion order is unspecified. A `limit` of 0 is treated as 1. The
/// caller is the only writer of the returned results, so no task ever
/// touches shared mutable state.
pub async fn run_bounded<I, T, F, Fut, R>(items: I, limit: usize, task: F) -> Vec<R>
where
    I: IntoIterator<Item = T>,
    F: FnMut(T) -> Fut,
    Fut: Future<Output = R>,
{
    stream::iter(items)
        .map(task)
        .buffer_unordered(limit.max(1))
        .collect::<Vec<_>>()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_run_bounded_collects_all() {
        let mut results = run_bounded(1..=10, 3, |n| async move { n * 2 }).await;
        results.sort();
        assert_eq!(results, (1..=10).map(|n| n * 2).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_run_bounded_respects_limit() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        run_bounded(0..20, 4, |_| {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        })
        .await;

        assert!(peak.load(Ordering::SeqCst) <= 4);
    }

    #[tokio::test]
    async fn test_run_bounded_zero_limit() {
        let results = run_bounded(vec![1, 2, 3], 0, |n| async move { n }).await;
        assert_eq!(results.len(), 3);
    }
}
