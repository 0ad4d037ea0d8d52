//! Background search worker and the state handlers for its results.
//!
//! Search requests travel over an unbounded channel tagged with a monotonic
//! id; only results echoing the latest issued id may replace the store, so
//! a slow stale response can never clobber a newer result set.

use std::sync::Arc;
use std::time::Instant;

use tokio::{
    select,
    sync::mpsc,
    time::{Duration, sleep},
};

use crate::sources::{self, Api};
use crate::state::{AppState, QueryInput, SearchResults};

/// What: Spawn the background worker that serves search queries.
///
/// Inputs:
/// - `api`: Shared backend handle.
/// - `query_rx`: Channel receiver for tagged search requests.
/// - `result_tx`: Channel sender for tagged result sets.
/// - `net_err_tx`: Channel sender for transient network error messages.
///
/// Details:
/// - Debounces bursts of requests with a 250ms window, keeping only the
///   newest.
/// - Enforces a minimum 300ms interval between backend hits.
/// - Always delivers a result envelope (possibly empty) so the loading flag
///   can clear; errors flow over the separate error channel.
pub fn spawn_search_worker(
    api: Arc<Api>,
    mut query_rx: mpsc::UnboundedReceiver<QueryInput>,
    result_tx: mpsc::UnboundedSender<SearchResults>,
    net_err_tx: &mpsc::UnboundedSender<String>,
) {
    let net_err_tx = net_err_tx.clone();
    tokio::spawn(async move {
        const DEBOUNCE_MS: u64 = 250;
        const MIN_INTERVAL_MS: u64 = 300;
        let mut last_sent = Instant::now()
            .checked_sub(Duration::from_millis(MIN_INTERVAL_MS))
            .unwrap_or_else(Instant::now);
        loop {
            let Some(mut latest) = query_rx.recv().await else {
                break;
            };
            loop {
                select! {
                    Some(new_q) = query_rx.recv() => { latest = new_q; }
                    () = sleep(Duration::from_millis(DEBOUNCE_MS)) => { break; }
                }
            }
            let elapsed = last_sent.elapsed();
            if elapsed < Duration::from_millis(MIN_INTERVAL_MS) {
                sleep(Duration::from_millis(MIN_INTERVAL_MS) - elapsed).await;
            }
            last_sent = Instant::now();

            let sid = latest.id;
            let request = latest.request.clone();
            let api = Arc::clone(&api);
            let tx = result_tx.clone();
            let err_tx = net_err_tx.clone();
            tokio::spawn(async move {
                let (items, errors) = sources::fetch_search_with_errors(&api, &request).await;
                for e in errors {
                    let _ = err_tx.send(e);
                }
                let _ = tx.send(SearchResults { id: sid, items });
            });
        }
    });
}

/// What: Fold a result envelope into state, dropping stale responses.
///
/// Inputs:
/// - `app`: Mutable state carrying `latest_query_id`.
/// - `new_results`: Envelope from the worker.
///
/// Output:
/// - On a matching id: store replaced, pipeline re-run, loading cleared.
///   A mismatched id leaves state untouched.
pub fn handle_search_results(app: &mut AppState, new_results: SearchResults) {
    if new_results.id != app.latest_query_id {
        tracing::debug!(
            stale = new_results.id,
            latest = app.latest_query_id,
            "dropping stale search results"
        );
        return;
    }
    app.loading = false;
    app.replace_store(new_results.items);
}

/// Record a transient network error for the status banner.
pub fn handle_net_error(app: &mut AppState, message: String) {
    tracing::warn!(error = %message, "network error");
    app.last_error = Some(message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Place;

    fn results(id: u64, ids: &[i64]) -> SearchResults {
        SearchResults {
            id,
            items: ids
                .iter()
                .map(|&id| Place {
                    id,
                    name: format!("place {id}"),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    /// What: Stale results with a mismatched query id are ignored
    ///
    /// - Input: latest_query_id = 2; envelope with id = 1
    /// - Output: Store untouched, loading flag unchanged
    fn stale_results_dropped() {
        let mut app = AppState::default();
        app.latest_query_id = 2;
        app.loading = true;
        app.all_results = results(0, &[9]).items;
        handle_search_results(&mut app, results(1, &[1, 2]));
        assert_eq!(app.all_results.len(), 1);
        assert_eq!(app.all_results[0].id, 9);
        assert!(app.loading);
    }

    #[test]
    /// What: The latest envelope replaces the store wholesale
    ///
    /// - Input: latest_query_id = 2; envelope with id = 2
    /// - Output: Store replaced, derived view rebuilt, loading cleared
    fn latest_results_replace_store() {
        let mut app = AppState::default();
        app.latest_query_id = 2;
        app.loading = true;
        app.all_results = results(0, &[9]).items;
        handle_search_results(&mut app, results(2, &[1, 2]));
        assert_eq!(app.all_results.len(), 2);
        assert_eq!(app.results.len(), 2);
        assert!(!app.loading);
    }

    #[tokio::test]
    /// What: An out-of-order arrival cannot clobber the newer result set
    ///
    /// - Input: Envelopes for queries 1 and 2 arriving as 2 then 1
    /// - Output: The view keeps query 2's records
    async fn out_of_order_arrival() {
        let mut app = AppState::default();
        app.latest_query_id = 2;
        handle_search_results(&mut app, results(2, &[20]));
        handle_search_results(&mut app, results(1, &[10]));
        assert_eq!(app.all_results.len(), 1);
        assert_eq!(app.all_results[0].id, 20);
    }
}
