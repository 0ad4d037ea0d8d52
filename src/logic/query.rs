use tokio::sync::mpsc;

use crate::state::{AppState, QueryInput, SearchRequest};

/// What: Send a search request over the query channel with a fresh id.
///
/// Inputs:
/// - `app`: Mutable state; updates `next_query_id` and `latest_query_id`.
/// - `query_tx`: Channel to the background search worker.
///
/// Output:
/// - Sends a `QueryInput` with an incremented id; updates ids in `app`.
///
/// Details:
/// - The id correlates responses so stale results can be discarded: only
///   results echoing `latest_query_id` may replace the store.
pub fn send_query(
    app: &mut AppState,
    query_tx: &mpsc::UnboundedSender<QueryInput>,
    request: SearchRequest,
) {
    let id = app.next_query_id;
    app.next_query_id += 1;
    app.latest_query_id = id;
    app.loading = true;
    let _ = query_tx.send(QueryInput { id, request });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    /// What: Ensure `send_query` increments identifiers and forwards the request.
    ///
    /// Inputs:
    /// - Fresh `AppState` and a radius request.
    ///
    /// Output:
    /// - `latest_query_id` advances to `1` and the channel receives a
    ///   matching `QueryInput`.
    async fn send_query_increments_and_sends() {
        let mut app = AppState::default();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let request = SearchRequest::Radius {
            lat: 48.14,
            lon: 11.58,
            km: 5.0,
        };
        send_query(&mut app, &tx, request.clone());
        assert_eq!(app.latest_query_id, 1);
        assert_eq!(app.next_query_id, 2);
        assert!(app.loading);
        let q = tokio::time::timeout(std::time::Duration::from_millis(50), rx.recv())
            .await
            .ok()
            .flatten()
            .expect("query sent");
        assert_eq!(q.id, app.latest_query_id);
        assert_eq!(q.request, request);
    }
}
