//! Search fetchers for the three geometric query modes.

use crate::state::{Place, SearchRequest};

use super::{Api, Result, normalize_places};

/// Endpoint path-and-query for a search request, parameter names per the
/// backend contract.
fn request_path(request: &SearchRequest) -> String {
    match request {
        SearchRequest::Radius { lat, lon, km } => {
            format!("/within_radius?lat={lat}&lon={lon}&km={km}")
        }
        SearchRequest::Bbox {
            north,
            south,
            east,
            west,
        } => format!("/within_bbox?north={north}&south={south}&east={east}&west={west}"),
        SearchRequest::Nearest { lat, lon, k } => {
            format!("/nearest?lat={lat}&lon={lon}&k={k}")
        }
    }
}

/// What: Run one backend search and normalize the response.
///
/// Inputs:
/// - `api`: Backend handle.
/// - `request`: Radius, bounding-box, or k-nearest parameters.
///
/// Output:
/// - Normalized places; the backend orders radius/nearest results by
///   distance.
///
/// # Errors
/// - Network failures, non-success statuses, JSON parse failures.
pub async fn fetch_search(api: &Api, request: &SearchRequest) -> Result<Vec<Place>> {
    let v = api.get_json(&request_path(request)).await?;
    Ok(normalize_places(&v))
}

/// Like [`fetch_search`], but errors become messages instead of failures so
/// the background worker can always deliver a (possibly empty) result set.
pub async fn fetch_search_with_errors(
    api: &Api,
    request: &SearchRequest,
) -> (Vec<Place>, Vec<String>) {
    match fetch_search(api, request).await {
        Ok(items) => (items, Vec::new()),
        Err(e) => (Vec::new(), vec![format!("search unavailable: {e}")]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// What: Request variants map to their endpoint parameters
    ///
    /// - Input: The three request kinds
    /// - Output: Paths carry the exact backend parameter names
    fn request_paths() {
        assert_eq!(
            request_path(&SearchRequest::Radius { lat: 1.5, lon: 2.5, km: 10.0 }),
            "/within_radius?lat=1.5&lon=2.5&km=10"
        );
        assert_eq!(
            request_path(&SearchRequest::Bbox { north: 4.0, south: 3.0, east: 2.0, west: 1.0 }),
            "/within_bbox?north=4&south=3&east=2&west=1"
        );
        assert_eq!(
            request_path(&SearchRequest::Nearest { lat: 1.5, lon: 2.5, k: 25 }),
            "/nearest?lat=1.5&lon=2.5&k=25"
        );
    }
}
