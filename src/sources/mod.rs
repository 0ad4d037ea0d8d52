//! Backend data retrieval split into submodules, plus the shared client and
//! the defensive wire normalization every fetcher funnels through.

use serde_json::Value;
use zeroize::Zeroizing;

use crate::state::{ListStatus, Place, PlaceType, RestaurantAttrs, TouristAttrs};
use crate::util::{bool_of, f64_of, i64_of, s, str_arr};

mod groups;
mod lists;
mod search;

/// Shared result type for all fetchers.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Handle to the places backend: base URL, HTTP client, opaque bearer token.
///
/// The token is never interpreted; it is attached to every request as an
/// `Authorization` header and held in zeroizing memory so it does not
/// linger after drop.
pub struct Api {
    base: String,
    http: reqwest::Client,
    token: Option<Zeroizing<String>>,
}

impl Api {
    /// What: Build a client against a base URL.
    ///
    /// Inputs:
    /// - `base_url`: Backend root, with or without a trailing slash.
    /// - `timeout_secs`: Per-request timeout.
    /// - `token`: Optional opaque bearer token.
    ///
    /// # Errors
    /// - HTTP client construction failures (TLS backend initialization).
    pub fn new(base_url: &str, timeout_secs: u64, token: Option<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            base: base_url.trim_end_matches('/').to_string(),
            http,
            token: token.map(Zeroizing::new),
        })
    }

    /// Absolute URL for a path-and-query below the base.
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// What: GET a JSON document from the backend.
    ///
    /// # Errors
    /// - Network failures, non-success statuses, JSON parse failures.
    pub(crate) async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        let mut req = self.http.get(&url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token.as_str());
        }
        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        tracing::debug!(%url, status = status.as_u16(), bytes = body.len(), "GET");
        if !status.is_success() {
            return Err(http_error(&url, status, &body));
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// What: Send a JSON body with the given method and return the response
    /// document.
    ///
    /// # Errors
    /// - Network failures, non-success statuses, JSON parse failures.
    pub(crate) async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
    ) -> Result<Value> {
        let url = self.url(path);
        let mut req = self.http.request(method.clone(), &url).json(body);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token.as_str());
        }
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        tracing::debug!(%url, method = %method, status = status.as_u16(), bytes = text.len(), "request");
        if !status.is_success() {
            return Err(http_error(&url, status, &text));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Build an error carrying the backend's `error` field when it sent one.
fn http_error(url: &str, status: reqwest::StatusCode, body: &str) -> Box<dyn std::error::Error + Send + Sync> {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .map(|v| s(&v, "error"))
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| format!("status {status}"));
    format!("{url}: {detail}").into()
}

/// What: Normalize any of the backend's search/list response shapes into
/// places.
///
/// Inputs:
/// - `v`: Response document: `{features: [...]}`, `{places: [...]}`, or a
///   bare array.
///
/// Output:
/// - Parsed places; an unexpected shape coerces to an empty vector rather
///   than erroring (UI stability over silent loss, by long-standing
///   contract).
#[must_use]
pub fn normalize_places(v: &Value) -> Vec<Place> {
    let arr = if let Some(arr) = v.as_array() {
        arr
    } else if let Some(arr) = v.get("features").and_then(Value::as_array) {
        arr
    } else if let Some(arr) = v.get("places").and_then(Value::as_array) {
        arr
    } else {
        return Vec::new();
    };
    arr.iter().filter_map(place_from_value).collect()
}

/// What: Parse a single place object from the wire.
///
/// Output:
/// - `None` when the record has no usable id; otherwise a [`Place`] with
///   every optional field read leniently (numbers-as-strings accepted,
///   wrong types treated as absent).
#[must_use]
pub fn place_from_value(v: &Value) -> Option<Place> {
    let id = i64_of(v, "id").or_else(|| i64_of(v, "place_id"))?;
    let place_type = PlaceType::from_wire(&s(v, "place_type"));
    let restaurant = (place_type == PlaceType::Restaurant).then(|| RestaurantAttrs {
        cuisine_type: non_empty(s(v, "cuisine_type")),
        price_range: i64_of(v, "price_range").and_then(|p| u8::try_from(p).ok()),
        dietary_options: str_arr(v, "dietary_options"),
        delivery: bool_of(v, "delivery"),
        takeout: bool_of(v, "takeout"),
        reservations: bool_of(v, "reservations"),
        hours_of_operation: non_empty(s(v, "hours_of_operation")),
    });
    let tourist = (place_type == PlaceType::TouristPlace).then(|| TouristAttrs {
        tourist_type: non_empty(s(v, "tourist_type")),
        entry_fee: f64_of(v, "entry_fee"),
        family_friendly: bool_of(v, "family_friendly"),
        accessibility: bool_of(v, "accessibility"),
        pet_friendly: bool_of(v, "pet_friendly"),
        guided_tours: bool_of(v, "guided_tours"),
        tourist_hours: non_empty(s(v, "tourist_hours")),
    });
    Some(Place {
        id,
        name: s(v, "name"),
        city: s(v, "city"),
        state: s(v, "state"),
        country: s(v, "country"),
        lat: f64_of(v, "lat"),
        lon: f64_of(v, "lon"),
        place_type,
        rating: f64_of(v, "rating"),
        distance_km: f64_of(v, "distance_km"),
        list_status: list_status_from(v),
        restaurant,
        tourist,
    })
}

/// Read the `list_status` sub-object, or flat flags, into a [`ListStatus`].
fn list_status_from(v: &Value) -> Option<ListStatus> {
    let source = v.get("list_status").unwrap_or(v);
    let visited = bool_of(source, "visited");
    let in_wishlist = bool_of(source, "in_wishlist");
    let liked = bool_of(source, "liked");
    if visited.is_none() && in_wishlist.is_none() && liked.is_none() {
        return None;
    }
    Some(ListStatus {
        visited: visited.unwrap_or(false),
        in_wishlist: in_wishlist.unwrap_or(false),
        liked: liked.unwrap_or(false),
    })
}

/// Empty strings from `util::s` become `None`.
fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

pub use groups::{
    fetch_group_members, fetch_group_places, fetch_group_route, fetch_groups, save_group_route,
};
pub use lists::{add_to_list, fetch_personal_list, remove_from_list};
pub use search::{fetch_search, fetch_search_with_errors};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    /// What: All three response envelopes normalize identically
    ///
    /// - Input: Bare array, {features}, {places} wrapping the same record
    /// - Output: One place each; unexpected shapes yield empty
    fn normalize_accepts_all_shapes() {
        let record = json!({"id": 1, "name": "Pier 39", "city": "San Francisco",
                            "state": "California", "country": "USA",
                            "lat": 37.8, "lon": -122.4, "place_type": "tourist_place"});
        let bare = json!([record.clone()]);
        let features = json!({"features": [record.clone()], "count": 1});
        let places = json!({"success": true, "places": [record]});
        assert_eq!(normalize_places(&bare).len(), 1);
        assert_eq!(normalize_places(&features).len(), 1);
        assert_eq!(normalize_places(&places).len(), 1);
        assert!(normalize_places(&json!({"data": 3})).is_empty());
        assert!(normalize_places(&json!("oops")).is_empty());
    }

    #[test]
    /// What: Category attribute bags populate only for their category
    ///
    /// - Input: Restaurant record with flat attribute fields
    /// - Output: Restaurant bag filled, tourist bag absent
    fn place_parsing_attribute_bags() {
        let v = json!({
            "id": "41", "name": "Curry House", "city": "", "state": "", "country": "",
            "lat": 48.1, "lon": 11.5, "place_type": "restaurant",
            "cuisine_type": "indian; thai", "price_range": 2,
            "dietary_options": ["vegan"], "delivery": true,
            "rating": "4.2",
            "list_status": {"visited": false, "in_wishlist": true, "liked": false}
        });
        let p = place_from_value(&v).expect("record parses");
        assert_eq!(p.id, 41);
        assert_eq!(p.rating, Some(4.2));
        let attrs = p.restaurant.expect("restaurant bag");
        assert_eq!(attrs.cuisine_type.as_deref(), Some("indian; thai"));
        assert_eq!(attrs.price_range, Some(2));
        assert_eq!(attrs.delivery, Some(true));
        assert_eq!(attrs.takeout, None);
        assert!(p.tourist.is_none());
        assert!(p.list_status.expect("status").in_wishlist);
    }

    #[test]
    /// What: Records without an id are dropped, not guessed
    ///
    /// - Input: Record missing both id keys
    /// - Output: None
    fn place_requires_id() {
        assert!(place_from_value(&json!({"name": "ghost"})).is_none());
    }
}
