//! Personal list fetchers and toggles (visited / wishlist / liked).

use serde_json::{Value, json};

use crate::state::{ListStatus, PersonalList, Place};

use super::{Api, Result, normalize_places};

/// What: Fetch one of the user's personal lists.
///
/// Inputs:
/// - `api`: Backend handle (must carry a token; the endpoint is
///   authenticated).
/// - `list`: Which list to load.
/// - `reference`: Optional `(lat, lon)` reference position; when present the
///   backend computes `distance_km` per place and orders by it.
///
/// Output:
/// - Normalized places with `list_status` populated; membership in the
///   fetched list is implied by presence, so the matching flag is forced on
///   even when the wire omits it.
///
/// # Errors
/// - Network failures, auth failures (401), JSON parse failures.
pub async fn fetch_personal_list(
    api: &Api,
    list: PersonalList,
    reference: Option<(f64, f64)>,
) -> Result<Vec<Place>> {
    let mut path = format!("/api/user/{}", list.as_path());
    if let Some((lat, lon)) = reference {
        path.push_str(&format!("?lat={lat}&lon={lon}"));
    }
    let v = api.get_json(&path).await?;
    let mut places = normalize_places(&v);
    let implied = status_for(list);
    for p in &mut places {
        let wire = p.list_status.unwrap_or_default();
        p.list_status = Some(ListStatus {
            visited: wire.visited || implied.visited,
            in_wishlist: wire.in_wishlist || implied.in_wishlist,
            liked: wire.liked || implied.liked,
        });
    }
    tracing::info!(list = list.as_path(), count = places.len(), "personal list loaded");
    Ok(places)
}

/// What: Add a place to one of the user's lists.
///
/// # Errors
/// - Network failures, 404 when the place does not exist, auth failures.
pub async fn add_to_list(api: &Api, list: PersonalList, place_id: i64) -> Result<()> {
    let path = format!("/api/user/{}", list.as_path());
    let body = json!({ "place_id": place_id });
    let v = api.send_json(reqwest::Method::POST, &path, &body).await?;
    ensure_success(&v)
}

/// What: Remove a place from one of the user's lists.
///
/// # Errors
/// - Network failures, auth failures.
pub async fn remove_from_list(api: &Api, list: PersonalList, place_id: i64) -> Result<()> {
    let path = format!("/api/user/{}/{place_id}", list.as_path());
    let v = api
        .send_json(reqwest::Method::DELETE, &path, &Value::Null)
        .await?;
    ensure_success(&v)
}

/// Reject bodies that carry `success: false` despite a 2xx status.
fn ensure_success(v: &Value) -> Result<()> {
    if v.get("success").and_then(Value::as_bool) == Some(false) {
        let msg = crate::util::s(v, "error");
        return Err(if msg.is_empty() {
            "backend reported failure".into()
        } else {
            msg.into()
        });
    }
    Ok(())
}

/// Convenience: the user's flags on a freshly fetched list entry.
#[must_use]
pub fn status_for(list: PersonalList) -> ListStatus {
    let mut status = ListStatus::default();
    match list {
        PersonalList::Visited => status.visited = true,
        PersonalList::Wishlist => status.in_wishlist = true,
        PersonalList::Liked => status.liked = true,
    }
    status
}
