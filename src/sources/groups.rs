//! Group fetchers: groups, members, group places, and the shared route.

use serde_json::{Value, json};

use crate::state::{
    Group, GroupMember, GroupPlace, MemberListStatus, PlaceType, RoutePlace, RouteSaveEntry,
};
use crate::util::{i64_of, s};

use super::{Api, Result, place_from_value};

/// What: Fetch the groups the user belongs to.
///
/// Output:
/// - Parsed groups; `created_by` carries the creator's username when the
///   backend sends one, falling back to the raw id.
///
/// # Errors
/// - Network failures, auth failures.
pub async fn fetch_groups(api: &Api) -> Result<Vec<Group>> {
    let v = api.get_json("/api/groups").await?;
    let arr = v
        .get("groups")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    Ok(arr.iter().map(group_from_value).collect())
}

/// What: Fetch one group's member roster.
///
/// # Errors
/// - Network failures, 403 when the user is not a member.
pub async fn fetch_group_members(api: &Api, group_id: i64) -> Result<Vec<GroupMember>> {
    let v = api.get_json(&format!("/api/groups/{group_id}")).await?;
    let arr = v
        .get("members")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    Ok(arr
        .iter()
        .filter_map(|m| {
            Some(GroupMember {
                user_id: i64_of(m, "user_id")?,
                username: s(m, "username"),
                role: s(m, "role"),
            })
        })
        .collect())
}

/// What: Fetch the union of the members' list places with per-member flags.
///
/// Output:
/// - One [`GroupPlace`] per place; members with unparsable entries are
///   skipped rather than failing the whole view.
///
/// # Errors
/// - Network failures, 403 when the user is not a member.
pub async fn fetch_group_places(api: &Api, group_id: i64) -> Result<Vec<GroupPlace>> {
    let v = api.get_json(&format!("/api/groups/{group_id}/places")).await?;
    let arr = v
        .get("places")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let places: Vec<GroupPlace> = arr
        .iter()
        .filter_map(|entry| {
            let place = place_from_value(entry)?;
            let members = entry
                .get("members")
                .and_then(Value::as_array)
                .map(|ms| ms.iter().filter_map(member_status_from).collect())
                .unwrap_or_default();
            Some(GroupPlace { place, members })
        })
        .collect();
    tracing::info!(group_id, count = places.len(), "group places loaded");
    Ok(places)
}

/// What: Fetch the group's saved route stops.
///
/// Output:
/// - Stops in whatever order and indexing the backend stored; the sequencer
///   densifies on load. Accepts `{route: [...]}`, `{places: [...]}`, or a
///   bare array.
///
/// # Errors
/// - Network failures, 403 when the user is not a member.
pub async fn fetch_group_route(api: &Api, group_id: i64) -> Result<Vec<RoutePlace>> {
    let v = api.get_json(&format!("/api/groups/{group_id}/route")).await?;
    let arr = if let Some(arr) = v.as_array() {
        arr.clone()
    } else if let Some(arr) = v.get("route").and_then(Value::as_array) {
        arr.clone()
    } else if let Some(arr) = v.get("places").and_then(Value::as_array) {
        arr.clone()
    } else {
        Vec::new()
    };
    Ok(arr.iter().filter_map(route_place_from_value).collect())
}

/// What: Persist the full ordered route for a group.
///
/// Inputs:
/// - `entries`: The complete `{place_id, order_index}` list; the backend
///   replaces the stored route wholesale.
/// - `is_auto_generated`: Marks routes produced by an optimizer rather than
///   hand ordering.
///
/// # Errors
/// - Network failures; the caller keeps its local edits on failure.
pub async fn save_group_route(
    api: &Api,
    group_id: i64,
    entries: &[RouteSaveEntry],
    is_auto_generated: bool,
) -> Result<()> {
    let body = json!({
        "route": entries,
        "is_auto_generated": is_auto_generated,
    });
    let v = api
        .send_json(
            reqwest::Method::PUT,
            &format!("/api/groups/{group_id}/route"),
            &body,
        )
        .await?;
    if v.get("success").and_then(Value::as_bool) == Some(false) {
        let msg = s(&v, "error");
        return Err(if msg.is_empty() {
            "route save rejected".into()
        } else {
            msg.into()
        });
    }
    tracing::info!(group_id, stops = entries.len(), "route saved");
    Ok(())
}

/// Parse one group summary, tolerating missing fields.
fn group_from_value(v: &Value) -> Group {
    let creator = {
        let name = s(v, "creator_username");
        if name.is_empty() {
            i64_of(v, "created_by").map(|id| id.to_string()).unwrap_or_default()
        } else {
            name
        }
    };
    Group {
        group_id: i64_of(v, "group_id").unwrap_or_default(),
        name: s(v, "name"),
        description: s(v, "description"),
        created_by: creator,
        your_role: s(v, "your_role"),
    }
}

/// Parse one member's flags on a group place.
fn member_status_from(v: &Value) -> Option<MemberListStatus> {
    Some(MemberListStatus {
        user_id: i64_of(v, "user_id")?,
        username: s(v, "username"),
        visited: v.get("visited").and_then(Value::as_bool).unwrap_or(false),
        in_wishlist: v.get("in_wishlist").and_then(Value::as_bool).unwrap_or(false),
        liked: v.get("liked").and_then(Value::as_bool).unwrap_or(false),
    })
}

/// Parse one stored route stop; stops without id or coordinates are skipped.
fn route_place_from_value(v: &Value) -> Option<RoutePlace> {
    Some(RoutePlace {
        place_id: i64_of(v, "place_id").or_else(|| i64_of(v, "id"))?,
        name: s(v, "name"),
        city: s(v, "city"),
        state: s(v, "state"),
        country: s(v, "country"),
        lat: crate::util::f64_of(v, "lat")?,
        lon: crate::util::f64_of(v, "lon")?,
        place_type: PlaceType::from_wire(&s(v, "place_type")),
        order_index: i64_of(v, "order_index")
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or(0),
    })
}
