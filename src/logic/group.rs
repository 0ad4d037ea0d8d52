//! Group membership filter stage.
//!
//! Deliberately separate from the generic stage: here an empty place-type
//! set (and an empty member selection) yields no results, where the generic
//! stage treats an empty set as "no restriction". The asymmetry is
//! long-standing UX and must not be unified.

use std::collections::HashSet;

use crate::state::{GroupPlace, MemberFilters, MemberListStatus, PlaceType, StatusFilter};

/// What: Filter the group view's places by type and per-member statuses.
///
/// Inputs:
/// - `places`: Group places with per-member flags.
/// - `place_types`: Selected categories; an EMPTY set yields no results.
/// - `selected_members`: User ids whose lists participate; empty yields no
///   results (the view requires at least one member selected).
/// - `member_filters`: Per-member selected status sets.
///
/// Output:
/// - Places passing the type filter for which ANY selected member's status
///   set intersects that member's actual statuses.
///
/// Details:
/// - Per member the test is set intersection, not subset: one overlapping
///   status suffices.
/// - A member whose actual flags are all false carries the single status
///   `Nothing`.
/// - A selected member without a filter entry contributes no matches.
#[must_use]
pub fn filter_group_places(
    places: &[GroupPlace],
    place_types: &HashSet<PlaceType>,
    selected_members: &[i64],
    member_filters: &MemberFilters,
) -> Vec<GroupPlace> {
    if selected_members.is_empty() || place_types.is_empty() {
        return Vec::new();
    }
    places
        .iter()
        .filter(|gp| place_types.contains(&gp.place.place_type))
        .filter(|gp| {
            selected_members.iter().any(|uid| {
                let Some(wanted) = member_filters.get(uid) else {
                    return false;
                };
                gp.members
                    .iter()
                    .find(|m| m.user_id == *uid)
                    .is_some_and(|m| intersects(m, wanted))
            })
        })
        .cloned()
        .collect()
}

/// True when the member's actual statuses intersect the selected set.
fn intersects(member: &MemberListStatus, wanted: &HashSet<StatusFilter>) -> bool {
    let nothing = !member.visited && !member.in_wishlist && !member.liked;
    wanted.iter().any(|w| match w {
        StatusFilter::Visited => member.visited,
        StatusFilter::InWishlist => member.in_wishlist,
        StatusFilter::Liked => member.liked,
        StatusFilter::Nothing => nothing,
    })
}
