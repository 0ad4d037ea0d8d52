//! Generic filter stage: universal predicates applicable to any place.

use crate::state::{GenericFilters, Place};

/// What: Apply the four universal predicates to a place store.
///
/// Inputs:
/// - `places`: Candidate records, typically `AppState::all_results`.
/// - `filters`: Universal filter values.
///
/// Output:
/// - Records passing all engaged predicates, in input order.
///
/// Details:
/// - Empty `place_types`/`states` sets mean "no restriction", never
///   "exclude all".
/// - With `min_rating > 0`, a record lacking a rating is excluded; likewise
///   a record lacking `distance_km` is excluded while a positive
///   `max_distance_km` is engaged.
/// - The predicates are ANDed; evaluation order does not affect the result.
#[must_use]
pub fn apply_generic_filters(places: &[Place], filters: &GenericFilters) -> Vec<Place> {
    places
        .iter()
        .filter(|p| passes(p, filters))
        .cloned()
        .collect()
}

/// Single-record predicate behind [`apply_generic_filters`].
fn passes(place: &Place, filters: &GenericFilters) -> bool {
    if !filters.place_types.is_empty() && !filters.place_types.contains(&place.place_type) {
        return false;
    }
    if filters.min_rating > 0.0 && !place.rating.is_some_and(|r| r >= filters.min_rating) {
        return false;
    }
    if let Some(max) = filters.max_distance_km
        && max > 0.0
        && !place.distance_km.is_some_and(|d| d <= max)
    {
        return false;
    }
    if !filters.states.is_empty() && !filters.states.contains(&place.state) {
        return false;
    }
    true
}
