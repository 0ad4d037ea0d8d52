//! Text filter stage: case-insensitive substring match over display fields.

use crate::state::Place;

/// What: Filter places by a free-text query.
///
/// Inputs:
/// - `places`: Candidate records.
/// - `query`: Raw user input; trimmed before matching.
///
/// Output:
/// - Identity when the trimmed query is empty; otherwise records whose
///   name, city, state, or country contains the lowercased query.
///
/// Details:
/// - Exact substring semantics only: no tokenization, no fuzzy matching,
///   no diacritic normalization.
#[must_use]
pub fn apply_text_filter(places: &[Place], query: &str) -> Vec<Place> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return places.to_vec();
    }
    places
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.city.to_lowercase().contains(&needle)
                || p.state.to_lowercase().contains(&needle)
                || p.country.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
