//! Derived-view pipeline: store → generic → category → text.

use crate::state::AppState;

/// What: Rebuild `app.results` from `app.all_results` through every stage,
/// preserving the selection when possible.
///
/// Inputs:
/// - `app`: Mutable state containing the store, filter objects, and input.
///
/// Output:
/// - Updates `app.results` and `app.selected`.
///
/// Details:
/// - Selection is restored by place id when the record survives; otherwise
///   clamped to the new length, or cleared when the view is empty.
/// - The full pipeline re-runs on every call; candidate sets are small and
///   the stages are plain array passes, so no incremental bookkeeping is
///   kept.
pub fn refresh_results(app: &mut AppState) {
    let prev_id = app
        .selected
        .and_then(|i| app.results.get(i))
        .map(|p| p.id);

    let generic = super::filter::apply_generic_filters(&app.all_results, &app.generic_filters);
    let categorized = super::category::apply_category_filters(
        &generic,
        &app.restaurant_filters,
        &app.tourist_filters,
    );
    app.results = super::text::apply_text_filter(&categorized, &app.input);

    app.selected = match prev_id {
        Some(id) => app
            .results
            .iter()
            .position(|p| p.id == id)
            .or_else(|| clamped(app)),
        None => clamped(app),
    };
}

/// Previous index clamped into the new view, or `None` when it is empty.
fn clamped(app: &AppState) -> Option<usize> {
    if app.results.is_empty() {
        None
    } else {
        Some(app.selected.unwrap_or(0).min(app.results.len() - 1))
    }
}
