//! Dirty-flag JSON persistence of client context (recent searches,
//! last-used filters) under the config lists directory.

use std::fs;

use crate::state::{AppState, GenericFilters, RestaurantFilters, TouristFilters};

/// On-disk shape of the persisted filter context.
#[derive(Debug, Default, serde::Serialize, serde::Deserialize)]
struct SavedFilters {
    /// Universal predicates.
    generic: GenericFilters,
    /// Restaurant-only predicates.
    restaurant: RestaurantFilters,
    /// Tourist-only predicates.
    tourist: TouristFilters,
}

/// What: Persist the recent searches list to disk if marked dirty.
///
/// Inputs:
/// - `app`: Application state containing `recent` and `recent_path`
///
/// Output:
/// - Writes `recent` JSON to `recent_path` and clears the dirty flag on success.
pub fn maybe_flush_recent(app: &mut AppState) {
    if !app.recent_dirty {
        return;
    }
    if let Ok(s) = serde_json::to_string(&app.recent) {
        match fs::write(&app.recent_path, &s) {
            Ok(()) => {
                tracing::debug!(
                    path = %app.recent_path.display(),
                    "[Persist] Recent searches persisted"
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %app.recent_path.display(),
                    error = %e,
                    "[Persist] Failed to write recent searches"
                );
            }
        }
        app.recent_dirty = false;
    }
}

/// What: Persist the filter context to disk if marked dirty.
///
/// Inputs:
/// - `app`: Application state whose filter objects and `filters_path` are used
///
/// Output:
/// - Writes the three filter objects as one JSON document and clears the
///   dirty flag on success.
pub fn maybe_flush_filters(app: &mut AppState) {
    if !app.filters_dirty {
        return;
    }
    let saved = SavedFilters {
        generic: app.generic_filters.clone(),
        restaurant: app.restaurant_filters.clone(),
        tourist: app.tourist_filters.clone(),
    };
    if let Ok(s) = serde_json::to_string(&saved) {
        match fs::write(&app.filters_path, &s) {
            Ok(()) => {
                tracing::debug!(
                    path = %app.filters_path.display(),
                    "[Persist] Filter context persisted"
                );
            }
            Err(e) => {
                tracing::warn!(
                    path = %app.filters_path.display(),
                    error = %e,
                    "[Persist] Failed to write filter context"
                );
            }
        }
        app.filters_dirty = false;
    }
}

/// What: Load the persisted recent searches, tolerating a missing file.
pub fn load_recent(app: &mut AppState) {
    if let Ok(body) = fs::read_to_string(&app.recent_path)
        && let Ok(recent) = serde_json::from_str::<Vec<String>>(&body)
    {
        app.recent = recent;
    }
}

/// What: Load the persisted filter context, tolerating a missing or
/// malformed file (defaults stay in place).
pub fn load_filters(app: &mut AppState) {
    if let Ok(body) = fs::read_to_string(&app.filters_path)
        && let Ok(saved) = serde_json::from_str::<SavedFilters>(&body)
    {
        app.generic_filters = saved.generic;
        app.restaurant_filters = saved.restaurant;
        app.tourist_filters = saved.tourist;
    }
}
