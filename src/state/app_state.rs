//! Central `AppState` container.

use std::path::PathBuf;

use crate::logic::route::RouteSequencer;
use crate::state::filters::{GenericFilters, RestaurantFilters, TouristFilters};
use crate::state::types::{
    Group, GroupPlace, MemberFilters, Place, PlaceType, ViewMode,
};

/// Client state shared by the fetch, logic, and embedding layers.
///
/// There is exactly one mutator (the driving event loop); every filter and
/// sequencer operation is a synchronous pure function over the collections
/// held here. Certain subsets are persisted to disk to preserve context
/// across runs (recent searches, last-used filters).
#[derive(Debug)]
pub struct AppState {
    /// Current free-text filter input.
    pub input: String,
    /// Which collection the main view is showing.
    pub view_mode: ViewMode,
    /// Unfiltered place store as last received from a search or list load.
    pub all_results: Vec<Place>,
    /// Derived view: the store after the generic, category, and text stages.
    pub results: Vec<Place>,
    /// Index into `results` that is currently highlighted, if any.
    pub selected: Option<usize>,

    /// Universal filter predicates.
    pub generic_filters: GenericFilters,
    /// Restaurant-only predicates.
    pub restaurant_filters: RestaurantFilters,
    /// Tourist-place-only predicates.
    pub tourist_filters: TouristFilters,

    // Search coordination
    /// Identifier of the latest query whose results may be displayed.
    pub latest_query_id: u64,
    /// Next query identifier to allocate.
    pub next_query_id: u64,
    /// Whether a search or list load is in flight.
    pub loading: bool,

    // Recent searches
    /// Previously executed search descriptions, most recent first.
    pub recent: Vec<String>,
    /// Path where recent searches are persisted as JSON.
    pub recent_path: PathBuf,
    /// Dirty flag indicating `recent` needs to be saved.
    pub recent_dirty: bool,

    // Persisted filter context
    /// Path where the last-used filters are persisted as JSON.
    pub filters_path: PathBuf,
    /// Dirty flag indicating the filter objects need to be saved.
    pub filters_dirty: bool,

    // Group view
    /// Groups the user belongs to.
    pub groups: Vec<Group>,
    /// Places of the currently loaded group with per-member statuses.
    pub group_places: Vec<GroupPlace>,
    /// Members whose lists are currently selected in the group view.
    pub selected_members: Vec<i64>,
    /// Per-member selected status sets.
    pub member_filters: MemberFilters,
    /// Place-type filter of the group view. Unlike the generic stage, an
    /// empty set here yields no results.
    pub group_place_types: std::collections::HashSet<PlaceType>,

    /// Route under edit for the currently loaded group, if any.
    pub route: Option<RouteSequencer>,

    /// Most recent network error, surfaced and then cleared by the embedder.
    pub last_error: Option<String>,
}

impl Default for AppState {
    /// Construct a default, empty [`AppState`], wiring persisted paths under
    /// the config lists directory.
    fn default() -> Self {
        Self {
            input: String::new(),
            view_mode: ViewMode::default(),
            all_results: Vec::new(),
            results: Vec::new(),
            selected: None,

            generic_filters: GenericFilters::default(),
            restaurant_filters: RestaurantFilters::default(),
            tourist_filters: TouristFilters::default(),

            latest_query_id: 0,
            next_query_id: 1,
            loading: false,

            recent: Vec::new(),
            recent_path: crate::util::config::lists_dir().join("recent_searches.json"),
            recent_dirty: false,

            filters_path: crate::util::config::lists_dir().join("filters.json"),
            filters_dirty: false,

            groups: Vec::new(),
            group_places: Vec::new(),
            selected_members: Vec::new(),
            member_filters: MemberFilters::new(),
            group_place_types: std::collections::HashSet::new(),

            route: None,

            last_error: None,
        }
    }
}

impl AppState {
    /// What: Replace the place store wholesale and rebuild the derived view.
    ///
    /// Inputs:
    /// - `places`: New canonical store from a search or list load.
    ///
    /// Output:
    /// - `all_results` replaced, pipeline re-run, selection preserved by id
    ///   when the previously selected place survives the new store.
    pub fn replace_store(&mut self, places: Vec<Place>) {
        self.all_results = places;
        crate::logic::refresh_results(self);
    }

    /// What: Switch view modes, resetting filters per the store lifecycle.
    ///
    /// Inputs:
    /// - `mode`: Target view mode.
    ///
    /// Output:
    /// - Filters reset to defaults when the mode actually changes; within the
    ///   same mode they persist across store reloads.
    pub fn switch_view_mode(&mut self, mode: ViewMode) {
        if self.view_mode == mode {
            return;
        }
        self.view_mode = mode;
        self.generic_filters = GenericFilters::default();
        self.restaurant_filters = RestaurantFilters::default();
        self.tourist_filters = TouristFilters::default();
        self.input.clear();
        self.filters_dirty = true;
        crate::logic::refresh_results(self);
    }

    /// What: Record a search description in the recent list, most recent first.
    ///
    /// Details:
    /// - De-duplicated case-sensitively; capped at 50 entries.
    pub fn push_recent(&mut self, entry: String) {
        if entry.trim().is_empty() {
            return;
        }
        self.recent.retain(|e| e != &entry);
        self.recent.insert(0, entry);
        self.recent.truncate(50);
        self.recent_dirty = true;
    }
}
