//! Client state: value types, filter objects, and the `AppState` container.

pub mod app_state;
pub mod filters;
pub mod types;

// Public re-exports to keep call sites short (crate::state::*)
pub use app_state::AppState;
pub use filters::{FeeBucket, GenericFilters, RestaurantFilters, TouristFilters};
pub use types::{
    Group, GroupMember, GroupPlace, ListStatus, MemberFilters, MemberListStatus, PersonalList,
    Place, PlaceType, QueryInput, RestaurantAttrs, RoutePlace, RouteSaveEntry, SearchRequest,
    SearchResults, StatusFilter, TouristAttrs, ViewMode,
};
