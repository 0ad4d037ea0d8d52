//! Core value types used by Tripsea state.

use std::collections::HashMap;

/// Category of a point of interest.
///
/// The backend's `place_type` column; anything it reports outside the four
/// known categories normalizes to [`PlaceType::Unknown`] rather than being
/// dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceType {
    /// Craft brewery or taproom.
    Brewery,
    /// Restaurant with the restaurant attribute bag.
    Restaurant,
    /// Tourist attraction with the tourist attribute bag.
    TouristPlace,
    /// Hotel or other lodging.
    Hotel,
    /// Category the backend did not report or we do not recognize.
    #[default]
    Unknown,
}

impl PlaceType {
    /// Parse a backend `place_type` string (case-insensitive).
    ///
    /// Inputs: `s` raw string from the wire.
    ///
    /// Output: Matching variant; `Unknown` for anything unrecognized.
    #[must_use]
    pub fn from_wire(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "brewery" => Self::Brewery,
            "restaurant" => Self::Restaurant,
            "tourist_place" => Self::TouristPlace,
            "hotel" => Self::Hotel,
            _ => Self::Unknown,
        }
    }

    /// Return the wire string for this category.
    #[must_use]
    pub const fn as_wire(self) -> &'static str {
        match self {
            Self::Brewery => "brewery",
            Self::Restaurant => "restaurant",
            Self::TouristPlace => "tourist_place",
            Self::Hotel => "hotel",
            Self::Unknown => "unknown",
        }
    }
}

/// The requesting user's personal flags on a place, joined onto search and
/// list responses by the backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListStatus {
    /// The user has marked the place visited.
    pub visited: bool,
    /// The place is on the user's wishlist.
    pub in_wishlist: bool,
    /// The user has liked the place.
    pub liked: bool,
}

/// Restaurant attribute bag. Every field is optional; absence means the
/// backend has no data, which the category filter treats differently from a
/// negative value (see `logic::category`).
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RestaurantAttrs {
    /// Comma/semicolon-delimited cuisine labels as stored upstream.
    pub cuisine_type: Option<String>,
    /// Price tier 1-4.
    pub price_range: Option<u8>,
    /// Dietary options offered (vegan, halal, ...).
    pub dietary_options: Option<Vec<String>>,
    /// Offers delivery.
    pub delivery: Option<bool>,
    /// Offers takeout.
    pub takeout: Option<bool>,
    /// Takes reservations.
    pub reservations: Option<bool>,
    /// Free-form opening hours text.
    pub hours_of_operation: Option<String>,
}

/// Tourist-place attribute bag.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TouristAttrs {
    /// Attraction kind (museum, park, monument, ...).
    pub tourist_type: Option<String>,
    /// Entry fee in the backend's currency unit.
    pub entry_fee: Option<f64>,
    /// Suitable for families. Positive-assertion filter field.
    pub family_friendly: Option<bool>,
    /// Wheelchair accessible. Positive-assertion filter field.
    pub accessibility: Option<bool>,
    /// Pets allowed. Positive-assertion filter field.
    pub pet_friendly: Option<bool>,
    /// Guided tours offered. Positive-assertion filter field.
    pub guided_tours: Option<bool>,
    /// Free-form opening hours text.
    pub tourist_hours: Option<String>,
}

/// A single point-of-interest record as held in the place store.
///
/// `id` is stable across requeries; the store itself is replaced wholesale on
/// every search or list load.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Place {
    /// Backend identifier, unique within one store.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// City, possibly empty.
    pub city: String,
    /// State or region, possibly empty.
    pub state: String,
    /// Country, possibly empty.
    pub country: String,
    /// Latitude in decimal degrees when known.
    pub lat: Option<f64>,
    /// Longitude in decimal degrees when known.
    pub lon: Option<f64>,
    /// Category of the place.
    #[serde(default = "default_place_type")]
    pub place_type: PlaceType,
    /// Average rating 0-5 when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Distance from the query's reference point, present only on
    /// location-relative queries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// The requesting user's list flags when authenticated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_status: Option<ListStatus>,
    /// Restaurant attributes; populated only for restaurants.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant: Option<RestaurantAttrs>,
    /// Tourist attributes; populated only for tourist places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tourist: Option<TouristAttrs>,
}

/// Serde default for [`Place::place_type`].
const fn default_place_type() -> PlaceType {
    PlaceType::Unknown
}

/// A travel group the user belongs to.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Group {
    /// Backend group identifier.
    pub group_id: i64,
    /// Group display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Username of the creator.
    pub created_by: String,
    /// The requesting user's role within the group.
    pub your_role: String,
}

/// A member of a travel group.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GroupMember {
    /// Backend user identifier.
    pub user_id: i64,
    /// Display username.
    pub username: String,
    /// Role within the group.
    pub role: String,
}

/// One member's actual list flags on one place, as returned by the group
/// places endpoint.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MemberListStatus {
    /// Backend user identifier.
    pub user_id: i64,
    /// Display username.
    pub username: String,
    /// Member has visited the place.
    pub visited: bool,
    /// Place is on the member's wishlist.
    pub in_wishlist: bool,
    /// Member has liked the place.
    pub liked: bool,
}

/// A place in the group view: display fields plus every member's flags.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GroupPlace {
    /// The place display record.
    pub place: Place,
    /// Per-member statuses, one entry per group member.
    pub members: Vec<MemberListStatus>,
}

/// One stop on a group route.
///
/// Display fields are denormalized from the [`Place`] at insertion time; the
/// place itself is referenced by `place_id`, never duplicated beyond them.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoutePlace {
    /// Backend place identifier.
    pub place_id: i64,
    /// Display name captured at insertion.
    pub name: String,
    /// City captured at insertion.
    pub city: String,
    /// State captured at insertion.
    pub state: String,
    /// Country captured at insertion.
    pub country: String,
    /// Latitude; always present (a route stop needs coordinates).
    pub lat: f64,
    /// Longitude; always present.
    pub lon: f64,
    /// Category captured at insertion.
    pub place_type: PlaceType,
    /// Dense 0-based position within the route, unique per route.
    pub order_index: usize,
}

/// The `{place_id, order_index}` pair sent to the backend on route save.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RouteSaveEntry {
    /// Backend place identifier.
    pub place_id: i64,
    /// Position within the route.
    pub order_index: usize,
}

/// Search query sent to the background search worker.
#[derive(Clone, Debug)]
pub struct QueryInput {
    /// Monotonic identifier used to correlate responses.
    pub id: u64,
    /// Search request parameters.
    pub request: SearchRequest,
}

/// Parameters of one backend search.
#[derive(Clone, Debug, PartialEq)]
pub enum SearchRequest {
    /// All places within `km` of a point.
    Radius {
        /// Reference latitude.
        lat: f64,
        /// Reference longitude.
        lon: f64,
        /// Radius in kilometers.
        km: f64,
    },
    /// All places inside a bounding box.
    Bbox {
        /// Northern latitude bound.
        north: f64,
        /// Southern latitude bound.
        south: f64,
        /// Eastern longitude bound.
        east: f64,
        /// Western longitude bound.
        west: f64,
    },
    /// The `k` nearest places to a point.
    Nearest {
        /// Reference latitude.
        lat: f64,
        /// Reference longitude.
        lon: f64,
        /// Number of neighbors.
        k: usize,
    },
}

/// Results corresponding to a prior [`QueryInput`].
#[derive(Clone, Debug)]
pub struct SearchResults {
    /// Echoed identifier from the originating query.
    pub id: u64,
    /// Matching places as normalized from the wire.
    pub items: Vec<Place>,
}

/// Which collection the main view is showing. Switching modes resets the
/// filter value objects; staying within one mode preserves them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Results of a backend search.
    #[default]
    Search,
    /// One of the user's personal lists.
    List(PersonalList),
}

/// The three personal lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersonalList {
    /// Places marked visited.
    Visited,
    /// Wishlist places.
    Wishlist,
    /// Liked places.
    Liked,
}

impl PersonalList {
    /// URL path segment for this list on the backend.
    #[must_use]
    pub const fn as_path(self) -> &'static str {
        match self {
            Self::Visited => "visited",
            Self::Wishlist => "wishlist",
            Self::Liked => "liked",
        }
    }
}

/// A member's selectable status values in the group view.
///
/// `Nothing` selects members that have the place in none of their lists
/// (all three flags false).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Member has visited the place.
    Visited,
    /// Place is on the member's wishlist.
    InWishlist,
    /// Member has liked the place.
    Liked,
    /// Member has the place in no list.
    #[serde(rename = "none")]
    Nothing,
}

impl StatusFilter {
    /// Parse a status from its CLI/config key or aliases.
    ///
    /// Inputs: `s` key string (case-insensitive).
    ///
    /// Output: `Some(StatusFilter)` on recognized value; `None` otherwise.
    #[must_use]
    pub fn from_config_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "visited" => Some(Self::Visited),
            "wishlist" | "in_wishlist" => Some(Self::InWishlist),
            "liked" => Some(Self::Liked),
            "none" | "nothing" => Some(Self::Nothing),
            _ => None,
        }
    }
}

/// Per-member selected status sets for the group view, keyed by user id.
pub type MemberFilters = HashMap<i64, std::collections::HashSet<StatusFilter>>;
