//! Filter value objects threaded through the pipeline stages.
//!
//! These are plain serializable data with no behavior beyond activity
//! checks. They are owned by `AppState` (or a front end embedding the
//! crate) and passed to `logic` functions by reference; the stages never
//! mutate them.

use std::collections::HashSet;

use crate::state::types::PlaceType;

/// Universal predicates applicable to any place regardless of category.
///
/// Empty sets mean "no restriction" here; the group view's place-type set
/// has the opposite empty-set meaning and lives in `logic::group`.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GenericFilters {
    /// Keep a place iff empty or containing the place's category.
    pub place_types: HashSet<PlaceType>,
    /// Minimum rating; `<= 0` disables the predicate.
    pub min_rating: f64,
    /// Maximum distance in km; `None` or `<= 0` disables the predicate.
    pub max_distance_km: Option<f64>,
    /// Keep a place iff empty or containing the place's state verbatim.
    pub states: HashSet<String>,
}

impl GenericFilters {
    /// True when no predicate restricts anything (identity filter).
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.place_types.is_empty()
            && self.min_rating <= 0.0
            && !self.max_distance_km.is_some_and(|d| d > 0.0)
            && self.states.is_empty()
    }
}

/// Restaurant-only predicates. Applied by the category stage to restaurant
/// records only; all other categories pass through unaffected.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RestaurantFilters {
    /// Cuisine search text, comma/semicolon-delimited; fuzzy bidirectional
    /// token match against the record's `cuisine_type`.
    pub cuisines: Option<String>,
    /// Accepted price tiers (1-4). A record with no price data passes.
    pub price_ranges: HashSet<u8>,
    /// Dietary options any of which the record must offer; no data passes.
    pub dietary_options: Vec<String>,
    /// Require delivery. Records with no delivery data pass.
    pub delivery: bool,
    /// Require takeout. Records with no takeout data pass.
    pub takeout: bool,
    /// Require reservations. Records with no reservation data pass.
    pub reservations: bool,
    /// Substring to look for in the record's hours text; no data passes.
    pub hours: Option<String>,
    /// Minimum-rating thresholds; match if rating >= any selected value.
    pub rating_buckets: Vec<f64>,
}

impl RestaurantFilters {
    /// True when at least one restaurant predicate is engaged.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cuisines.as_deref().is_some_and(|c| !c.trim().is_empty())
            || !self.price_ranges.is_empty()
            || !self.dietary_options.is_empty()
            || self.delivery
            || self.takeout
            || self.reservations
            || self.hours.as_deref().is_some_and(|h| !h.trim().is_empty())
            || !self.rating_buckets.is_empty()
    }
}

/// Tourist-place-only predicates.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TouristFilters {
    /// Accepted attraction kinds, compared case-insensitively. A record
    /// with no `tourist_type` is excluded while this is non-empty.
    pub tourist_types: HashSet<String>,
    /// Accepted entry-fee buckets. Missing/negative fees never match.
    pub entry_fee_buckets: HashSet<FeeBucket>,
    /// Show only places positively marked family friendly.
    pub family_friendly: bool,
    /// Show only places positively marked accessible.
    pub accessibility: bool,
    /// Show only places positively marked pet friendly.
    pub pet_friendly: bool,
    /// Show only places positively offering guided tours.
    pub guided_tours: bool,
    /// Substring to look for in the record's hours text; no data passes.
    pub hours: Option<String>,
    /// Minimum-rating thresholds; match if rating >= any selected value.
    pub rating_buckets: Vec<f64>,
}

impl TouristFilters {
    /// True when at least one tourist predicate is engaged.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.tourist_types.is_empty()
            || !self.entry_fee_buckets.is_empty()
            || self.family_friendly
            || self.accessibility
            || self.pet_friendly
            || self.guided_tours
            || self.hours.as_deref().is_some_and(|h| !h.trim().is_empty())
            || !self.rating_buckets.is_empty()
    }
}

/// Entry-fee bucket boundaries: free (= 0), 1-10, 11-25, 25+.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeBucket {
    /// Fee of exactly zero.
    Free,
    /// Fee in (0, 10].
    UpTo10,
    /// Fee in (10, 25].
    UpTo25,
    /// Fee above 25.
    Over25,
}

impl FeeBucket {
    /// Parse a bucket from its CLI/config key or aliases.
    ///
    /// Inputs: `s` key string (case-insensitive).
    ///
    /// Output: `Some(FeeBucket)` on recognized value; `None` otherwise.
    #[must_use]
    pub fn from_config_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "free" | "0" => Some(Self::Free),
            "1-10" => Some(Self::UpTo10),
            "11-25" => Some(Self::UpTo25),
            "25+" | "over25" => Some(Self::Over25),
            _ => None,
        }
    }

    /// What: Map a numeric fee into its bucket.
    ///
    /// Inputs:
    /// - `fee`: Parsed fee value.
    ///
    /// Output:
    /// - `Some(bucket)` for non-negative finite fees; `None` for negative or
    ///   non-finite values (ambiguous data cannot be proven to match).
    #[must_use]
    pub fn from_fee(fee: f64) -> Option<Self> {
        if !fee.is_finite() || fee < 0.0 {
            return None;
        }
        if fee == 0.0 {
            Some(Self::Free)
        } else if fee <= 10.0 {
            Some(Self::UpTo10)
        } else if fee <= 25.0 {
            Some(Self::UpTo25)
        } else {
            Some(Self::Over25)
        }
    }
}
