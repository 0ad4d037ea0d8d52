//! Category filter stage: predicates applied only to records of a matching
//! category, with the null-handling policy the group UIs depend on.
//!
//! The policy, preserved exactly: presence-optional attributes
//! (`dietary_options`, `price_range`, hours text, `delivery`, `takeout`,
//! `reservations`) pass a record through when the data is absent, while the
//! positive-assertion booleans (`family_friendly`, `accessibility`,
//! `pet_friendly`, `guided_tours`) and the `tourist_type`/`entry_fee`
//! bucket filters exclude on absent data.

use crate::state::{FeeBucket, Place, PlaceType, RestaurantAttrs, RestaurantFilters, TouristAttrs, TouristFilters};

/// What: Apply restaurant and tourist predicates to their own categories.
///
/// Inputs:
/// - `places`: Candidate records, typically the generic stage's output.
/// - `restaurant`: Restaurant-only filter values.
/// - `tourist`: Tourist-only filter values.
///
/// Output:
/// - Records passing their category's engaged predicates; records of other
///   categories pass through untouched.
///
/// Details:
/// - A category's predicates engage only when at least one of them is active
///   AND the input contains at least one record of that category; otherwise
///   that category's filtering is a no-op. This keeps an untouched filter
///   panel from hiding every result.
#[must_use]
pub fn apply_category_filters(
    places: &[Place],
    restaurant: &RestaurantFilters,
    tourist: &TouristFilters,
) -> Vec<Place> {
    let restaurant_engaged = restaurant.is_active()
        && places.iter().any(|p| p.place_type == PlaceType::Restaurant);
    let tourist_engaged = tourist.is_active()
        && places.iter().any(|p| p.place_type == PlaceType::TouristPlace);
    if !restaurant_engaged && !tourist_engaged {
        return places.to_vec();
    }
    places
        .iter()
        .filter(|p| match p.place_type {
            PlaceType::Restaurant if restaurant_engaged => restaurant_passes(p, restaurant),
            PlaceType::TouristPlace if tourist_engaged => tourist_passes(p, tourist),
            _ => true,
        })
        .cloned()
        .collect()
}

/// Restaurant predicate set. `attrs` absence follows the per-field policy.
fn restaurant_passes(place: &Place, filters: &RestaurantFilters) -> bool {
    let empty = RestaurantAttrs::default();
    let attrs = place.restaurant.as_ref().unwrap_or(&empty);

    if let Some(cuisine_filter) = filters.cuisines.as_deref()
        && !cuisine_filter.trim().is_empty()
        && let Some(record_cuisine) = attrs.cuisine_type.as_deref()
        && !cuisine_matches(cuisine_filter, record_cuisine)
    {
        // A record with no cuisine data passes; a mismatching one does not.
        return false;
    }
    if !filters.price_ranges.is_empty()
        && attrs.price_range.is_some_and(|p| !filters.price_ranges.contains(&p))
    {
        return false;
    }
    if !filters.dietary_options.is_empty()
        && let Some(offered) = attrs.dietary_options.as_deref()
        && !dietary_matches(&filters.dietary_options, offered)
    {
        return false;
    }
    if filters.delivery && attrs.delivery == Some(false) {
        return false;
    }
    if filters.takeout && attrs.takeout == Some(false) {
        return false;
    }
    if filters.reservations && attrs.reservations == Some(false) {
        return false;
    }
    if let Some(hours_filter) = filters.hours.as_deref()
        && !hours_filter.trim().is_empty()
        && let Some(hours) = attrs.hours_of_operation.as_deref()
        && !hours.to_lowercase().contains(&hours_filter.trim().to_lowercase())
    {
        return false;
    }
    rating_bucket_passes(place.rating, &filters.rating_buckets)
}

/// Tourist predicate set. The positive-assertion booleans and the
/// type/fee buckets exclude on absent data.
fn tourist_passes(place: &Place, filters: &TouristFilters) -> bool {
    let empty = TouristAttrs::default();
    let attrs = place.tourist.as_ref().unwrap_or(&empty);

    if !filters.tourist_types.is_empty() {
        let Some(ty) = attrs.tourist_type.as_deref() else {
            return false;
        };
        let ty = ty.trim().to_lowercase();
        if !filters
            .tourist_types
            .iter()
            .any(|sel| sel.trim().to_lowercase() == ty)
        {
            return false;
        }
    }
    if !filters.entry_fee_buckets.is_empty() {
        let bucket = attrs.entry_fee.and_then(FeeBucket::from_fee);
        let Some(bucket) = bucket else {
            return false;
        };
        if !filters.entry_fee_buckets.contains(&bucket) {
            return false;
        }
    }
    if filters.family_friendly && attrs.family_friendly != Some(true) {
        return false;
    }
    if filters.accessibility && attrs.accessibility != Some(true) {
        return false;
    }
    if filters.pet_friendly && attrs.pet_friendly != Some(true) {
        return false;
    }
    if filters.guided_tours && attrs.guided_tours != Some(true) {
        return false;
    }
    if let Some(hours_filter) = filters.hours.as_deref()
        && !hours_filter.trim().is_empty()
        && let Some(hours) = attrs.tourist_hours.as_deref()
        && !hours.to_lowercase().contains(&hours_filter.trim().to_lowercase())
    {
        return false;
    }
    rating_bucket_passes(place.rating, &filters.rating_buckets)
}

/// What: Fuzzy bidirectional cuisine match.
///
/// Inputs:
/// - `filter_value`: User-entered cuisine text, comma/semicolon-delimited.
/// - `record_value`: The record's `cuisine_type` string, same delimiters.
///
/// Output:
/// - `true` when any filter token equals, contains, or is contained in any
///   record token after trimming and lowercasing.
///
/// Details:
/// - Intentionally permissive; "thai" matches "thai food" and vice versa.
///   The surprise matches this can produce are long-standing behavior.
#[must_use]
pub fn cuisine_matches(filter_value: &str, record_value: &str) -> bool {
    let filter_tokens = cuisine_tokens(filter_value);
    let record_tokens = cuisine_tokens(record_value);
    filter_tokens.iter().any(|f| {
        record_tokens
            .iter()
            .any(|r| f == r || f.contains(r.as_str()) || r.contains(f.as_str()))
    })
}

/// Split a cuisine string on commas and semicolons into trimmed lowercase tokens.
fn cuisine_tokens(value: &str) -> Vec<String> {
    value
        .split([',', ';'])
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Case-insensitive token equality between any selected dietary option and
/// any option the record offers.
fn dietary_matches(selected: &[String], offered: &[String]) -> bool {
    selected.iter().any(|s| {
        let s = s.trim().to_lowercase();
        offered.iter().any(|o| o.trim().to_lowercase() == s)
    })
}

/// Rating-bucket predicate shared by both categories: bucket values are
/// minimum thresholds; a missing rating excludes while any bucket is selected.
fn rating_bucket_passes(rating: Option<f64>, buckets: &[f64]) -> bool {
    if buckets.is_empty() {
        return true;
    }
    rating.is_some_and(|r| buckets.iter().any(|min| r >= *min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{RestaurantAttrs, TouristAttrs};

    fn restaurant(id: i64, attrs: RestaurantAttrs) -> Place {
        Place {
            id,
            name: format!("restaurant {id}"),
            place_type: PlaceType::Restaurant,
            restaurant: Some(attrs),
            ..Default::default()
        }
    }

    fn tourist(id: i64, attrs: TouristAttrs) -> Place {
        Place {
            id,
            name: format!("sight {id}"),
            place_type: PlaceType::TouristPlace,
            tourist: Some(attrs),
            ..Default::default()
        }
    }

    fn brewery(id: i64) -> Place {
        Place {
            id,
            name: format!("brewery {id}"),
            place_type: PlaceType::Brewery,
            ..Default::default()
        }
    }

    #[test]
    /// What: Stage is a pass-through when no category record is present
    ///
    /// - Input: Breweries only; delivery filter active
    /// - Output: Output equals input unchanged
    fn pass_through_without_category_records() {
        let store = vec![brewery(1), brewery(2)];
        let filters = RestaurantFilters {
            delivery: true,
            ..Default::default()
        };
        let out = apply_category_filters(&store, &filters, &TouristFilters::default());
        assert_eq!(out, store);
    }

    #[test]
    /// What: Null tolerance splits by attribute class
    ///
    /// - Input: delivery=null restaurant under delivery filter;
    ///   family_friendly=null sight under family filter
    /// - Output: The restaurant is retained, the sight is excluded
    fn null_policy_is_asymmetric() {
        let store = vec![
            restaurant(1, RestaurantAttrs::default()),
            tourist(2, TouristAttrs::default()),
        ];
        let rf = RestaurantFilters {
            delivery: true,
            ..Default::default()
        };
        let tf = TouristFilters {
            family_friendly: true,
            ..Default::default()
        };
        let ids: Vec<i64> = apply_category_filters(&store, &rf, &tf)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    /// What: Positive-assertion booleans require an explicit true
    ///
    /// - Input: Sights with family_friendly true/false/null
    /// - Output: Only the explicit true survives
    fn positive_assertion_booleans() {
        let store = vec![
            tourist(
                1,
                TouristAttrs {
                    family_friendly: Some(true),
                    ..Default::default()
                },
            ),
            tourist(
                2,
                TouristAttrs {
                    family_friendly: Some(false),
                    ..Default::default()
                },
            ),
            tourist(3, TouristAttrs::default()),
        ];
        let tf = TouristFilters {
            family_friendly: true,
            ..Default::default()
        };
        let ids: Vec<i64> = apply_category_filters(&store, &RestaurantFilters::default(), &tf)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    /// What: Other categories are untouched by an engaged filter
    ///
    /// - Input: Brewery + failing restaurant under a delivery filter
    /// - Output: Brewery kept, restaurant dropped
    fn other_categories_unaffected() {
        let store = vec![
            brewery(1),
            restaurant(
                2,
                RestaurantAttrs {
                    delivery: Some(false),
                    ..Default::default()
                },
            ),
        ];
        let rf = RestaurantFilters {
            delivery: true,
            ..Default::default()
        };
        let ids: Vec<i64> = apply_category_filters(&store, &rf, &TouristFilters::default())
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    /// What: Fuzzy bidirectional cuisine matching
    ///
    /// - Input: Filter "Thai, sushi" against several record strings
    /// - Output: Substring containment in either direction matches
    fn cuisine_fuzzy_match() {
        assert!(cuisine_matches("Thai, sushi", "thai food; bbq"));
        assert!(cuisine_matches("thai food", "Thai"));
        assert!(cuisine_matches("SUSHI", "sushi"));
        assert!(!cuisine_matches("thai", "italian, pizza"));
        assert!(!cuisine_matches("  ", "anything"));
    }

    #[test]
    /// What: Cuisine filter keeps records without cuisine data
    ///
    /// - Input: Restaurants with null and mismatching cuisine
    /// - Output: Null passes, mismatch is dropped
    fn cuisine_null_passes() {
        let store = vec![
            restaurant(1, RestaurantAttrs::default()),
            restaurant(
                2,
                RestaurantAttrs {
                    cuisine_type: Some("italian".into()),
                    ..Default::default()
                },
            ),
        ];
        let rf = RestaurantFilters {
            cuisines: Some("thai".into()),
            ..Default::default()
        };
        let ids: Vec<i64> = apply_category_filters(&store, &rf, &TouristFilters::default())
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    /// What: Entry-fee buckets exclude missing fees, free matches only zero
    ///
    /// - Input: Fees None, 0, 5, 30 under a {Free, UpTo10} filter
    /// - Output: 0 and 5 survive
    fn entry_fee_buckets() {
        let mk = |id, fee| {
            tourist(
                id,
                TouristAttrs {
                    entry_fee: fee,
                    ..Default::default()
                },
            )
        };
        let store = vec![mk(1, None), mk(2, Some(0.0)), mk(3, Some(5.0)), mk(4, Some(30.0))];
        let tf = TouristFilters {
            entry_fee_buckets: [FeeBucket::Free, FeeBucket::UpTo10].into_iter().collect(),
            ..Default::default()
        };
        let ids: Vec<i64> = apply_category_filters(&store, &RestaurantFilters::default(), &tf)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    /// What: Rating buckets are minimum thresholds ORed together
    ///
    /// - Input: Ratings 3.2, 4.6, None under buckets {3.0, 4.5}
    /// - Output: Both rated records survive; unrated is dropped
    fn rating_buckets_threshold_or() {
        let mk = |id, rating: Option<f64>| {
            let mut p = restaurant(id, RestaurantAttrs::default());
            p.rating = rating;
            p
        };
        let store = vec![mk(1, Some(3.2)), mk(2, Some(4.6)), mk(3, None)];
        let rf = RestaurantFilters {
            rating_buckets: vec![3.0, 4.5],
            ..Default::default()
        };
        let ids: Vec<i64> = apply_category_filters(&store, &rf, &TouristFilters::default())
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    /// What: Price and dietary follow the presence-optional policy
    ///
    /// - Input: Price null vs. out-of-set; dietary null vs. mismatch
    /// - Output: Nulls pass, explicit mismatches are dropped
    fn price_and_dietary_presence_optional() {
        let store = vec![
            restaurant(1, RestaurantAttrs::default()),
            restaurant(
                2,
                RestaurantAttrs {
                    price_range: Some(4),
                    dietary_options: Some(vec!["Vegan".into()]),
                    ..Default::default()
                },
            ),
            restaurant(
                3,
                RestaurantAttrs {
                    price_range: Some(1),
                    dietary_options: Some(vec!["kosher".into()]),
                    ..Default::default()
                },
            ),
        ];
        let rf = RestaurantFilters {
            price_ranges: [1, 2].into_iter().collect(),
            dietary_options: vec!["vegan".into()],
            ..Default::default()
        };
        let ids: Vec<i64> = apply_category_filters(&store, &rf, &TouristFilters::default())
            .iter()
            .map(|p| p.id)
            .collect();
        // 1 has no data at all, 2 fails price, 3 fails dietary
        assert_eq!(ids, vec![1]);
    }
}
