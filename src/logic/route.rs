//! Route sequencer: a user-ordered subset of places for one group, with
//! explicit-commit persistence.
//!
//! Local edits accumulate in memory and are flushed to the backend only on
//! an explicit save; a failed save keeps the edits and the dirty flag so
//! the user can retry without losing work.

use crate::state::{Place, RoutePlace, RouteSaveEntry};

/// Observable lifecycle states of a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteState {
    /// No stops and nothing pending.
    Empty,
    /// Stops present, all persisted.
    Populated,
    /// Local edits exist that have not been persisted.
    Dirty,
    /// A save is in flight.
    Saving,
}

/// The ordered route of one group.
///
/// Exactly one writer mutates this (the driving event loop); all operations
/// are synchronous and recompute dense `order_index` values immediately.
#[derive(Debug)]
pub struct RouteSequencer {
    /// Backend group identifier this route belongs to.
    group_id: i64,
    /// Ordered stops; `order_index` always dense 0..n-1.
    places: Vec<RoutePlace>,
    /// Local edits pending an explicit save.
    dirty: bool,
    /// A save round-trip is in flight.
    saving: bool,
    /// Last validation or save error, for the status banner.
    last_error: Option<String>,
}

impl RouteSequencer {
    /// Create an empty route for a group.
    #[must_use]
    pub const fn new(group_id: i64) -> Self {
        Self {
            group_id,
            places: Vec::new(),
            dirty: false,
            saving: false,
            last_error: None,
        }
    }

    /// What: Build a sequencer from stops fetched from the backend.
    ///
    /// Inputs:
    /// - `group_id`: Owning group.
    /// - `places`: Stops in backend order.
    ///
    /// Output:
    /// - A clean (non-dirty) sequencer with indices re-densified, tolerating
    ///   gaps or duplicates in the fetched `order_index` values.
    #[must_use]
    pub fn load(group_id: i64, mut places: Vec<RoutePlace>) -> Self {
        places.sort_by_key(|p| p.order_index);
        let mut seq = Self {
            group_id,
            places,
            dirty: false,
            saving: false,
            last_error: None,
        };
        seq.reindex();
        seq
    }

    /// The owning group's identifier.
    #[must_use]
    pub const fn group_id(&self) -> i64 {
        self.group_id
    }

    /// Current stops in order.
    #[must_use]
    pub fn places(&self) -> &[RoutePlace] {
        &self.places
    }

    /// Number of stops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    /// True when the route has no stops.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Last validation or save error, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Derived lifecycle state.
    #[must_use]
    pub fn state(&self) -> RouteState {
        if self.saving {
            RouteState::Saving
        } else if self.dirty {
            RouteState::Dirty
        } else if self.places.is_empty() {
            RouteState::Empty
        } else {
            RouteState::Populated
        }
    }

    /// What: Append a place to the end of the route.
    ///
    /// Inputs:
    /// - `place`: Source record; display fields are captured at insertion.
    ///
    /// Output:
    /// - `true` when the route changed. A place without finite coordinates
    ///   is rejected with an error; a `place_id` already present is an
    ///   idempotent no-op without an error.
    pub fn add_place(&mut self, place: &Place) -> bool {
        let index = self.places.len();
        self.insert_at(place, index)
    }

    /// What: Insert a place at a position (dragging from the unplaced pool).
    ///
    /// Inputs:
    /// - `place`: Source record.
    /// - `index`: Target position, clamped to the current length.
    ///
    /// Output:
    /// - `true` when the route changed; rejection semantics as `add_place`.
    pub fn insert_at(&mut self, place: &Place, index: usize) -> bool {
        if self.saving {
            self.last_error = Some("route save in progress".to_string());
            return false;
        }
        if self.places.iter().any(|p| p.place_id == place.id) {
            // Idempotent reject: already routed, nothing to report.
            return false;
        }
        let Some(stop) = route_place_from(place) else {
            self.last_error = Some(format!(
                "cannot add '{}' to the route: missing coordinates",
                place.name
            ));
            return false;
        };
        let at = index.min(self.places.len());
        self.places.insert(at, stop);
        self.reindex();
        self.dirty = true;
        true
    }

    /// What: Remove a stop by place id.
    ///
    /// Output:
    /// - `true` when a stop was removed; unknown ids are a no-op.
    pub fn remove_place(&mut self, place_id: i64) -> bool {
        if self.saving {
            self.last_error = Some("route save in progress".to_string());
            return false;
        }
        let before = self.places.len();
        self.places.retain(|p| p.place_id != place_id);
        if self.places.len() == before {
            return false;
        }
        self.reindex();
        self.dirty = true;
        true
    }

    /// What: Move the stop at `from` to position `to` (splice move).
    ///
    /// Inputs:
    /// - `from`: Current index of the stop.
    /// - `to`: Target index in the already-shortened sequence, clamped.
    ///
    /// Output:
    /// - `true` when the order changed; an out-of-range `from` is a no-op.
    ///
    /// Details:
    /// - Equivalent to remove-then-insert, not a swap: `reorder(0, 2)` on
    ///   `[a, b, c]` yields `[b, c, a]`.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if self.saving {
            self.last_error = Some("route save in progress".to_string());
            return false;
        }
        if from >= self.places.len() {
            return false;
        }
        let stop = self.places.remove(from);
        let at = to.min(self.places.len());
        self.places.insert(at, stop);
        if self.places.iter().enumerate().all(|(i, p)| p.order_index == i) {
            // Order unchanged; nothing to persist.
            return false;
        }
        self.reindex();
        self.dirty = true;
        true
    }

    /// What: Enter the Saving state and yield the full ordered payload.
    ///
    /// Output:
    /// - `Some(entries)` when there are unsaved edits and no save is in
    ///   flight; `None` otherwise.
    pub fn begin_save(&mut self) -> Option<Vec<RouteSaveEntry>> {
        if self.saving || !self.dirty {
            return None;
        }
        self.saving = true;
        self.last_error = None;
        Some(
            self.places
                .iter()
                .map(|p| RouteSaveEntry {
                    place_id: p.place_id,
                    order_index: p.order_index,
                })
                .collect(),
        )
    }

    /// Mark the in-flight save as committed; the route is clean again.
    pub fn save_succeeded(&mut self) {
        self.saving = false;
        self.dirty = false;
    }

    /// What: Mark the in-flight save as failed.
    ///
    /// Details:
    /// - Local order is untouched and the route stays dirty so a manual
    ///   retry persists the same edits. No automatic retry, no rollback.
    pub fn save_failed(&mut self, message: String) {
        self.saving = false;
        self.last_error = Some(message);
    }

    /// Recompute dense `order_index` values 0..n-1.
    fn reindex(&mut self) {
        for (i, p) in self.places.iter_mut().enumerate() {
            p.order_index = i;
        }
    }
}

/// Capture the denormalized display fields of a place as a route stop.
/// Returns `None` when the place lacks finite coordinates.
fn route_place_from(place: &Place) -> Option<RoutePlace> {
    let lat = place.lat.filter(|v| v.is_finite())?;
    let lon = place.lon.filter(|v| v.is_finite())?;
    Some(RoutePlace {
        place_id: place.id,
        name: place.name.clone(),
        city: place.city.clone(),
        state: place.state.clone(),
        country: place.country.clone(),
        lat,
        lon,
        place_type: place.place_type,
        order_index: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PlaceType;

    fn place(id: i64, name: &str) -> Place {
        Place {
            id,
            name: name.to_string(),
            lat: Some(48.14),
            lon: Some(11.58),
            place_type: PlaceType::Brewery,
            ..Default::default()
        }
    }

    fn names(seq: &RouteSequencer) -> Vec<&str> {
        seq.places().iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    /// What: First add transitions Empty → Dirty and indexes from zero
    ///
    /// - Input: Fresh sequencer, one valid place
    /// - Output: One stop at order_index 0, dirty state
    fn first_add() {
        let mut seq = RouteSequencer::new(9);
        assert_eq!(seq.state(), RouteState::Empty);
        assert!(seq.add_place(&place(1, "P1")));
        assert_eq!(seq.state(), RouteState::Dirty);
        assert_eq!(seq.places()[0].order_index, 0);
    }

    #[test]
    /// What: A place without coordinates is rejected with an error
    ///
    /// - Input: Place with lat = None
    /// - Output: No stop added, error recorded, state unchanged
    fn add_requires_coordinates() {
        let mut seq = RouteSequencer::new(9);
        let mut p = place(1, "Nowhere");
        p.lat = None;
        assert!(!seq.add_place(&p));
        assert!(seq.is_empty());
        assert_eq!(seq.state(), RouteState::Empty);
        assert!(seq.last_error().is_some_and(|e| e.contains("Nowhere")));
    }

    #[test]
    /// What: Duplicate adds are idempotent and not an error
    ///
    /// - Input: The same place added twice
    /// - Output: Length stays 1, no error recorded
    fn duplicate_add_is_noop() {
        let mut seq = RouteSequencer::new(9);
        assert!(seq.add_place(&place(1, "P1")));
        assert!(!seq.add_place(&place(1, "P1")));
        assert_eq!(seq.len(), 1);
        assert!(seq.last_error().is_none());
    }

    #[test]
    /// What: Reorder is a splice move, not a swap
    ///
    /// - Input: [P1, P2, P3]; reorder(0, 2)
    /// - Output: [P2, P3, P1] with dense indices 0,1,2
    fn reorder_splice_move() {
        let mut seq = RouteSequencer::new(9);
        seq.add_place(&place(1, "P1"));
        seq.add_place(&place(2, "P2"));
        seq.add_place(&place(3, "P3"));
        assert!(seq.reorder(0, 2));
        assert_eq!(names(&seq), vec!["P2", "P3", "P1"]);
        let idx: Vec<usize> = seq.places().iter().map(|p| p.order_index).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    /// What: Out-of-range reorder arguments are safe
    ///
    /// - Input: from beyond the end; to beyond the end
    /// - Output: Former is a no-op; latter clamps to the tail
    fn reorder_bounds() {
        let mut seq = RouteSequencer::new(9);
        seq.add_place(&place(1, "P1"));
        seq.add_place(&place(2, "P2"));
        assert!(!seq.reorder(5, 0));
        assert!(seq.reorder(0, 99));
        assert_eq!(names(&seq), vec!["P2", "P1"]);
    }

    #[test]
    /// What: Inserting from the unplaced pool lands at the target index
    ///
    /// - Input: [P1, P2]; insert P3 at index 1
    /// - Output: [P1, P3, P2]
    fn insert_at_index() {
        let mut seq = RouteSequencer::new(9);
        seq.add_place(&place(1, "P1"));
        seq.add_place(&place(2, "P2"));
        assert!(seq.insert_at(&place(3, "P3"), 1));
        assert_eq!(names(&seq), vec!["P1", "P3", "P2"]);
        let idx: Vec<usize> = seq.places().iter().map(|p| p.order_index).collect();
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    /// What: Save transitions Dirty → Saving → Populated on success
    ///
    /// - Input: Dirty route; begin_save then save_succeeded
    /// - Output: Payload carries the dense order; route ends clean
    fn save_success_cycle() {
        let mut seq = RouteSequencer::new(9);
        seq.add_place(&place(1, "P1"));
        seq.add_place(&place(2, "P2"));
        let payload = seq.begin_save().expect("dirty route yields a payload");
        assert_eq!(seq.state(), RouteState::Saving);
        assert_eq!(
            payload,
            vec![
                RouteSaveEntry { place_id: 1, order_index: 0 },
                RouteSaveEntry { place_id: 2, order_index: 1 },
            ]
        );
        // Mutations are rejected while the save is in flight
        assert!(!seq.add_place(&place(3, "P3")));
        seq.save_succeeded();
        assert_eq!(seq.state(), RouteState::Populated);
    }

    #[test]
    /// What: A failed save keeps local edits and the dirty flag
    ///
    /// - Input: Dirty route; begin_save then save_failed
    /// - Output: Order unchanged, state Dirty, error surfaced
    fn save_failure_keeps_edits() {
        let mut seq = RouteSequencer::new(9);
        seq.add_place(&place(1, "P1"));
        seq.add_place(&place(2, "P2"));
        seq.reorder(0, 1);
        let _ = seq.begin_save().expect("payload");
        seq.save_failed("backend unreachable".to_string());
        assert_eq!(seq.state(), RouteState::Dirty);
        assert_eq!(names(&seq), vec!["P2", "P1"]);
        assert_eq!(seq.last_error(), Some("backend unreachable"));
        // Retry is possible with the same edits
        assert!(seq.begin_save().is_some());
    }

    #[test]
    /// What: Removing the last stop heads back toward Empty
    ///
    /// - Input: One-stop route; remove then save
    /// - Output: Dirty while unsaved, Empty after the save commits
    fn remove_last_toward_empty() {
        let mut seq = RouteSequencer::new(9);
        seq.add_place(&place(1, "P1"));
        let _ = seq.begin_save().expect("payload");
        seq.save_succeeded();
        assert_eq!(seq.state(), RouteState::Populated);

        assert!(seq.remove_place(1));
        assert_eq!(seq.state(), RouteState::Dirty);
        let _ = seq.begin_save().expect("payload");
        seq.save_succeeded();
        assert_eq!(seq.state(), RouteState::Empty);
    }

    #[test]
    /// What: Loading from the backend densifies sparse indices
    ///
    /// - Input: Stops with order_index 4 and 9
    /// - Output: Clean route with indices 0 and 1, backend order kept
    fn load_densifies() {
        let stops = vec![
            RoutePlace {
                place_id: 2,
                name: "Second".into(),
                city: String::new(),
                state: String::new(),
                country: String::new(),
                lat: 1.0,
                lon: 2.0,
                place_type: PlaceType::Hotel,
                order_index: 9,
            },
            RoutePlace {
                place_id: 1,
                name: "First".into(),
                city: String::new(),
                state: String::new(),
                country: String::new(),
                lat: 1.0,
                lon: 2.0,
                place_type: PlaceType::Hotel,
                order_index: 4,
            },
        ];
        let seq = RouteSequencer::load(9, stops);
        assert_eq!(seq.state(), RouteState::Populated);
        assert_eq!(names(&seq), vec!["First", "Second"]);
        let idx: Vec<usize> = seq.places().iter().map(|p| p.order_index).collect();
        assert_eq!(idx, vec![0, 1]);
    }
}
