//! Nearest-location resolution with the margin rule, and the fallback cycler.
//!
//! The globe carries at most a handful of markers, so an arbitrary click is
//! usually far from all of them and often nearly equidistant between two.
//! A nearest match is only accepted when it is both reasonably close and a
//! clear winner over the runner-up; everything else falls through to the
//! round-robin cycler so a click always does something.

use glam::DVec3;

use crate::geo::{haversine_km, point_to_lat_lon};
use crate::location::LocationSet;

/// Maximum great-circle distance at which a click can match a location.
pub const MAX_MATCH_KM: f64 = 10_000.0;

/// Minimum lead the nearest location must have over the second-nearest.
pub const MATCH_MARGIN_KM: f64 = 500.0;

/// Outcome of resolving a click point against a location set.
///
/// Only `Matched` selects; the other variants all fall through to the
/// [`FallbackCycler`]. The rejected variants carry the distances that sank
/// them, for resolution traces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// A single clear winner within range.
    Matched(usize),
    /// The runner-up was too close behind the winner for the click to be a
    /// deliberate choice between them.
    Ambiguous {
        nearest: usize,
        nearest_km: f64,
        runner_up_km: f64,
    },
    /// Even the nearest location was beyond [`MAX_MATCH_KM`].
    TooFar { nearest: usize, nearest_km: f64 },
    /// The set was empty; nothing to match against.
    NoLocations,
}

impl Resolution {
    /// The matched index, if the resolution was accepted.
    pub fn matched(&self) -> Option<usize> {
        match self {
            Self::Matched(index) => Some(*index),
            _ => None,
        }
    }
}

/// Resolve a point on (or near) the globe surface to the location the user
/// most plausibly intended.
///
/// The point is converted to geographic coordinates through the shared
/// projection, then compared to every location by great-circle distance.
/// With a single-location set there is no runner-up, so only the distance
/// cap applies.
pub fn resolve_nearest(point: DVec3, set: &LocationSet) -> Resolution {
    let (lat, lon) = point_to_lat_lon(point);

    let mut nearest: Option<(usize, f64)> = None;
    let mut runner_up_km = f64::INFINITY;

    for (index, location) in set.iter().enumerate() {
        let distance = haversine_km(lat, lon, location.latitude, location.longitude);
        match nearest {
            Some((_, nearest_km)) if distance >= nearest_km => {
                runner_up_km = runner_up_km.min(distance);
            }
            Some((_, nearest_km)) => {
                runner_up_km = nearest_km;
                nearest = Some((index, distance));
            }
            None => nearest = Some((index, distance)),
        }
    }

    let Some((nearest, nearest_km)) = nearest else {
        return Resolution::NoLocations;
    };

    if nearest_km >= MAX_MATCH_KM {
        return Resolution::TooFar { nearest, nearest_km };
    }
    if runner_up_km - nearest_km <= MATCH_MARGIN_KM {
        return Resolution::Ambiguous {
            nearest,
            nearest_km,
            runner_up_km,
        };
    }
    Resolution::Matched(nearest)
}

/// Round-robin cursor over the location list, used when geometric resolution
/// rejects a click.
///
/// The cursor is plain owned state, mutated and read within the same
/// pointer-up handler. It is deliberately not mirrored into anything
/// change-observed, so rapid consecutive clicks always read their own writes.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCycler {
    cursor: Option<usize>,
}

impl FallbackCycler {
    /// Advance to the next location index, wrapping at `len`.
    ///
    /// The first advance yields index 0. Returns `None` for an empty list;
    /// a cursor left over from a longer previous list wraps safely.
    pub fn advance(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let next = match self.cursor {
            Some(previous) => (previous + 1) % len,
            None => 0,
        };
        self.cursor = Some(next);
        Some(next)
    }

    /// Forget the cursor, e.g. when the location list is replaced.
    pub fn reset(&mut self) {
        self.cursor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::lat_lon_to_unit;
    use crate::location::Location;

    /// Degrees of longitude per kilometer along the equator.
    const DEG_PER_KM: f64 = 360.0 / (2.0 * std::f64::consts::PI * crate::geo::EARTH_RADIUS_KM);

    /// A location on the equator, `km` kilometers east of the prime meridian.
    fn equator_location(name: &str, km: f64) -> Location {
        Location {
            id: name.to_ascii_lowercase(),
            name: name.to_string(),
            country: String::new(),
            latitude: 0.0,
            longitude: km * DEG_PER_KM,
            color: "#ffffff".to_string(),
            description: String::new(),
            mentors: Vec::new(),
        }
    }

    /// A click on the equator at the prime meridian, on the collision sphere.
    fn click_at_origin() -> DVec3 {
        lat_lon_to_unit(0.0, 0.0) * 1.08
    }

    #[test]
    fn test_clear_winner_matches() {
        // 100 km vs 700 km vs 5000 km: gap 600 km clears the margin.
        let set = LocationSet::new(vec![
            equator_location("Near", 100.0),
            equator_location("Mid", 700.0),
            equator_location("Far", 5000.0),
        ]);
        assert_eq!(resolve_nearest(click_at_origin(), &set), Resolution::Matched(0));
    }

    #[test]
    fn test_winner_order_does_not_matter() {
        let set = LocationSet::new(vec![
            equator_location("Far", 5000.0),
            equator_location("Near", 100.0),
            equator_location("Mid", 700.0),
        ]);
        assert_eq!(resolve_nearest(click_at_origin(), &set), Resolution::Matched(1));
    }

    #[test]
    fn test_narrow_margin_is_ambiguous() {
        // 100 km vs 350 km: gap 250 km is under the 500 km margin.
        let set = LocationSet::new(vec![
            equator_location("Near", 100.0),
            equator_location("TooNearBehind", 350.0),
        ]);
        match resolve_nearest(click_at_origin(), &set) {
            Resolution::Ambiguous {
                nearest,
                nearest_km,
                runner_up_km,
            } => {
                assert_eq!(nearest, 0);
                assert!((nearest_km - 100.0).abs() < 1.0, "got {nearest_km}");
                assert!((runner_up_km - 350.0).abs() < 1.0, "got {runner_up_km}");
            }
            other => panic!("expected ambiguous, got {other:?}"),
        }
    }

    #[test]
    fn test_too_far_rejected_despite_clear_margin() {
        // Nearest at 10 500 km is beyond the cap even with no runner-up nearby.
        let set = LocationSet::new(vec![
            equator_location("Distant", 10_500.0),
            equator_location("MoreDistant", 18_000.0),
        ]);
        match resolve_nearest(click_at_origin(), &set) {
            Resolution::TooFar { nearest, nearest_km } => {
                assert_eq!(nearest, 0);
                assert!(nearest_km > MAX_MATCH_KM);
            }
            other => panic!("expected too-far, got {other:?}"),
        }
    }

    #[test]
    fn test_single_location_within_range_matches() {
        // No runner-up: the margin is vacuous, only the cap applies.
        let set = LocationSet::new(vec![equator_location("Only", 2000.0)]);
        assert_eq!(resolve_nearest(click_at_origin(), &set), Resolution::Matched(0));
    }

    #[test]
    fn test_single_location_out_of_range_rejected() {
        let set = LocationSet::new(vec![equator_location("Only", 12_000.0)]);
        assert!(matches!(
            resolve_nearest(click_at_origin(), &set),
            Resolution::TooFar { nearest: 0, .. }
        ));
    }

    #[test]
    fn test_empty_set_yields_no_locations() {
        let set = LocationSet::default();
        assert_eq!(resolve_nearest(click_at_origin(), &set), Resolution::NoLocations);
    }

    #[test]
    fn test_resolution_radius_independent() {
        // The same click direction resolves identically from the visible
        // globe surface and the collision sphere.
        let set = LocationSet::new(vec![
            equator_location("Near", 100.0),
            equator_location("Far", 5000.0),
        ]);
        let unit = lat_lon_to_unit(0.0, 0.0);
        assert_eq!(resolve_nearest(unit, &set), Resolution::Matched(0));
        assert_eq!(resolve_nearest(unit * 1.08, &set), Resolution::Matched(0));
    }

    #[test]
    fn test_cycler_round_robin_and_wrap() {
        let mut cycler = FallbackCycler::default();
        // Fresh cursor: first three advances walk the head of a 7-item list.
        assert_eq!(cycler.advance(7), Some(0));
        assert_eq!(cycler.advance(7), Some(1));
        assert_eq!(cycler.advance(7), Some(2));
        for expected in 3..7 {
            assert_eq!(cycler.advance(7), Some(expected));
        }
        // The 8th advance wraps back to the start.
        assert_eq!(cycler.advance(7), Some(0));
    }

    #[test]
    fn test_cycler_empty_list() {
        let mut cycler = FallbackCycler::default();
        assert_eq!(cycler.advance(0), None);
        // Still no cursor afterwards: the next non-empty advance starts at 0.
        assert_eq!(cycler.advance(3), Some(0));
    }

    #[test]
    fn test_cycler_stale_cursor_wraps_into_smaller_list() {
        let mut cycler = FallbackCycler::default();
        for _ in 0..6 {
            cycler.advance(7);
        }
        // Cursor sits at 5; a 3-item list wraps it into range.
        assert_eq!(cycler.advance(3), Some(0));
        assert_eq!(cycler.advance(3), Some(1));
    }

    #[test]
    fn test_cycler_reset() {
        let mut cycler = FallbackCycler::default();
        cycler.advance(7);
        cycler.advance(7);
        cycler.reset();
        assert_eq!(cycler.advance(7), Some(0));
    }
}
