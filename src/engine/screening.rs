//! Coarse pair screening from radius bounds
//!
//! Reduces the O(n²) candidate space before any propagation is paid for.
//! The bound is conservative: pairs that survive may still never come
//! close, but no pair whose true minimum separation is at or below the
//! threshold is ever discarded.

use super::state::OrbitalState;

/// Unordered pair of object identifiers, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidatePair {
    pub a: u32,
    pub b: u32,
}

impl CandidatePair {
    /// Canonical ordering; `x` and `y` must differ.
    pub fn new(x: u32, y: u32) -> Self {
        debug_assert_ne!(x, y, "a pair cannot contain the same object twice");
        if x < y {
            Self { a: x, b: y }
        } else {
            Self { a: y, b: x }
        }
    }
}

/// Lower bound on the separation of two objects at any instant (km).
///
/// Each object's geocentric radius always lies inside its
/// [perigee, apogee] interval, so the gap between the two intervals bounds
/// the instantaneous separation from below regardless of where either
/// object sits in its orbit. Overlapping intervals give a bound of zero.
pub fn separation_lower_bound_km(a: &OrbitalState, b: &OrbitalState) -> f64 {
    let gap = a
        .perigee_radius_km()
        .max(b.perigee_radius_km())
        - a.apogee_radius_km().min(b.apogee_radius_km());
    gap.max(0.0)
}

/// Screen all unordered pairs, keeping those that could possibly come
/// within `threshold_km` over the horizon.
pub fn screen_pairs(states: &[OrbitalState], threshold_km: f64) -> Vec<CandidatePair> {
    let mut pairs = Vec::new();
    for (i, a) in states.iter().enumerate() {
        for b in &states[i + 1..] {
            if separation_lower_bound_km(a, b) <= threshold_km {
                pairs.push(CandidatePair::new(a.id(), b.id()));
            }
        }
    }

    log::debug!(
        "Screening kept {} of {} pairs",
        pairs.len(),
        states.len() * states.len().saturating_sub(1) / 2
    );
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::elements::{KeplerianElements, EARTH_RADIUS_KM};
    use chrono::{DateTime, Utc};

    fn epoch() -> DateTime<Utc> {
        "2026-08-01T00:00:00Z".parse().unwrap()
    }

    fn circular_state(id: u32, altitude_km: f64) -> OrbitalState {
        OrbitalState::new(
            id,
            epoch(),
            KeplerianElements::circular(EARTH_RADIUS_KM + altitude_km),
        )
        .unwrap()
    }

    #[test]
    fn test_pair_is_canonically_ordered() {
        let p = CandidatePair::new(90, 10);
        assert_eq!((p.a, p.b), (10, 90));
        assert_eq!(p, CandidatePair::new(10, 90));
    }

    #[test]
    fn test_disjoint_shells_are_screened_out() {
        // Circular orbits 500 km apart can never pass within 10 km
        let states = vec![circular_state(1, 400.0), circular_state(2, 900.0)];
        assert!(screen_pairs(&states, 10.0).is_empty());
    }

    #[test]
    fn test_overlapping_intervals_survive() {
        let mut el_a = KeplerianElements::circular(8000.0);
        el_a.eccentricity = 0.1; // 7200..8800 km
        let mut el_b = KeplerianElements::circular(9000.0);
        el_b.eccentricity = 0.05; // 8550..9450 km

        let states = vec![
            OrbitalState::new(1, epoch(), el_a).unwrap(),
            OrbitalState::new(2, epoch(), el_b).unwrap(),
        ];
        let pairs = screen_pairs(&states, 10.0);
        assert_eq!(pairs, vec![CandidatePair::new(1, 2)]);
    }

    #[test]
    fn test_bound_equals_interval_gap() {
        let a = circular_state(1, 400.0);
        let b = circular_state(2, 900.0);
        assert!((separation_lower_bound_km(&a, &b) - 500.0).abs() < 1e-9);
        // Symmetric
        assert_eq!(
            separation_lower_bound_km(&a, &b),
            separation_lower_bound_km(&b, &a)
        );
    }

    #[test]
    fn test_screening_is_conservative_near_threshold() {
        // Gap exactly at the threshold must be kept (<=, not <)
        let states = vec![circular_state(1, 400.0), circular_state(2, 410.0)];
        assert_eq!(screen_pairs(&states, 10.0).len(), 1);
        assert!(screen_pairs(&states, 9.999).is_empty());
    }

    #[test]
    fn test_larger_threshold_never_keeps_fewer_pairs() {
        let states: Vec<OrbitalState> = (0..8)
            .map(|k| circular_state(k, 300.0 + 55.0 * k as f64))
            .collect();
        let mut previous = 0;
        for threshold in [1.0, 10.0, 60.0, 120.0, 1000.0] {
            let kept = screen_pairs(&states, threshold).len();
            assert!(kept >= previous, "threshold {} lost pairs", threshold);
            previous = kept;
        }
    }

    #[test]
    fn test_no_duplicate_or_self_pairs() {
        let states: Vec<OrbitalState> =
            (0..6).map(|k| circular_state(k, 400.0 + k as f64)).collect();
        let pairs = screen_pairs(&states, 50.0);

        let mut seen = std::collections::HashSet::new();
        for p in &pairs {
            assert_ne!(p.a, p.b);
            assert!(seen.insert(*p), "pair {:?} appeared twice", p);
        }
    }
}
