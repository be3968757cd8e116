//! Conjunction detection engine
//!
//! Two-stage close-approach detection over a set of tracked objects:
//!
//! 1. **Screening** discards pairs whose perigee/apogee radius intervals
//!    are further apart than the danger threshold. Conservative: a pair
//!    that could ever come close always survives.
//! 2. **Scanning** samples each surviving pair's propagated separation
//!    across the horizon, refines every promising dip with a bounded
//!    golden-section search, and emits [`ConjunctionEvent`]s.
//!
//! The propagation backend is injected through the [`Propagator`] trait;
//! the engine owns no global state and performs no I/O.

mod config;
mod elements;
mod report;
mod scanner;
mod screening;
mod state;

pub mod propagator;

pub use config::{ConfigError, ScanConfig};
pub use elements::{
    KeplerianElements, MalformedElementsError, EARTH_RADIUS_KM, MU_EARTH_KM3_S2,
};
pub use propagator::{KeplerPropagator, PropagationSample, Propagator};
pub use report::{
    ConjunctionEvent, EventQuality, PairDiagnostic, PairOutcomeKind, ResultAggregator, ScanReport,
};
pub use screening::{screen_pairs, separation_lower_bound_km, CandidatePair};
pub use state::OrbitalState;

use scanner::PairScanResult;
use std::collections::HashSet;

/// Run one full conjunction scan: screen, scan, aggregate.
///
/// The only fatal errors are configuration-level ones, raised before any
/// work begins; malformed objects are expected to have been filtered out
/// at [`OrbitalState`] construction, and per-pair problems degrade to
/// diagnostics in the report.
pub fn run_scan(
    states: &[OrbitalState],
    propagator: &dyn Propagator,
    config: &ScanConfig,
) -> Result<ScanReport, ConfigError> {
    config.validate()?;

    let mut ids = HashSet::with_capacity(states.len());
    for state in states {
        if !ids.insert(state.id()) {
            return Err(ConfigError::DuplicateObjectId(state.id()));
        }
    }

    let pairs = screen_pairs(states, config.threshold_km);
    log::info!(
        "Scanning {} candidate pairs from {} objects over {:.1} h",
        pairs.len(),
        states.len(),
        config.horizon_s / 3600.0
    );

    let mut aggregator = ResultAggregator::new();
    for (pair, result) in scanner::scan_pairs(states, &pairs, propagator, config) {
        match result {
            PairScanResult::Events(events) => aggregator.record_events(events),
            PairScanResult::InsufficientData => {
                aggregator.record_outcome(pair, PairOutcomeKind::InsufficientData)
            }
            PairScanResult::NotScanned => {
                aggregator.record_outcome(pair, PairOutcomeKind::NotScanned)
            }
        }
    }

    let report = aggregator.finish(pairs.len());
    log::info!(
        "Scan complete: {} events, {} pairs with diagnostics",
        report.events.len(),
        report.diagnostics.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn epoch() -> DateTime<Utc> {
        "2026-08-01T00:00:00Z".parse().unwrap()
    }

    fn state(id: u32, radius_km: f64, ecc: f64, mean_anomaly_rad: f64) -> OrbitalState {
        let mut el = KeplerianElements::circular(radius_km);
        el.eccentricity = ecc;
        el.mean_anomaly_rad = mean_anomaly_rad;
        OrbitalState::new(id, epoch(), el).unwrap()
    }

    /// A small mixed constellation with some genuinely close geometry.
    fn test_set() -> Vec<OrbitalState> {
        vec![
            state(1, 7000.0, 0.0, 0.0),
            state(2, 7004.0, 0.0, 0.001),
            state(3, 7002.0, 0.01, 2.0),
            state(4, 8500.0, 0.0, 0.0),
            state(5, 8500.0, 0.05, 1.0),
            state(6, 12000.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_screening_soundness_against_fine_scan() {
        // Whatever the fine scan finds at or below T, screening must keep.
        let states = test_set();
        let prop = KeplerPropagator::new(epoch());
        let horizon = 7200.0;

        for threshold in [1.0, 10.0, 100.0, 700.0] {
            let kept: std::collections::HashSet<CandidatePair> =
                screen_pairs(&states, threshold).into_iter().collect();

            for (i, a) in states.iter().enumerate() {
                for b in &states[i + 1..] {
                    // Exhaustive fine sampling at 5 s
                    let mut true_min = f64::INFINITY;
                    let mut t = 0.0;
                    while t <= horizon {
                        let sa = prop.propagate(a, t);
                        let sb = prop.propagate(b, t);
                        if sa.valid && sb.valid {
                            true_min = true_min.min((sa.position_km - sb.position_km).norm());
                        }
                        t += 5.0;
                    }
                    if true_min <= threshold {
                        assert!(
                            kept.contains(&CandidatePair::new(a.id(), b.id())),
                            "pair ({}, {}) with true min {} km discarded at threshold {}",
                            a.id(),
                            b.id(),
                            true_min,
                            threshold
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_full_run_is_deterministic() {
        let states = test_set();
        let prop = KeplerPropagator::new(epoch());
        let config = ScanConfig::new(10.0, 7200.0, 60.0, 0.5);

        let first = run_scan(&states, &prop, &config).unwrap();
        let second = run_scan(&states, &prop, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_threshold_monotonicity() {
        let states = test_set();
        let prop = KeplerPropagator::new(epoch());

        let mut previous = 0;
        for threshold in [0.5, 2.0, 5.0, 10.0, 25.0] {
            let config = ScanConfig::new(threshold, 7200.0, 60.0, 0.5);
            let report = run_scan(&states, &prop, &config).unwrap();
            for event in &report.events {
                assert!(event.distance_km <= threshold);
                assert!(event.tca_offset_s >= 0.0 && event.tca_offset_s <= 7200.0);
            }
            assert!(
                report.events.len() >= previous,
                "raising threshold to {} lost events",
                threshold
            );
            previous = report.events.len();
        }
    }

    #[test]
    fn test_rejects_duplicate_ids_before_work() {
        let states = vec![state(1, 7000.0, 0.0, 0.0), state(1, 8000.0, 0.0, 0.0)];
        let prop = KeplerPropagator::new(epoch());
        let config = ScanConfig::default();

        assert_eq!(
            run_scan(&states, &prop, &config),
            Err(ConfigError::DuplicateObjectId(1))
        );
    }

    #[test]
    fn test_rejects_bad_config_before_work() {
        let prop = KeplerPropagator::new(epoch());
        let config = ScanConfig::new(-1.0, 3600.0, 60.0, 0.5);
        assert!(run_scan(&[], &prop, &config).is_err());
    }

    #[test]
    fn test_timeout_reports_not_scanned_pairs() {
        let states = test_set();
        let prop = KeplerPropagator::new(epoch());
        let config = ScanConfig::new(10.0, 7200.0, 60.0, 0.5)
            .with_deadline(std::time::Duration::ZERO);

        let report = run_scan(&states, &prop, &config).unwrap();
        assert!(report.events.is_empty());
        assert_eq!(report.diagnostics.len(), report.screened_pairs);
        assert!(report
            .diagnostics
            .iter()
            .all(|d| d.outcome == PairOutcomeKind::NotScanned));
    }

    #[test]
    fn test_empty_input_yields_empty_report() {
        let prop = KeplerPropagator::new(epoch());
        let report = run_scan(&[], &prop, &ScanConfig::default()).unwrap();
        assert!(report.events.is_empty());
        assert_eq!(report.screened_pairs, 0);
    }
}
