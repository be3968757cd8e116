//! Conjunction events, per-pair diagnostics and final report assembly

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use super::screening::CandidatePair;

/// How the minimum of an event was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventQuality {
    /// Best sampled value; refinement did not converge within its cap
    Sampled,
    /// Located by the bounded 1-D minimization
    Refined,
}

/// One detected close approach. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConjunctionEvent {
    pub id_a: u32,
    pub id_b: u32,
    /// Time of closest approach, seconds from the run start
    pub tca_offset_s: f64,
    /// Minimum separation (km), always at or below the run's threshold
    pub distance_km: f64,
    /// Relative speed at closest approach (km/s)
    pub relative_speed_km_s: f64,
    pub quality: EventQuality,
}

/// Why a pair produced no events despite surviving screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PairOutcomeKind {
    /// Fewer than two consecutive valid samples over the whole horizon
    InsufficientData,
    /// The run deadline expired before this pair's scan started
    NotScanned,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairDiagnostic {
    pub id_a: u32,
    pub id_b: u32,
    pub outcome: PairOutcomeKind,
}

/// Final output of one scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanReport {
    /// Number of pairs that survived screening
    pub screened_pairs: usize,
    /// Most severe first: ascending distance, then time, then pair ids
    pub events: Vec<ConjunctionEvent>,
    /// Pairs that could not be scanned, sorted by pair ids
    pub diagnostics: Vec<PairDiagnostic>,
}

/// Collects per-pair results and assembles the report once at the end.
///
/// Append-only while the scan runs; deduplication and sorting happen in a
/// single pass in [`finish`](Self::finish), not per insertion.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    events: Vec<ConjunctionEvent>,
    diagnostics: Vec<PairDiagnostic>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_events(&mut self, events: Vec<ConjunctionEvent>) {
        self.events.extend(events);
    }

    pub fn record_outcome(&mut self, pair: CandidatePair, outcome: PairOutcomeKind) {
        self.diagnostics.push(PairDiagnostic {
            id_a: pair.a,
            id_b: pair.b,
            outcome,
        });
    }

    /// Deduplicate to the global minimum per pair and sort deterministically.
    pub fn finish(self, screened_pairs: usize) -> ScanReport {
        let mut best: HashMap<(u32, u32), ConjunctionEvent> = HashMap::new();
        for event in self.events {
            let key = (event.id_a, event.id_b);
            let slot = best.entry(key).or_insert_with(|| event.clone());
            if is_more_severe(&event, slot) {
                *slot = event;
            }
        }

        let mut events: Vec<ConjunctionEvent> = best.into_values().collect();
        events.sort_by(|x, y| {
            cmp_f64(x.distance_km, y.distance_km)
                .then(cmp_f64(x.tca_offset_s, y.tca_offset_s))
                .then(x.id_a.cmp(&y.id_a))
                .then(x.id_b.cmp(&y.id_b))
        });

        let mut diagnostics = self.diagnostics;
        diagnostics.sort_by_key(|d| (d.id_a, d.id_b));

        ScanReport {
            screened_pairs,
            events,
            diagnostics,
        }
    }
}

fn cmp_f64(x: f64, y: f64) -> Ordering {
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

/// Smaller distance wins; equal distance keeps the earlier approach.
fn is_more_severe(candidate: &ConjunctionEvent, current: &ConjunctionEvent) -> bool {
    match cmp_f64(candidate.distance_km, current.distance_km) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => candidate.tca_offset_s < current.tca_offset_s,
    }
}
