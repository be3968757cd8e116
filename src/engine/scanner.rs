//! Per-pair time scanning and closest-approach refinement
//!
//! For every candidate pair the scanner samples the propagated separation
//! at a fixed step across the horizon, tracks local minima inside runs of
//! consecutive valid samples, and refines each promising dip with a
//! bounded golden-section search. Pairs are independent, so the scan fans
//! out across a rayon pool and results are merged once at the end.

use std::collections::HashMap;
use std::time::Instant;

use rayon::prelude::*;

use super::config::ScanConfig;
use super::propagator::Propagator;
use super::report::{ConjunctionEvent, EventQuality};
use super::screening::CandidatePair;
use super::state::OrbitalState;

const INV_PHI: f64 = 0.618_033_988_749_894_9;

/// Outcome of scanning one candidate pair.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PairScanResult {
    /// Zero or more dips at or below the threshold
    Events(Vec<ConjunctionEvent>),
    /// Fewer than two consecutive valid samples over the whole horizon
    InsufficientData,
    /// The run deadline expired before this pair was picked up
    NotScanned,
}

/// Separation between two objects at one sampled instant.
#[derive(Debug, Clone, Copy)]
struct SeparationSample {
    offset_s: f64,
    distance_km: f64,
    relative_speed_km_s: f64,
}

/// Scan every candidate pair, in parallel, honoring the optional deadline.
///
/// The deadline is checked once per pair before its scan starts: a pair is
/// either fully scanned or reported as not scanned.
pub(crate) fn scan_pairs(
    states: &[OrbitalState],
    pairs: &[CandidatePair],
    propagator: &dyn Propagator,
    config: &ScanConfig,
) -> Vec<(CandidatePair, PairScanResult)> {
    let by_id: HashMap<u32, &OrbitalState> = states.iter().map(|s| (s.id(), s)).collect();
    let started = Instant::now();

    pairs
        .par_iter()
        .map(|pair| {
            if let Some(deadline) = config.deadline {
                if started.elapsed() >= deadline {
                    return (*pair, PairScanResult::NotScanned);
                }
            }
            let a = by_id[&pair.a];
            let b = by_id[&pair.b];
            (*pair, scan_pair(a, b, propagator, config))
        })
        .collect()
}

/// Sample one pair across the horizon and refine every promising dip.
pub(crate) fn scan_pair(
    a: &OrbitalState,
    b: &OrbitalState,
    propagator: &dyn Propagator,
    config: &ScanConfig,
) -> PairScanResult {
    let steps = (config.horizon_s / config.step_s).ceil() as usize;

    let mut events = Vec::new();
    let mut usable = false;

    // Accumulate maximal runs of consecutive valid samples; an instant
    // where either object is invalid ends the current run, so minima are
    // never detected across a gap.
    let mut run: Vec<SeparationSample> = Vec::new();
    for k in 0..=steps {
        let offset_s = (k as f64 * config.step_s).min(config.horizon_s);
        match separation_at(a, b, propagator, offset_s) {
            Some(sample) => run.push(sample),
            None => {
                if run.len() >= 2 {
                    usable = true;
                    scan_run(a, b, propagator, config, &run, &mut events);
                }
                run.clear();
            }
        }
    }
    if run.len() >= 2 {
        usable = true;
        scan_run(a, b, propagator, config, &run, &mut events);
    }

    if !usable {
        return PairScanResult::InsufficientData;
    }
    PairScanResult::Events(events)
}

/// Detect and refine local minima within one gap-free run of samples.
fn scan_run(
    a: &OrbitalState,
    b: &OrbitalState,
    propagator: &dyn Propagator,
    config: &ScanConfig,
    run: &[SeparationSample],
    events: &mut Vec<ConjunctionEvent>,
) {
    let last = run.len() - 1;

    for i in 0..=last {
        let d = run[i].distance_km;
        // Boundary comparisons are non-strict so a run that starts or ends
        // on a flat plateau still yields a candidate there; the aggregator
        // dedupes any extra event this admits for the same pair.
        let is_minimum = if i == 0 {
            d <= run[1].distance_km
        } else if i == last {
            d <= run[last - 1].distance_km
        } else {
            d <= run[i - 1].distance_km && d < run[i + 1].distance_km
        };
        if !is_minimum {
            continue;
        }

        // Inflate the threshold by the farthest the pair can drift within
        // one step, so a dip falling between samples is not missed.
        let margin_km = config.threshold_km + run[i].relative_speed_km_s * config.step_s;
        if d > margin_km {
            continue;
        }

        let bracket_lo = if i == 0 { run[0] } else { run[i - 1] };
        let bracket_hi = if i == last { run[last] } else { run[i + 1] };
        if let Some(event) =
            refine_minimum(a, b, propagator, config, run[i], bracket_lo, bracket_hi)
        {
            events.push(event);
        }
    }
}

/// Golden-section search over the bracket around one sampled dip.
///
/// Terminates unconditionally: either the bracket shrinks to the
/// configured precision or the iteration cap is hit, in which case the
/// sampled dip is kept with quality `Sampled`. The result is never worse
/// than the sampled dip; ties keep the sampled instant.
fn refine_minimum(
    a: &OrbitalState,
    b: &OrbitalState,
    propagator: &dyn Propagator,
    config: &ScanConfig,
    sampled: SeparationSample,
    bracket_lo: SeparationSample,
    bracket_hi: SeparationSample,
) -> Option<ConjunctionEvent> {
    let eval = |t: f64| -> f64 {
        separation_at(a, b, propagator, t)
            .map(|s| s.distance_km)
            .unwrap_or(f64::INFINITY)
    };

    let mut lo = bracket_lo.offset_s;
    let mut hi = bracket_hi.offset_s;
    let mut probe_lo = hi - INV_PHI * (hi - lo);
    let mut probe_hi = lo + INV_PHI * (hi - lo);
    let mut f_lo = eval(probe_lo);
    let mut f_hi = eval(probe_hi);

    let mut best_t = if f_lo <= f_hi { probe_lo } else { probe_hi };
    let mut best_d = f_lo.min(f_hi);

    let mut iters = 0usize;
    while hi - lo > config.precision_s && iters < config.max_refine_iters {
        if f_lo <= f_hi {
            hi = probe_hi;
            probe_hi = probe_lo;
            f_hi = f_lo;
            probe_lo = hi - INV_PHI * (hi - lo);
            f_lo = eval(probe_lo);
        } else {
            lo = probe_lo;
            probe_lo = probe_hi;
            f_lo = f_hi;
            probe_hi = lo + INV_PHI * (hi - lo);
            f_hi = eval(probe_hi);
        }
        if f_lo < best_d {
            best_d = f_lo;
            best_t = probe_lo;
        }
        if f_hi < best_d {
            best_d = f_hi;
            best_t = probe_hi;
        }
        iters += 1;
    }

    let converged = hi - lo <= config.precision_s;
    let (tca_s, distance_km, quality) = if !converged {
        (sampled.offset_s, sampled.distance_km, EventQuality::Sampled)
    } else if best_d < sampled.distance_km {
        (best_t, best_d, EventQuality::Refined)
    } else {
        // Refinement confirmed the sampled instant is the minimum
        (sampled.offset_s, sampled.distance_km, EventQuality::Refined)
    };

    if distance_km > config.threshold_km {
        // Near-miss: the dip ruled itself out under the real threshold
        return None;
    }

    let relative_speed_km_s = match separation_at(a, b, propagator, tca_s) {
        Some(s) => s.relative_speed_km_s,
        None => sampled.relative_speed_km_s,
    };

    Some(ConjunctionEvent {
        id_a: a.id().min(b.id()),
        id_b: a.id().max(b.id()),
        tca_offset_s: tca_s.clamp(0.0, config.horizon_s),
        distance_km,
        relative_speed_km_s,
        quality,
    })
}

/// Separation of the pair at one instant, `None` if either sample is invalid.
fn separation_at(
    a: &OrbitalState,
    b: &OrbitalState,
    propagator: &dyn Propagator,
    offset_s: f64,
) -> Option<SeparationSample> {
    let sa = propagator.propagate(a, offset_s);
    let sb = propagator.propagate(b, offset_s);
    if !sa.valid || !sb.valid {
        return None;
    }
    Some(SeparationSample {
        offset_s,
        distance_km: (sa.position_km - sb.position_km).norm(),
        relative_speed_km_s: (sa.velocity_km_s - sb.velocity_km_s).norm(),
    })
}
