//! Per-run scan configuration
//!
//! All parameters are explicit per run; the engine keeps no process-wide
//! state, so concurrent runs with different settings are safe.

use std::time::Duration;

/// Configuration for one conjunction scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Danger distance threshold (km); separations at or below this are
    /// reported as conjunctions
    pub threshold_km: f64,

    /// How far ahead to scan, in seconds from the run start
    pub horizon_s: f64,

    /// Fixed sampling step (seconds)
    pub step_s: f64,

    /// Absolute time tolerance refinement must converge to (seconds)
    pub precision_s: f64,

    /// Iteration cap for the refinement search; exhausting it falls back
    /// to the best sampled value
    pub max_refine_iters: usize,

    /// Optional wall-clock budget for the whole run. Pairs whose scan has
    /// not started when it expires are reported as not scanned.
    pub deadline: Option<Duration>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            threshold_km: 10.0,
            horizon_s: 72.0 * 3600.0,
            step_s: 60.0,
            precision_s: 0.5,
            max_refine_iters: 64,
            deadline: None,
        }
    }
}

impl ScanConfig {
    pub fn new(threshold_km: f64, horizon_s: f64, step_s: f64, precision_s: f64) -> Self {
        Self {
            threshold_km,
            horizon_s,
            step_s,
            precision_s,
            ..Default::default()
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Reject unusable configurations before any work begins.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold_km > 0.0) || !self.threshold_km.is_finite() {
            return Err(ConfigError::NonPositiveThreshold(self.threshold_km));
        }
        if !(self.horizon_s > 0.0) || !self.horizon_s.is_finite() {
            return Err(ConfigError::NonPositiveHorizon(self.horizon_s));
        }
        if !(self.step_s > 0.0) || !self.step_s.is_finite() {
            return Err(ConfigError::NonPositiveStep(self.step_s));
        }
        if !(self.precision_s > 0.0) || !self.precision_s.is_finite() {
            return Err(ConfigError::NonPositivePrecision(self.precision_s));
        }
        if self.max_refine_iters == 0 {
            return Err(ConfigError::ZeroRefineIterations);
        }
        Ok(())
    }
}

/// Fatal, run-level configuration errors.
///
/// These are the only errors that abort a scan; everything else (malformed
/// objects, invalid samples, timeouts) degrades to per-object or per-pair
/// outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveThreshold(f64),
    NonPositiveHorizon(f64),
    NonPositiveStep(f64),
    NonPositivePrecision(f64),
    ZeroRefineIterations,

    /// Two input states share an identifier; pair identity would be ambiguous
    DuplicateObjectId(u32),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveThreshold(v) => {
                write!(f, "Danger threshold must be positive, got {} km", v)
            }
            Self::NonPositiveHorizon(v) => {
                write!(f, "Scan horizon must be positive, got {} s", v)
            }
            Self::NonPositiveStep(v) => {
                write!(f, "Sampling step must be positive, got {} s", v)
            }
            Self::NonPositivePrecision(v) => {
                write!(f, "Refinement precision must be positive, got {} s", v)
            }
            Self::ZeroRefineIterations => {
                write!(f, "Refinement iteration cap must be at least 1")
            }
            Self::DuplicateObjectId(id) => {
                write!(f, "Duplicate object id {} in input set", id)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
