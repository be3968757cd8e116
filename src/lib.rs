//! conjscan - orbital conjunction detection
//!
//! Library form of the close-approach scanner: feed it a set of validated
//! [`OrbitalState`]s, a [`Propagator`] backend and a [`ScanConfig`], get
//! back a [`ScanReport`] of conjunction events sorted most-severe-first.
//!
//! ```no_run
//! use conjscan::engine::{run_scan, KeplerPropagator, ScanConfig};
//!
//! # fn demo(states: Vec<conjscan::engine::OrbitalState>) -> anyhow::Result<()> {
//! let propagator = KeplerPropagator::new(chrono::Utc::now());
//! let report = run_scan(&states, &propagator, &ScanConfig::default())?;
//! for event in &report.events {
//!     println!("{} x {}: {:.2} km", event.id_a, event.id_b, event.distance_km);
//! }
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod engine;

pub use engine::{
    run_scan, ConjunctionEvent, KeplerPropagator, OrbitalState, Propagator, ScanConfig, ScanReport,
};
