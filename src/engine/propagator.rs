//! Propagation contract and the bundled two-body reference backend
//!
//! The engine only depends on the [`Propagator`] trait: a pure mapping from
//! (state, time offset) to a position/velocity sample or an invalid marker.
//! Any physics backend (SGP4, numerically integrated, externally supplied
//! ephemerides) can be substituted as long as every output lands in the
//! same Earth-centered inertial frame.

use chrono::{DateTime, Utc};
use nalgebra::{Rotation3, Vector3};

use super::elements::{EARTH_RADIUS_KM, MU_EARTH_KM3_S2};
use super::state::OrbitalState;

/// Maximum Newton iterations when solving Kepler's equation
const KEPLER_MAX_ITERS: usize = 30;

/// Convergence tolerance on eccentric anomaly (rad)
const KEPLER_TOL_RAD: f64 = 1e-12;

/// One propagated instant for one object.
///
/// Ephemeral: produced and consumed within a single scan step. An invalid
/// sample means "no data at this instant", not an error.
#[derive(Debug, Clone, Copy)]
pub struct PropagationSample {
    /// Seconds from the run's start
    pub offset_s: f64,
    /// Position in the shared inertial frame (km)
    pub position_km: Vector3<f64>,
    /// Velocity in the shared inertial frame (km/s)
    pub velocity_km_s: Vector3<f64>,
    /// Whether this sample carries physically meaningful data
    pub valid: bool,
}

impl PropagationSample {
    /// Marker sample for instants the model cannot produce data for
    pub fn invalid(offset_s: f64) -> Self {
        Self {
            offset_s,
            position_km: Vector3::zeros(),
            velocity_km_s: Vector3::zeros(),
            valid: false,
        }
    }
}

/// Pure propagation backend.
///
/// Implementations must be deterministic functions of their inputs with no
/// hidden mutable state; the scanner calls them concurrently from multiple
/// workers. Failure to produce a physically meaningful result at an offset
/// is reported through an invalid sample, never a panic.
pub trait Propagator: Sync {
    fn propagate(&self, state: &OrbitalState, offset_s: f64) -> PropagationSample;
}

/// Closed-form two-body (Keplerian) propagator.
///
/// Advances the mean anomaly, solves Kepler's equation by Newton iteration
/// and rotates the perifocal state into the equatorial inertial frame. No
/// perturbations; adequate for screening-scale accuracy and as the default
/// backend when nothing better is injected.
pub struct KeplerPropagator {
    /// Absolute time that offset 0 corresponds to
    start: DateTime<Utc>,
}

impl KeplerPropagator {
    /// Anchor the propagator so that offset 0 equals `start`.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { start }
    }

    /// Run start this propagator is anchored to
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }
}

impl Propagator for KeplerPropagator {
    fn propagate(&self, state: &OrbitalState, offset_s: f64) -> PropagationSample {
        let el = state.elements();
        let a = el.semi_major_axis_km;
        let e = el.eccentricity;

        // Seconds between the object's element epoch and the requested instant
        let epoch_to_start_s = (self.start - state.epoch()).num_milliseconds() as f64 / 1000.0;
        let dt = epoch_to_start_s + offset_s;

        let n = el.mean_motion_rad_s();
        let mean_anomaly = el.mean_anomaly_rad + n * dt;

        let ecc_anomaly = match solve_kepler(mean_anomaly, e) {
            Some(ea) => ea,
            None => return PropagationSample::invalid(offset_s),
        };

        let (sin_e, cos_e) = ecc_anomaly.sin_cos();
        let radius = a * (1.0 - e * cos_e);
        if radius < EARTH_RADIUS_KM {
            // Orbit dips below the surface at this instant; treat as decayed
            return PropagationSample::invalid(offset_s);
        }

        // Perifocal position and velocity
        let b_over_a = (1.0 - e * e).sqrt();
        let pos_pf = Vector3::new(a * (cos_e - e), a * b_over_a * sin_e, 0.0);
        let v_scale = (MU_EARTH_KM3_S2 * a).sqrt() / radius;
        let vel_pf = Vector3::new(-v_scale * sin_e, v_scale * b_over_a * cos_e, 0.0);

        // Perifocal -> ECI: R3(RAAN) R1(inclination) R3(arg of perigee)
        let rot = Rotation3::from_axis_angle(&Vector3::z_axis(), el.raan_rad)
            * Rotation3::from_axis_angle(&Vector3::x_axis(), el.inclination_rad)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), el.arg_perigee_rad);

        PropagationSample {
            offset_s,
            position_km: rot * pos_pf,
            velocity_km_s: rot * vel_pf,
            valid: true,
        }
    }
}

/// Solve Kepler's equation E - e sin E = M for the eccentric anomaly.
///
/// Newton iteration with a bounded iteration count; returns `None` if the
/// tolerance is not reached, which the caller maps to an invalid sample.
fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> Option<f64> {
    // Reduce to [0, 2pi); sin/cos of the result are unaffected and Newton
    // starts close to the root even after many revolutions
    let mean_anomaly = mean_anomaly.rem_euclid(2.0 * std::f64::consts::PI);

    // High-eccentricity orbits converge poorly from E0 = M
    let mut ea = if eccentricity < 0.8 {
        mean_anomaly
    } else {
        std::f64::consts::PI
    };

    for _ in 0..KEPLER_MAX_ITERS {
        let f = ea - eccentricity * ea.sin() - mean_anomaly;
        let f_prime = 1.0 - eccentricity * ea.cos();
        let delta = f / f_prime;
        ea -= delta;
        if delta.abs() < KEPLER_TOL_RAD {
            return Some(ea);
        }
    }
    None
}
