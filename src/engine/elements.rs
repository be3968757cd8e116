//! Keplerian orbital element sets and their physical validation

use std::f64::consts::PI;

/// Earth's gravitational parameter (GM) in km³/s²
pub const MU_EARTH_KM3_S2: f64 = 398600.4418;

/// Earth's mean radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Classical Keplerian elements in an Earth-centered inertial frame.
///
/// Angles are in radians, the semi-major axis in kilometers. The mean
/// anomaly is the value at the object's reference epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerianElements {
    /// Semi-major axis (km)
    pub semi_major_axis_km: f64,
    /// Eccentricity, must lie in [0, 1)
    pub eccentricity: f64,
    /// Inclination (rad)
    pub inclination_rad: f64,
    /// Right ascension of the ascending node (rad)
    pub raan_rad: f64,
    /// Argument of perigee (rad)
    pub arg_perigee_rad: f64,
    /// Mean anomaly at epoch (rad)
    pub mean_anomaly_rad: f64,
}

/// Element sets that are physically inconsistent
#[derive(Debug, Clone, PartialEq)]
pub enum MalformedElementsError {
    /// A field is NaN or infinite
    NonFinite { field: &'static str },

    /// Eccentricity outside [0, 1); hyperbolic and parabolic orbits are
    /// not closed and have no apogee bound
    EccentricityOutOfRange { value: f64 },

    /// Semi-major axis must be positive for a bound orbit
    NonPositiveSemiMajorAxis { value: f64 },
}

impl std::fmt::Display for MalformedElementsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite { field } => {
                write!(f, "Element field '{}' is not finite", field)
            }
            Self::EccentricityOutOfRange { value } => {
                write!(f, "Eccentricity {} outside [0, 1)", value)
            }
            Self::NonPositiveSemiMajorAxis { value } => {
                write!(f, "Semi-major axis {} km is not positive", value)
            }
        }
    }
}

impl std::error::Error for MalformedElementsError {}

impl KeplerianElements {
    /// Check the element set for physical consistency.
    ///
    /// Runs once per object at construction of an
    /// [`OrbitalState`](super::OrbitalState), never on the propagation
    /// hot path.
    pub fn validate(&self) -> Result<(), MalformedElementsError> {
        let fields = [
            ("semi_major_axis_km", self.semi_major_axis_km),
            ("eccentricity", self.eccentricity),
            ("inclination_rad", self.inclination_rad),
            ("raan_rad", self.raan_rad),
            ("arg_perigee_rad", self.arg_perigee_rad),
            ("mean_anomaly_rad", self.mean_anomaly_rad),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(MalformedElementsError::NonFinite { field });
            }
        }

        if !(0.0..1.0).contains(&self.eccentricity) {
            return Err(MalformedElementsError::EccentricityOutOfRange {
                value: self.eccentricity,
            });
        }
        if self.semi_major_axis_km <= 0.0 {
            return Err(MalformedElementsError::NonPositiveSemiMajorAxis {
                value: self.semi_major_axis_km,
            });
        }

        Ok(())
    }

    /// Perigee radius (km, geocentric)
    pub fn perigee_radius_km(&self) -> f64 {
        self.semi_major_axis_km * (1.0 - self.eccentricity)
    }

    /// Apogee radius (km, geocentric)
    pub fn apogee_radius_km(&self) -> f64 {
        self.semi_major_axis_km * (1.0 + self.eccentricity)
    }

    /// Mean motion in rad/s
    pub fn mean_motion_rad_s(&self) -> f64 {
        (MU_EARTH_KM3_S2 / self.semi_major_axis_km.powi(3)).sqrt()
    }

    /// Orbital period in seconds
    pub fn period_s(&self) -> f64 {
        2.0 * PI / self.mean_motion_rad_s()
    }

    /// Circular orbit at the given geocentric radius, zero inclination.
    /// Handy for constructing synthetic scenarios.
    pub fn circular(radius_km: f64) -> Self {
        Self {
            semi_major_axis_km: radius_km,
            eccentricity: 0.0,
            inclination_rad: 0.0,
            raan_rad: 0.0,
            arg_perigee_rad: 0.0,
            mean_anomaly_rad: 0.0,
        }
    }
}
