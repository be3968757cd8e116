//! Per-object orbital state snapshots

use chrono::{DateTime, Utc};

use super::elements::{KeplerianElements, MalformedElementsError};

/// Immutable snapshot of one tracked object's orbit.
///
/// Validation and the perigee/apogee radius bounds happen once here, so
/// the screening and scanning stages never touch the raw elements.
#[derive(Debug, Clone)]
pub struct OrbitalState {
    id: u32,
    epoch: DateTime<Utc>,
    elements: KeplerianElements,
    perigee_radius_km: f64,
    apogee_radius_km: f64,
}

impl OrbitalState {
    /// Validate the element set and derive the radius bounds.
    pub fn new(
        id: u32,
        epoch: DateTime<Utc>,
        elements: KeplerianElements,
    ) -> Result<Self, MalformedElementsError> {
        elements.validate()?;
        Ok(Self {
            id,
            epoch,
            elements,
            perigee_radius_km: elements.perigee_radius_km(),
            apogee_radius_km: elements.apogee_radius_km(),
        })
    }

    /// Unique object identifier (NORAD-style catalog number)
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Reference epoch the elements are valid for
    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    /// The underlying element set
    pub fn elements(&self) -> &KeplerianElements {
        &self.elements
    }

    /// Minimum geocentric radius over one period (km)
    pub fn perigee_radius_km(&self) -> f64 {
        self.perigee_radius_km
    }

    /// Maximum geocentric radius over one period (km)
    pub fn apogee_radius_km(&self) -> f64 {
        self.apogee_radius_km
    }
}
