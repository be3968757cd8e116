//! Catalog input: JSON schema and loading
//!
//! The engine consumes already-resolved orbital state; this module only
//! reads a local JSON catalog produced by whatever fetch pipeline sits
//! upstream. Malformed element sets are skipped with a warning so one bad
//! object never aborts a run.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::engine::{KeplerianElements, OrbitalState};

/// Root structure of the catalog file
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub generated_at: Option<String>,
    pub objects: Vec<CatalogObject>,
}

/// One tracked object as stored in the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogObject {
    pub id: u32,
    pub name: Option<String>,
    /// Epoch the elements are valid for
    pub epoch: DateTime<Utc>,
    pub elements: CatalogElements,
}

/// Keplerian elements as stored on disk (angles in degrees)
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogElements {
    pub semi_major_axis_km: f64,
    pub eccentricity: f64,
    pub inclination_deg: f64,
    pub raan_deg: f64,
    pub arg_perigee_deg: f64,
    pub mean_anomaly_deg: f64,
}

impl CatalogElements {
    fn to_radians(&self) -> KeplerianElements {
        KeplerianElements {
            semi_major_axis_km: self.semi_major_axis_km,
            eccentricity: self.eccentricity,
            inclination_rad: self.inclination_deg.to_radians(),
            raan_rad: self.raan_deg.to_radians(),
            arg_perigee_rad: self.arg_perigee_deg.to_radians(),
            mean_anomaly_rad: self.mean_anomaly_deg.to_radians(),
        }
    }
}

/// Load the catalog from JSON
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog> {
    let path = path.as_ref();
    log::info!("Loading catalog from {:?}", path);

    let file =
        File::open(path).with_context(|| format!("Failed to open catalog file: {:?}", path))?;
    let reader = BufReader::new(file);
    let catalog: Catalog =
        serde_json::from_reader(reader).with_context(|| "Failed to parse catalog JSON")?;

    log::info!("Loaded {} catalog objects", catalog.objects.len());
    Ok(catalog)
}

/// Build validated orbital states, skipping malformed entries.
pub fn build_states(catalog: &Catalog) -> Vec<OrbitalState> {
    let mut states = Vec::with_capacity(catalog.objects.len());
    for obj in &catalog.objects {
        match OrbitalState::new(obj.id, obj.epoch, obj.elements.to_radians()) {
            Ok(state) => states.push(state),
            Err(e) => {
                log::warn!(
                    "Skipping object {} ({}): {}",
                    obj.id,
                    obj.name.as_deref().unwrap_or("unnamed"),
                    e
                );
            }
        }
    }
    states
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Catalog {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_and_build_states() {
        let catalog = parse(
            r#"{
                "generated_at": "2026-08-29T00:00:00Z",
                "objects": [
                    {
                        "id": 25544,
                        "name": "ISS (ZARYA)",
                        "epoch": "2026-08-28T12:00:00Z",
                        "elements": {
                            "semi_major_axis_km": 6791.0,
                            "eccentricity": 0.0005,
                            "inclination_deg": 51.64,
                            "raan_deg": 120.3,
                            "arg_perigee_deg": 87.1,
                            "mean_anomaly_deg": 200.0
                        }
                    }
                ]
            }"#,
        );

        let states = build_states(&catalog);
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].id(), 25544);
        let el = states[0].elements();
        assert!((el.inclination_rad - 51.64_f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn test_malformed_entry_is_skipped_not_fatal() {
        let catalog = parse(
            r#"{
                "generated_at": null,
                "objects": [
                    {
                        "id": 1,
                        "name": "BAD",
                        "epoch": "2026-08-28T12:00:00Z",
                        "elements": {
                            "semi_major_axis_km": 7000.0,
                            "eccentricity": 1.4,
                            "inclination_deg": 0.0,
                            "raan_deg": 0.0,
                            "arg_perigee_deg": 0.0,
                            "mean_anomaly_deg": 0.0
                        }
                    },
                    {
                        "id": 2,
                        "name": "GOOD",
                        "epoch": "2026-08-28T12:00:00Z",
                        "elements": {
                            "semi_major_axis_km": 7000.0,
                            "eccentricity": 0.001,
                            "inclination_deg": 98.0,
                            "raan_deg": 10.0,
                            "arg_perigee_deg": 20.0,
                            "mean_anomaly_deg": 30.0
                        }
                    }
                ]
            }"#,
        );

        let states = build_states(&catalog);
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].id(), 2);
    }
}
