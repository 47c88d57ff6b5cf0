//! Plume observation types.
//!
//! `PlumeRecord` mirrors the catalog's GeoJSON feature shape and is
//! deliberately lenient: a record with missing or truncated geometry still
//! deserializes, and is only rejected when converted to a
//! [`PointObservation`]. One bad record must never abort a batch.

use serde::{Deserialize, Serialize};

/// A validated point observation: one detected plume with its
/// emission-rate magnitude. Read-only input to the rasterizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointObservation {
    pub longitude: f64,
    pub latitude: f64,
    /// Emission rate. Values <= 0 contribute nothing to the grid.
    pub magnitude: f64,
}

/// A raw plume feature as returned by the catalog collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlumeRecord {
    #[serde(default)]
    pub geometry: PlumeGeometry,
    #[serde(default)]
    pub properties: PlumeProperties,
}

/// Point geometry: `coordinates` is `[lon, lat]` when well formed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlumeGeometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlumeProperties {
    /// Automated emission-rate estimate for the plume.
    #[serde(default)]
    pub emission_auto: f64,
    /// Catalog identifier, carried through for map tooltips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plume_id: Option<String>,
}

impl PlumeRecord {
    /// Convenience constructor for tests and fixtures.
    pub fn point(longitude: f64, latitude: f64, emission: f64) -> Self {
        Self {
            geometry: PlumeGeometry {
                coordinates: vec![longitude, latitude],
            },
            properties: PlumeProperties {
                emission_auto: emission,
                plume_id: None,
            },
        }
    }

    /// Validate the geometry and extract a [`PointObservation`].
    ///
    /// Returns `None` for malformed records: a coordinate array that is
    /// not exactly `[lon, lat]`, or non-finite values.
    pub fn observation(&self) -> Option<PointObservation> {
        let (longitude, latitude) = match self.geometry.coordinates.as_slice() {
            [lon, lat] => (*lon, *lat),
            _ => return None,
        };
        if !longitude.is_finite() || !latitude.is_finite() {
            return None;
        }
        Some(PointObservation {
            longitude,
            latitude,
            magnitude: self.properties.emission_auto,
        })
    }
}
