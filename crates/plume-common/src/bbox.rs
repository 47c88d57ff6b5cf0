//! Geographic bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees (EPSG:4326).
///
/// Invariant: `min_lat < max_lat` and `min_lon < max_lon`. Construct
/// through [`BoundingBox::new`] to have the invariant checked up front.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    /// Create a bounding box, rejecting degenerate or inverted extents.
    pub fn new(
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    ) -> Result<Self, InvalidBounds> {
        let bbox = Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        };
        bbox.validate()?;
        Ok(bbox)
    }

    /// The full Earth extent, used when a request does not specify bounds.
    pub fn global() -> Self {
        Self {
            min_lat: -90.0,
            min_lon: -180.0,
            max_lat: 90.0,
            max_lon: 180.0,
        }
    }

    /// Parse Leaflet-style corner pairs: `[[minLat,minLon],[maxLat,maxLon]]`.
    pub fn from_corners(corners: [[f64; 2]; 2]) -> Result<Self, InvalidBounds> {
        let [[min_lat, min_lon], [max_lat, max_lon]] = corners;
        Self::new(min_lat, min_lon, max_lat, max_lon)
    }

    /// Corner pairs in the order map clients expect:
    /// `[[minLat,minLon],[maxLat,maxLon]]`.
    pub fn corners(&self) -> [[f64; 2]; 2] {
        [
            [self.min_lat, self.min_lon],
            [self.max_lat, self.max_lon],
        ]
    }

    /// Height of the box in degrees of latitude.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Width of the box in degrees of longitude.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// Check the box invariant. Zero-area and inverted boxes are rejected
    /// here, before any grid allocation or step-size division can happen.
    pub fn validate(&self) -> Result<(), InvalidBounds> {
        if !(self.min_lat.is_finite()
            && self.min_lon.is_finite()
            && self.max_lat.is_finite()
            && self.max_lon.is_finite())
        {
            return Err(InvalidBounds::NonFinite);
        }
        if self.min_lat >= self.max_lat || self.min_lon >= self.max_lon {
            return Err(InvalidBounds::Degenerate {
                min_lat: self.min_lat,
                min_lon: self.min_lon,
                max_lat: self.max_lat,
                max_lon: self.max_lon,
            });
        }
        Ok(())
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::global()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InvalidBounds {
    #[error("Degenerate bounding box: [[{min_lat},{min_lon}],[{max_lat},{max_lon}]] (min must be strictly less than max)")]
    Degenerate {
        min_lat: f64,
        min_lon: f64,
        max_lat: f64,
        max_lon: f64,
    },

    #[error("Bounding box coordinates must be finite")]
    NonFinite,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_default() {
        let bbox = BoundingBox::default();
        assert_eq!(bbox.min_lat, -90.0);
        assert_eq!(bbox.min_lon, -180.0);
        assert_eq!(bbox.max_lat, 90.0);
        assert_eq!(bbox.max_lon, 180.0);
        assert!(bbox.validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_box() {
        assert!(BoundingBox::new(50.0, -10.0, 40.0, 10.0).is_err());
        assert!(BoundingBox::new(40.0, 10.0, 50.0, -10.0).is_err());
    }

    #[test]
    fn test_rejects_zero_area_box() {
        assert!(BoundingBox::new(40.0, -10.0, 40.0, 10.0).is_err());
        assert!(BoundingBox::new(40.0, 10.0, 50.0, 10.0).is_err());
    }

    #[test]
    fn test_rejects_non_finite() {
        assert!(BoundingBox::new(f64::NAN, -10.0, 50.0, 10.0).is_err());
        assert!(BoundingBox::new(-90.0, f64::NEG_INFINITY, 90.0, 180.0).is_err());
    }

    #[test]
    fn test_corner_round_trip() {
        let bbox = BoundingBox::new(32.0, -120.0, 42.0, -114.0).unwrap();
        let corners = bbox.corners();
        assert_eq!(corners, [[32.0, -120.0], [42.0, -114.0]]);
        let back = BoundingBox::from_corners(corners).unwrap();
        assert_eq!(back, bbox);
    }

    #[test]
    fn test_spans() {
        let bbox = BoundingBox::global();
        assert_eq!(bbox.lat_span(), 180.0);
        assert_eq!(bbox.lon_span(), 360.0);
    }
}
