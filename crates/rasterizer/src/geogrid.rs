//! Mapping from geographic coordinates to grid cell indices.

use plume_common::{BoundingBox, GridShape};

use crate::RasterError;

/// A bounding box subdivided into a regular grid of cells.
///
/// Cell `(r, c)` covers the half-open geographic rectangle
/// `[min_lat + r*lat_step, min_lat + (r+1)*lat_step) x
/// [min_lon + c*lon_step, min_lon + (c+1)*lon_step)`, so row index
/// increases northward and column index increases eastward.
#[derive(Debug, Clone, Copy)]
pub struct GeoGrid {
    bbox: BoundingBox,
    shape: GridShape,
    lat_step: f64,
    lon_step: f64,
}

impl GeoGrid {
    /// Create a mapper for `bbox` subdivided into `shape` cells.
    ///
    /// Degenerate boxes and empty shapes are rejected here so the step
    /// divisions below can never divide by zero.
    pub fn new(bbox: BoundingBox, shape: GridShape) -> Result<Self, RasterError> {
        bbox.validate()?;
        if shape.is_empty() {
            return Err(RasterError::EmptyShape {
                rows: shape.rows,
                cols: shape.cols,
            });
        }

        Ok(Self {
            bbox,
            shape,
            lat_step: bbox.lat_span() / shape.rows as f64,
            lon_step: bbox.lon_span() / shape.cols as f64,
        })
    }

    pub fn bbox(&self) -> BoundingBox {
        self.bbox
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// Map a coordinate to its `(row, col)` cell, or `None` when the
    /// point lies outside the box.
    ///
    /// Indices are clamped to the last row/column, so a point exactly on
    /// `max_lat`/`max_lon` maps into the edge cell instead of being
    /// rejected by floating-point roundoff.
    pub fn locate(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        if lat < self.bbox.min_lat
            || lat > self.bbox.max_lat
            || lon < self.bbox.min_lon
            || lon > self.bbox.max_lon
        {
            return None;
        }

        let row = ((lat - self.bbox.min_lat) / self.lat_step) as usize;
        let col = ((lon - self.bbox.min_lon) / self.lon_step) as usize;

        Some((row.min(self.shape.rows - 1), col.min(self.shape.cols - 1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global_2x2() -> GeoGrid {
        GeoGrid::new(BoundingBox::global(), GridShape::new(2, 2)).unwrap()
    }

    #[test]
    fn test_locate_quadrants() {
        let grid = global_2x2();
        // Northwest quadrant: southern rows have lower indices.
        assert_eq!(grid.locate(-170.0, 80.0), Some((1, 0)));
        // Southeast quadrant.
        assert_eq!(grid.locate(170.0, -80.0), Some((0, 1)));
    }

    #[test]
    fn test_locate_rejects_outside() {
        let grid = GeoGrid::new(
            BoundingBox::new(30.0, -125.0, 45.0, -110.0).unwrap(),
            GridShape::new(16, 16),
        )
        .unwrap();
        assert_eq!(grid.locate(-109.9, 35.0), None);
        assert_eq!(grid.locate(-120.0, 29.9), None);
        assert_eq!(grid.locate(-130.0, 35.0), None);
        assert_eq!(grid.locate(-120.0, 46.0), None);
    }

    #[test]
    fn test_locate_clamps_max_edges() {
        let grid = global_2x2();
        // Exactly on the north and east edges: clamped into the last
        // row/column, not rejected.
        assert_eq!(grid.locate(0.0, 90.0), Some((1, 1)));
        assert_eq!(grid.locate(180.0, 0.0), Some((1, 1)));
        assert_eq!(grid.locate(180.0, 90.0), Some((1, 1)));
    }

    #[test]
    fn test_locate_min_edges_inclusive() {
        let grid = global_2x2();
        assert_eq!(grid.locate(-180.0, -90.0), Some((0, 0)));
    }

    #[test]
    fn test_rejects_degenerate_box() {
        let bbox = BoundingBox {
            min_lat: 10.0,
            min_lon: 0.0,
            max_lat: 10.0,
            max_lon: 1.0,
        };
        assert!(GeoGrid::new(bbox, GridShape::default()).is_err());
    }

    #[test]
    fn test_rejects_empty_shape() {
        let result = GeoGrid::new(BoundingBox::global(), GridShape::new(0, 128));
        assert!(matches!(result, Err(RasterError::EmptyShape { .. })));
    }
}
