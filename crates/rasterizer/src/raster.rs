//! Accumulation of plume magnitudes into grid cells.

use plume_common::{BoundingBox, Grid, GridShape, PlumeRecord};
use tracing::debug;

use crate::{GeoGrid, RasterError};

/// Accumulate observation magnitudes into a grid, without normalization.
///
/// Each record with well-formed geometry, a positive magnitude, and
/// coordinates inside `bbox` adds its magnitude to the target cell.
/// Malformed records are skipped individually; out-of-bounds points and
/// non-positive magnitudes contribute nothing. The sum of all cells
/// equals the sum of the accepted magnitudes.
pub fn accumulate(
    records: &[PlumeRecord],
    bbox: BoundingBox,
    shape: GridShape,
) -> Result<Grid, RasterError> {
    let geogrid = GeoGrid::new(bbox, shape)?;
    let mut grid = Grid::zeros(shape);

    let mut malformed = 0usize;
    let mut out_of_bounds = 0usize;
    let mut accepted = 0usize;

    for record in records {
        let Some(obs) = record.observation() else {
            malformed += 1;
            continue;
        };
        if !(obs.magnitude > 0.0) {
            continue;
        }
        match geogrid.locate(obs.longitude, obs.latitude) {
            Some((row, col)) => {
                grid.add(row, col, obs.magnitude);
                accepted += 1;
            }
            None => out_of_bounds += 1,
        }
    }

    debug!(
        total = records.len(),
        accepted, malformed, out_of_bounds, "Rasterized plume records"
    );

    Ok(grid)
}

/// Rasterize observations into a normalized [0,1] intensity grid.
///
/// An all-zero result (no usable observations) is returned unchanged:
/// "no data" is a valid outcome, not an error.
pub fn rasterize(
    records: &[PlumeRecord],
    bbox: BoundingBox,
    shape: GridShape,
) -> Result<Grid, RasterError> {
    let mut grid = accumulate(records, bbox, shape)?;
    grid.normalize();
    Ok(grid)
}
