//! Grid-to-image assembly.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use plume_common::{BoundingBox, Grid};
use tracing::debug;

use crate::colormap::HeatPalette;
use crate::png::{encode_indexed, RenderError};

/// An encoded heatmap overlay plus the geographic bounds it was rendered
/// against, ready for a map client to place without a separate bounds
/// lookup. Produced once per request and never cached server-side.
#[derive(Debug, Clone)]
pub struct HeatmapImage {
    /// `data:image/png;base64,...` payload.
    pub data_uri: String,
    pub bounds: BoundingBox,
    pub width: usize,
    pub height: usize,
}

/// Render a normalized grid as a translucent heatmap PNG.
///
/// Cell values are clipped to [0,1] and quantized to 256 levels; the
/// palette supplies color and intensity-proportional alpha per level.
/// Scanlines are emitted north-first so the image sits upright on a map:
/// grid row indices increase northward while PNG rows run top to bottom.
///
/// Every call builds and releases its own buffers; no drawing state is
/// shared between renders.
pub fn render(
    grid: &Grid,
    bounds: BoundingBox,
    palette: &HeatPalette,
) -> Result<HeatmapImage, RenderError> {
    let levels = scanline_levels(grid);
    let png = encode_indexed(grid.cols(), grid.rows(), palette.entries(), &levels)?;
    debug!(
        width = grid.cols(),
        height = grid.rows(),
        bytes = png.len(),
        "Encoded heatmap PNG"
    );

    Ok(HeatmapImage {
        data_uri: format!("data:image/png;base64,{}", STANDARD.encode(&png)),
        bounds,
        width: grid.cols(),
        height: grid.rows(),
    })
}

/// Quantize grid intensities to palette levels in scanline order.
///
/// The vertical flip happens here: output row 0 (the top scanline) is the
/// grid's last (northernmost) row.
fn scanline_levels(grid: &Grid) -> Vec<u8> {
    let mut levels = Vec::with_capacity(grid.rows() * grid.cols());
    for image_row in 0..grid.rows() {
        let grid_row = grid.rows() - 1 - image_row;
        for col in 0..grid.cols() {
            let value = grid.get(grid_row, col).clamp(0.0, 1.0);
            levels.push((value * 255.0).round() as u8);
        }
    }
    levels
}
