//! The prediction pipeline: rasterize -> infer -> render.
//!
//! Stateless per request aside from the lazily-loaded model inside the
//! engine. Each invocation builds its grids and image buffers fresh and
//! drops them with the response.

use std::time::Instant;

use inference::{InferenceEngine, InferenceSource};
use metrics::{counter, histogram};
use plume_common::{BoundingBox, GridShape, HeatmapError, PlumeRecord};
use rasterizer::RasterError;
use renderer::{HeatPalette, HeatmapImage};
use tracing::instrument;

/// A rendered heatmap plus the provenance of the grid behind it.
#[derive(Debug, Clone)]
pub struct Prediction {
    pub image: HeatmapImage,
    pub source: InferenceSource,
}

/// Run the full pipeline over a batch of plume records.
///
/// Invalid bounds fail before any grid is allocated; malformed records
/// are skipped inside the rasterizer; a missing model degrades to the
/// passthrough tagged on the result.
#[instrument(skip_all, fields(records = records.len(), rows = shape.rows, cols = shape.cols))]
pub fn predict(
    records: &[PlumeRecord],
    bounds: BoundingBox,
    shape: GridShape,
    engine: &InferenceEngine,
    palette: &HeatPalette,
) -> Result<Prediction, HeatmapError> {
    let started = Instant::now();

    // Both raster failure modes (degenerate box, empty shape) are bad
    // request geometry.
    let grid = rasterizer::rasterize(records, bounds, shape)
        .map_err(|err: RasterError| HeatmapError::InvalidBounds(err.to_string()))?;

    let output = engine.infer(&grid);

    let image = renderer::render(&output.grid, bounds, palette)
        .map_err(|err| HeatmapError::RenderFailure(err.to_string()))?;

    counter!("predictions_total").increment(1);
    histogram!("prediction_duration_seconds").record(started.elapsed().as_secs_f64());

    Ok(Prediction {
        image,
        source: output.source,
    })
}
