use plume_common::bbox::InvalidBounds;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error(transparent)]
    InvalidBounds(#[from] InvalidBounds),

    #[error("Grid shape must be non-empty, got {rows}x{cols}")]
    EmptyShape { rows: usize, cols: usize },
}
