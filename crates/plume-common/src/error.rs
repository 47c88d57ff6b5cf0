//! Error types for the plume-heatmap services.

use thiserror::Error;

use crate::bbox::InvalidBounds;

/// Result type alias using HeatmapError.
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// Primary error type for prediction requests.
///
/// Per-observation problems are absorbed inside the rasterizer and a
/// missing model falls back to passthrough, so neither appears here. What
/// remains is fatal to a single request and is returned as a tagged
/// failure, never as a silent empty success.
#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Plume catalog unavailable: {0}")]
    CatalogUnavailable(String),

    #[error("Rendering failed: {0}")]
    RenderFailure(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl HeatmapError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            HeatmapError::InvalidBounds(_) | HeatmapError::InvalidParameter { .. } => 400,
            HeatmapError::CatalogUnavailable(_) => 502,
            HeatmapError::RenderFailure(_) | HeatmapError::InternalError(_) => 500,
        }
    }
}

impl From<InvalidBounds> for HeatmapError {
    fn from(err: InvalidBounds) -> Self {
        HeatmapError::InvalidBounds(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BoundingBox;

    #[test]
    fn test_status_codes() {
        assert_eq!(HeatmapError::InvalidBounds("x".into()).http_status_code(), 400);
        assert_eq!(
            HeatmapError::CatalogUnavailable("down".into()).http_status_code(),
            502
        );
        assert_eq!(HeatmapError::RenderFailure("x".into()).http_status_code(), 500);
    }

    #[test]
    fn test_invalid_bounds_conversion() {
        let err = BoundingBox::new(10.0, 0.0, 10.0, 1.0).unwrap_err();
        let err: HeatmapError = err.into();
        assert_eq!(err.http_status_code(), 400);
    }
}
