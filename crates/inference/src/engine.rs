//! Lazily-initialized model handle with an explicit identity fallback.

use std::path::PathBuf;

use once_cell::sync::OnceCell;
use plume_common::Grid;
use tracing::{info, warn};

use crate::StencilModel;

/// Where an inference result came from. Exposed so callers (and API
/// responses) can tell a model prediction apart from a passthrough of the
/// observed grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceSource {
    Model,
    Passthrough,
}

impl InferenceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferenceSource::Model => "model",
            InferenceSource::Passthrough => "passthrough",
        }
    }
}

/// A predicted grid together with its provenance.
#[derive(Debug, Clone)]
pub struct InferenceOutput {
    pub grid: Grid,
    pub source: InferenceSource,
}

/// Shape-preserving `Grid -> Grid` transformation behind a once-only
/// loaded model artifact.
///
/// The artifact is loaded on first use. `OnceCell` serializes concurrent
/// first callers, so the load happens at most once per process even under
/// concurrent requests. A load failure is logged once and leaves the
/// model unset; every request then takes the passthrough path.
pub struct InferenceEngine {
    artifact: Option<PathBuf>,
    model: OnceCell<Option<StencilModel>>,
}

impl InferenceEngine {
    /// Engine backed by an optional artifact path.
    pub fn new(artifact: Option<PathBuf>) -> Self {
        Self {
            artifact,
            model: OnceCell::new(),
        }
    }

    /// Engine with no artifact configured; always passes through.
    pub fn disabled() -> Self {
        Self::new(None)
    }

    fn model(&self) -> Option<&StencilModel> {
        self.model
            .get_or_init(|| {
                let path = self.artifact.as_ref()?;
                match StencilModel::from_file(path) {
                    Ok(model) => {
                        info!(path = %path.display(), "Loaded inference model");
                        Some(model)
                    }
                    Err(err) => {
                        warn!(
                            path = %path.display(),
                            error = %err,
                            "Could not load inference model, serving rasterized grids unchanged"
                        );
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Whether a model is configured and loadable. Forces the lazy load.
    pub fn model_available(&self) -> bool {
        self.model().is_some()
    }

    /// Apply the model to `grid`, or return a copy of it when no model is
    /// available. The input grid is never mutated.
    pub fn infer(&self, grid: &Grid) -> InferenceOutput {
        match self.model() {
            Some(model) => InferenceOutput {
                grid: model.apply(grid),
                source: InferenceSource::Model,
            },
            None => InferenceOutput {
                grid: grid.clone(),
                source: InferenceSource::Passthrough,
            },
        }
    }
}
