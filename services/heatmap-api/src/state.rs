//! Application state and shared resources.

use std::path::PathBuf;

use anyhow::Result;
use inference::InferenceEngine;
use plume_common::GridShape;
use renderer::HeatPalette;

use crate::catalog::CatalogClient;

/// Shared application state.
///
/// The inference engine is the only lazily-mutating member; everything
/// else is immutable after startup.
pub struct AppState {
    pub catalog: CatalogClient,
    pub engine: InferenceEngine,
    pub palette: HeatPalette,
    pub shape: GridShape,
}

impl AppState {
    pub fn new(
        catalog_url: &str,
        model_path: Option<PathBuf>,
        grid_size: usize,
    ) -> Result<Self> {
        Ok(Self {
            catalog: CatalogClient::new(catalog_url)?,
            engine: InferenceEngine::new(model_path),
            palette: HeatPalette::plasma(),
            shape: GridShape::square(grid_size),
        })
    }
}
