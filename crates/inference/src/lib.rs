//! Optional learned transformation from an observed intensity grid to a
//! predicted one.
//!
//! The engine loads a model artifact lazily, at most once, and falls back
//! to an explicit identity passthrough when no artifact is configured or
//! the load fails. The pipeline stays usable before any model is
//! deployed.

mod engine;
mod model;

pub use engine::{InferenceEngine, InferenceOutput, InferenceSource};
pub use model::{ModelError, StencilModel};
