//! On-disk model artifact: a small learned convolution stencil.

use std::path::Path;

use plume_common::Grid;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A trained 2D convolution stencil applied with zero padding.
///
/// Kernel dimensions must be odd so the stencil is centered on the output
/// cell; zero padding makes the transform shape-preserving for any grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StencilModel {
    pub kernel_rows: usize,
    pub kernel_cols: usize,
    /// Row-major kernel weights, `kernel_rows * kernel_cols` entries.
    pub weights: Vec<f64>,
    #[serde(default)]
    pub bias: f64,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    Invalid(String),
}

impl StencilModel {
    /// Load and validate a model artifact from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path)?;
        let model: StencilModel = serde_json::from_str(&content)?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.kernel_rows % 2 == 0 || self.kernel_cols % 2 == 0 {
            return Err(ModelError::Invalid(format!(
                "kernel dimensions must be odd, got {}x{}",
                self.kernel_rows, self.kernel_cols
            )));
        }
        if self.weights.len() != self.kernel_rows * self.kernel_cols {
            return Err(ModelError::Invalid(format!(
                "expected {} weights for a {}x{} kernel, got {}",
                self.kernel_rows * self.kernel_cols,
                self.kernel_rows,
                self.kernel_cols,
                self.weights.len()
            )));
        }
        if !self.weights.iter().all(|w| w.is_finite()) || !self.bias.is_finite() {
            return Err(ModelError::Invalid(
                "weights and bias must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply the stencil to a grid, producing a new grid of the same
    /// shape. The input is never mutated.
    pub fn apply(&self, input: &Grid) -> Grid {
        let shape = input.shape();
        let half_r = (self.kernel_rows / 2) as isize;
        let half_c = (self.kernel_cols / 2) as isize;

        let mut output = Grid::zeros(shape);
        for row in 0..shape.rows {
            for col in 0..shape.cols {
                let mut sum = self.bias;
                for kr in 0..self.kernel_rows {
                    for kc in 0..self.kernel_cols {
                        let src_r = row as isize + kr as isize - half_r;
                        let src_c = col as isize + kc as isize - half_c;
                        if src_r < 0
                            || src_c < 0
                            || src_r >= shape.rows as isize
                            || src_c >= shape.cols as isize
                        {
                            continue;
                        }
                        let weight = self.weights[kr * self.kernel_cols + kc];
                        sum += weight * input.get(src_r as usize, src_c as usize);
                    }
                }
                output.add(row, col, sum);
            }
        }
        output
    }
}
