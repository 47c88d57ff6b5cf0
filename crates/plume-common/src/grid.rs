//! Dense grid storage for accumulated plume intensities.

use serde::{Deserialize, Serialize};

/// Dimensions of a rasterization grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl GridShape {
    pub const DEFAULT_SIZE: usize = 128;

    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Square shape, as used by the prediction model input.
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::square(Self::DEFAULT_SIZE)
    }
}

/// A dense row-major grid of f64 intensities.
///
/// Row index increases with latitude (south to north); column index
/// increases with longitude (west to east). Grids are created fresh per
/// request and discarded once a response is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    shape: GridShape,
    data: Vec<f64>,
}

impl Grid {
    /// Create a zero-filled grid of the given shape.
    pub fn zeros(shape: GridShape) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.len()],
        }
    }

    /// Build a grid from row-major data. Returns `None` on a length
    /// mismatch.
    pub fn from_data(shape: GridShape, data: Vec<f64>) -> Option<Self> {
        if data.len() != shape.len() {
            return None;
        }
        Some(Self { shape, data })
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// Row-major cell values.
    pub fn values(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.shape.cols + col]
    }

    /// Add `value` to cell `(row, col)`. Accumulation, not overwrite:
    /// multiple contributions to one cell sum.
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.shape.cols + col] += value;
    }

    /// Largest cell value, 0.0 for an all-zero grid.
    pub fn max_value(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Sum of all cell values.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Min-max normalize into [0,1], anchored at 0.
    ///
    /// If every cell is 0 the grid is left unchanged; an all-zero grid is
    /// the valid "no data" outcome, not an error.
    pub fn normalize(&mut self) {
        let max = self.max_value();
        if max > 0.0 {
            for value in &mut self.data {
                *value /= max;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let grid = Grid::zeros(GridShape::new(3, 4));
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.values().len(), 12);
        assert!(grid.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_accumulate() {
        let mut grid = Grid::zeros(GridShape::new(2, 2));
        grid.add(0, 1, 2.5);
        grid.add(0, 1, 1.5);
        assert_eq!(grid.get(0, 1), 4.0);
        assert_eq!(grid.total(), 4.0);
    }

    #[test]
    fn test_normalize() {
        let mut grid = Grid::from_data(GridShape::new(2, 2), vec![5.0, 0.0, 0.0, 3.0]).unwrap();
        grid.normalize();
        assert_eq!(grid.values(), &[1.0, 0.0, 0.0, 0.6]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut grid = Grid::from_data(GridShape::new(1, 3), vec![1.0, 0.25, 0.0]).unwrap();
        let before = grid.clone();
        grid.normalize();
        assert_eq!(grid, before);
    }

    #[test]
    fn test_normalize_all_zero_is_noop() {
        let mut grid = Grid::zeros(GridShape::new(4, 4));
        grid.normalize();
        assert!(grid.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_from_data_length_mismatch() {
        assert!(Grid::from_data(GridShape::new(2, 2), vec![1.0; 3]).is_none());
    }
}
