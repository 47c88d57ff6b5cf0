//! Rasterization of sparse plume observations onto a fixed-resolution
//! geographic grid.
//!
//! Two stages:
//! - [`GeoGrid`] maps geographic coordinates onto integer cell indices.
//! - [`rasterize`] accumulates observation magnitudes into cells and
//!   min-max normalizes the result into [0,1].

mod error;
mod geogrid;
mod raster;

pub use error::RasterError;
pub use geogrid::GeoGrid;
pub use raster::{accumulate, rasterize};
