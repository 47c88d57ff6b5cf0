//! Heatmap rendering for normalized plume intensity grids.
//!
//! A grid becomes an image in three steps:
//! - quantize each cell's [0,1] intensity to one of 256 levels,
//! - look the level up in a fixed perceptual palette whose alpha tracks
//!   intensity (level 0 is fully transparent),
//! - encode the level raster as an indexed PNG and wrap it in a base64
//!   data URI alongside the bounding box it was rendered against.
//!
//! Rows are written south-up: increasing grid row index means increasing
//! latitude, so the last grid row becomes the top PNG scanline.

pub mod colormap;
pub mod heatmap;
pub mod png;

pub use colormap::HeatPalette;
pub use heatmap::{render, HeatmapImage};
pub use png::RenderError;
