//! Buffer module: The raster side of the engine.
//!
//! This module contains:
//! - [`Rgba`]: Straight-alpha color with source-over blending
//! - [`Canvas`]: A pixel grid that draw commands mutate

mod canvas;
mod color;

pub use canvas::Canvas;
pub use color::Rgba;
