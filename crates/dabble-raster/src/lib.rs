//! Dabble raster backend.
//!
//! A CPU pixel-buffer implementation of the core drawing surface, with
//! scanline path filling and Bresenham stroking.

mod surface;

pub use surface::PixelSurface;
