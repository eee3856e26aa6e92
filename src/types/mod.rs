//! Core domain types for inktrap.
//!
//! - `Colour` - exact RGB spot colours
//! - `Raster` - RGBA pixel buffers

mod colour;
mod raster;

pub use colour::Colour;
pub use raster::{Raster, CLEAR};
