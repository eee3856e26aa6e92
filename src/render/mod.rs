//! Rendering module for inktrap.
//!
//! Reads source artwork into rasters and writes separated plates, their
//! masks and the layer manifest back out as files.

mod layers;
mod png;

pub use layers::{
    layer_file_name, write_layers, write_masks, LayerManifest, LayerRecord, MANIFEST_FILENAME,
};
pub use png::{load_raster, write_raster};
