//! PNG input and output for rasters.
//!
//! The pixel source reads any format the `image` crate decodes and converts
//! it to RGBA8; the pixel sink always writes PNG.

use std::path::Path;

use image::RgbaImage;

use crate::error::{Result, TrapError};
use crate::types::Raster;

/// Read an image file as an RGBA raster.
pub fn load_raster(path: &Path) -> Result<Raster> {
    let img = image::open(path)
        .map_err(|e| TrapError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to load image: {}", e),
        })?
        .to_rgba8();

    // Decoders may hand back empty images
    Raster::try_from(img)
}

/// Write a raster to a PNG file.
pub fn write_raster(raster: &Raster, path: &Path) -> Result<()> {
    let img: RgbaImage = raster.clone().into();

    img.save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| TrapError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })
}
