//! Layer output: one PNG per plate plus a JSON manifest.
//!
//! Files are named `NN-RRGGBB.png` where `NN` is the lightness order, so a
//! host that creates layers in file-name order stacks the darkest on top.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, TrapError};
use crate::trap::{darker_footprints_mask, extract, LayerPlan, TrapOutput};
use crate::types::{Colour, Raster};

use super::png::write_raster;

/// Name of the manifest written next to the plates.
pub const MANIFEST_FILENAME: &str = "layers.json";

/// One entry of the layer manifest.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LayerRecord {
    pub index: usize,
    pub colour: Colour,
    pub lightness: f64,
    pub pixels: usize,
    pub trap_inches: f64,
    pub trap_pixels: u32,
    pub file: String,
}

/// The manifest describing a trapping run.
#[derive(Debug, Clone, Serialize)]
pub struct LayerManifest {
    pub app: &'static str,
    pub version: &'static str,
    pub size: (u32, u32),
    pub dpi: f64,
    pub layers: Vec<LayerRecord>,
}

/// File name for a plate.
pub fn layer_file_name(layer: &LayerPlan) -> String {
    format!("{:02}-{}.png", layer.index, layer.color.colour.hex_digits())
}

fn mask_file_name(layer: &LayerPlan) -> String {
    format!("{:02}-{}.mask.png", layer.index, layer.color.colour.hex_digits())
}

/// Write every plate and the manifest into `dir`, lightest first.
pub fn write_layers(output: &TrapOutput, dir: &Path) -> Result<LayerManifest> {
    ensure_dir(dir)?;

    let mut records = Vec::with_capacity(output.len());
    for layer in &output.layers {
        let file = layer_file_name(layer);
        write_raster(&layer.raster, &dir.join(&file))?;

        records.push(LayerRecord {
            index: layer.index,
            colour: layer.color.colour,
            lightness: layer.color.lightness,
            pixels: layer.color.pixel_count,
            trap_inches: output.trap_inches(layer),
            trap_pixels: layer.trap_radius_pixels,
            file,
        });
    }

    let size = output
        .layers
        .first()
        .map(|l| l.raster.size())
        .unwrap_or((0, 0));

    let manifest = LayerManifest {
        app: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        size,
        dpi: output.dpi,
        layers: records,
    };

    let path = dir.join(MANIFEST_FILENAME);
    let json = serde_json::to_string_pretty(&manifest).map_err(|e| TrapError::Io {
        path: path.clone(),
        message: format!("Failed to serialize layer manifest: {}", e),
    })?;
    fs::write(&path, json).map_err(|e| TrapError::Io {
        path: path.clone(),
        message: format!("Failed to write layer manifest: {}", e),
    })?;

    Ok(manifest)
}

/// Write each plate's expansion mask, rebuilt from the untrapped source.
pub fn write_masks(source: &Raster, output: &TrapOutput, dir: &Path) -> Result<usize> {
    ensure_dir(dir)?;

    let (width, height) = source.size();
    let originals: Vec<Raster> = output
        .layers
        .iter()
        .map(|l| extract(source, l.color.colour))
        .collect();

    for (i, layer) in output.layers.iter().enumerate() {
        let mask = darker_footprints_mask(width, height, &originals[i + 1..])?;
        write_raster(mask.as_raster(), &dir.join(mask_file_name(layer)))?;
    }

    Ok(output.len())
}

fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| TrapError::Io {
            path: dir.to_path_buf(),
            message: format!("Failed to create output directory: {}", e),
        })?;
    }
    Ok(())
}
