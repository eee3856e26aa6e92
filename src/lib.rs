//! inktrap - Spot colour separation and trapping
//!
//! A library for splitting flattened spot-colour artwork into one plate per
//! ink and spreading each lighter plate under the darker ones, so that
//! press misregistration never shows a gap of bare paper.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod trap;
pub mod types;
pub mod validation;

pub use config::Config;
pub use error::{Result, TrapError};
pub use render::{load_raster, write_layers, write_masks, write_raster, LayerManifest};
pub use trap::{
    analyze, darker_layers_mask, dilate, erode, extract, filter_significant, layer_trap,
    order_by_lightness, parse_length, significant_colors, to_pixels, validate_range,
    AnalyzerLimits, CancelToken, ColorEntry, LayerPlan, Mask, Progress, Stage, TrapOutput,
    TrapRange, TrapSettings, Trapper,
};
pub use types::{Colour, Raster, CLEAR};
pub use validation::{check_run, Diagnostic, Severity, ValidationResult};
