//! Colour separation and trapping.
//!
//! The stages, leaves first:
//! - `size` - trap length parsing and per-layer interpolation
//! - `analyze` - palette extraction, significance filtering, lightness order
//! - `separate` - single-colour plate extraction
//! - `mask` - expansion masks from darker plates
//! - `morph` - masked dilation and erosion
//! - `pipeline` - the `Trapper` that runs them in order

mod analyze;
mod mask;
mod morph;
mod pipeline;
mod separate;
mod size;

pub use analyze::{
    analyze, analyze_ignoring, filter_significant, order_by_lightness, significant_colors,
    AnalyzerLimits, Analysis, ColorEntry, MAX_COLORS, MIN_FRACTION, MIN_PIXELS,
};
pub use mask::{darker_footprints_mask, darker_layers_mask, Mask, PERMIT};
pub use morph::{dilate, erode};
pub use pipeline::{
    CancelToken, LayerPlan, Progress, Stage, TrapOutput, TrapSettings, Trapper, LARGE_DIMENSION,
};
pub use separate::extract;
pub use size::{
    layer_trap, parse_length, to_inches, to_pixels, validate_dpi, validate_range, TrapRange,
    LARGE_TRAP_INCHES, POINTS_PER_INCH,
};
