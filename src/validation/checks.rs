//! Individual pre-flight checks.
//!
//! Each check yields only its own advisories so they can be run and tested
//! on their own.

use crate::trap::{to_pixels, TrapRange, LARGE_DIMENSION, LARGE_TRAP_INCHES};

use super::warning::Diagnostic;

/// Warn when the maximum trap is unusually large.
pub fn check_trap_size(range: &TrapRange) -> Option<Diagnostic> {
    range.is_unusually_large().then(|| {
        Diagnostic::warning(
            "inktrap::check::large-trap",
            format!(
                "maximum trap of {:.4}in is larger than {}in",
                range.max, LARGE_TRAP_INCHES
            ),
        )
        .with_help("Typical traps are between 1/72in (1pt) and 1/32in")
    })
}

/// Warn when the raster is large enough to make trapping slow.
pub fn check_dimensions(width: u32, height: u32) -> Option<Diagnostic> {
    (width > LARGE_DIMENSION || height > LARGE_DIMENSION).then(|| {
        Diagnostic::warning(
            "inktrap::check::large-raster",
            format!(
                "{width}x{height} raster exceeds {LARGE_DIMENSION} pixels on a side; trapping will be slow"
            ),
        )
    })
}

/// Flag trap sizes that round to zero pixels at `dpi`.
///
/// A lost maximum means nothing is trapped at all (warning); a lost minimum
/// only flattens the darkest plates' traps (note).
pub fn check_resolution(range: &TrapRange, dpi: f64) -> Vec<Diagnostic> {
    let mut found = Vec::new();

    if range.max > 0.0 && to_pixels(range.max, dpi) == 0 {
        found.push(
            Diagnostic::warning(
                "inktrap::check::sub-pixel-trap",
                format!(
                    "maximum trap of {:.4}in is less than half a pixel at {} dpi; nothing will be trapped",
                    range.max, dpi
                ),
            )
            .with_help("Raise the resolution or the maximum trap"),
        );
    } else if range.min > 0.0 && to_pixels(range.min, dpi) == 0 {
        found.push(Diagnostic::note(
            "inktrap::check::sub-pixel-minimum",
            format!(
                "minimum trap of {:.4}in rounds to 0px at {} dpi",
                range.min, dpi
            ),
        ));
    }

    found
}
