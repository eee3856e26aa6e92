//! Trap size parsing and per-layer interpolation.
//!
//! Lengths are normalised to inches. Three notations are accepted, tried in
//! this order:
//! - points with a `pt` suffix (`4pt`, `0.5PT`), 72 points to the inch
//! - a fraction of an inch (`1/32`)
//! - decimal inches (`0.03125`)

use crate::error::{Result, TrapError};

/// Points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Traps above this size (in inches) are legal but unusual.
pub const LARGE_TRAP_INCHES: f64 = 0.25;

/// Parse a trap length into inches.
pub fn parse_length(input: &str) -> Result<f64> {
    let s = input.trim();

    if let Some(points) = strip_suffix_ignore_case(s, "pt") {
        let value = parse_number(points, input)?;
        if value < 0.0 {
            return Err(TrapError::NegativeValue {
                input: input.to_string(),
            });
        }
        return Ok(value / POINTS_PER_INCH);
    }

    if let Some((num, den)) = s.split_once('/') {
        let num = parse_number(num, input)?;
        let den = parse_number(den, input)?;
        if den == 0.0 {
            return Err(TrapError::DivisionByZero {
                input: input.to_string(),
            });
        }
        return Ok(num / den);
    }

    parse_number(s, input)
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let split = s.len().checked_sub(suffix.len())?;
    let tail = s.get(split..)?;
    if tail.eq_ignore_ascii_case(suffix) {
        Some(&s[..split])
    } else {
        None
    }
}

fn parse_number(text: &str, input: &str) -> Result<f64> {
    let text = text.trim();
    let invalid = |message: &str| TrapError::InvalidFormat {
        input: input.to_string(),
        message: message.to_string(),
    };

    if text.is_empty() {
        return Err(invalid("expected a number"));
    }

    let value: f64 = text
        .parse()
        .map_err(|_| invalid(&format!("'{}' is not a number", text)))?;

    // `f64::from_str` accepts "inf" and "NaN"
    if !value.is_finite() {
        return Err(invalid("length must be finite"));
    }

    Ok(value)
}

/// A validated trap range in inches, `min <= max`, both non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrapRange {
    pub min: f64,
    pub max: f64,
}

impl TrapRange {
    /// Whether the maximum trap is larger than usual for print work.
    pub fn is_unusually_large(&self) -> bool {
        self.max > LARGE_TRAP_INCHES
    }

    /// Trap size in inches for the layer at `index` of `total`.
    pub fn layer_trap(&self, index: usize, total: usize) -> f64 {
        layer_trap(index, total, self.min, self.max)
    }
}

/// Parse and validate a minimum/maximum trap pair.
pub fn validate_range(min_input: &str, max_input: &str) -> Result<TrapRange> {
    let min = parse_length(min_input)?;
    let max = parse_length(max_input)?;

    if min < 0.0 {
        return Err(TrapError::NegativeValue {
            input: min_input.to_string(),
        });
    }
    if max < 0.0 {
        return Err(TrapError::NegativeValue {
            input: max_input.to_string(),
        });
    }
    if min > max {
        return Err(TrapError::RangeOrder { min, max });
    }

    let range = TrapRange { min, max };
    if range.is_unusually_large() {
        tracing::warn!(max_inches = max, "maximum trap exceeds {LARGE_TRAP_INCHES}in");
    }

    Ok(range)
}

/// Check that a resolution is usable.
pub fn validate_dpi(dpi: f64) -> Result<f64> {
    if dpi.is_finite() && dpi > 0.0 {
        Ok(dpi)
    } else {
        Err(TrapError::InvalidResolution { dpi })
    }
}

/// Convert a length in inches to whole pixels at `dpi`.
///
/// Rounds half away from zero.
pub fn to_pixels(inches: f64, dpi: f64) -> u32 {
    let px = (inches * dpi).round();
    if px <= 0.0 {
        0
    } else {
        // Saturates on absurd inputs
        px as u32
    }
}

/// Convert whole pixels back to inches at `dpi`.
pub fn to_inches(pixels: u32, dpi: f64) -> f64 {
    f64::from(pixels) / dpi
}

/// Interpolated trap size for one layer.
///
/// The lightest layer (index 0) gets `max`, the darkest gets `min`. A
/// document with a single layer traps at `min`.
pub fn layer_trap(index: usize, total: usize, min: f64, max: f64) -> f64 {
    if total <= 1 {
        return min;
    }
    let t = index as f64 / (total - 1) as f64;
    max - t * (max - min)
}
