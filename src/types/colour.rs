//! Spot colour type and parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{Result, TrapError};

/// An exact 8-bit RGB spot colour.
///
/// Alpha is deliberately absent: a plate is keyed on its RGB triple only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Colour {
    /// Create a new colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White (the usual paper colour).
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Parse `#RGB` or `#RRGGBB`; the `#` is optional.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || TrapError::Config {
            message: format!("Invalid hex colour: {}", s),
            help: Some("Use #RGB or #RRGGBB format".to_string()),
        };

        let nibbles: Vec<u8> = s
            .strip_prefix('#')
            .unwrap_or(s)
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(invalid)?;

        match nibbles[..] {
            [r, g, b] => Ok(Self::rgb(r * 0x11, g * 0x11, b * 0x11)),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::rgb(r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0)),
            _ => Err(invalid()),
        }
    }

    /// Weighted grayscale value in `[0, 255]`: `0.299 R + 0.587 G + 0.114 B`.
    ///
    /// No gamma correction is applied.
    pub fn lightness(self) -> f64 {
        0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b)
    }

    /// RGBA bytes with full opacity.
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Check whether an RGBA pixel carries exactly this colour.
    ///
    /// Transparent pixels never match.
    pub fn matches(self, pixel: [u8; 4]) -> bool {
        pixel[3] > 0 && pixel[0] == self.r && pixel[1] == self.g && pixel[2] == self.b
    }

    /// Hex digits without the leading `#`, used for file names.
    pub fn hex_digits(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Colour {
    type Err = TrapError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.hex_digits())
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
