//! Single-colour plate extraction.

use crate::types::{Colour, Raster, CLEAR};

/// Extract the pixels of one colour into a same-sized raster.
///
/// Matching pixels keep their colour at full opacity; everything else is
/// transparent black. Matches are exact with no partial coverage.
pub fn extract(source: &Raster, colour: Colour) -> Raster {
    let plate = colour.to_rgba();
    source.map_pixels(|pixel| if colour.matches(pixel) { plate } else { CLEAR })
}
