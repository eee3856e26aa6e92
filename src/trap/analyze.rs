//! Colour palette extraction.
//!
//! Scans a flattened raster for its distinct spot colours, drops the stray
//! colours left behind by edge anti-aliasing, and orders what remains from
//! lightest to darkest.

use std::collections::HashMap;

use crate::error::{Result, TrapError};
use crate::types::{Colour, Raster};

/// Maximum number of plates a document may separate into.
pub const MAX_COLORS: usize = 10;

/// Colours covering fewer pixels than this are never significant.
pub const MIN_PIXELS: usize = 100;

/// Significance threshold as a fraction of the document area.
pub const MIN_FRACTION: f64 = 0.0001;

/// One distinct colour found in a raster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorEntry {
    pub colour: Colour,
    pub pixel_count: usize,
    pub lightness: f64,
}

impl ColorEntry {
    fn new(colour: Colour) -> Self {
        Self {
            colour,
            pixel_count: 0,
            lightness: colour.lightness(),
        }
    }
}

/// Result of scanning a raster.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Distinct colours in discovery (row-major first occurrence) order.
    pub colors: Vec<ColorEntry>,
    /// Document area in pixels, including transparent ones.
    pub total_pixels: usize,
}

/// Limits applied when reducing a palette to its print colours.
#[derive(Debug, Clone)]
pub struct AnalyzerLimits {
    /// Fail with `TooManyColors` above this many significant colours.
    pub max_colors: usize,
    /// Absolute significance floor in pixels.
    pub min_pixels: usize,
    /// Significance threshold relative to the document area.
    pub min_fraction: f64,
    /// Colours treated as no content (e.g. the paper colour).
    pub ignore: Vec<Colour>,
}

impl Default for AnalyzerLimits {
    fn default() -> Self {
        Self {
            max_colors: MAX_COLORS,
            min_pixels: MIN_PIXELS,
            min_fraction: MIN_FRACTION,
            ignore: Vec::new(),
        }
    }
}

impl AnalyzerLimits {
    /// Pixel count a colour needs to be kept.
    pub fn threshold(&self, total_pixels: usize) -> usize {
        let relative = (total_pixels as f64 * self.min_fraction).round() as usize;
        self.min_pixels.max(relative)
    }
}

/// Build the deduplicated palette of a raster.
///
/// Pixels with alpha 0 are skipped entirely.
pub fn analyze(raster: &Raster) -> Analysis {
    analyze_ignoring(raster, &[])
}

/// Like [`analyze`], also skipping pixels of the given colours.
pub fn analyze_ignoring(raster: &Raster, ignore: &[Colour]) -> Analysis {
    let mut index: HashMap<Colour, usize> = HashMap::new();
    let mut colors: Vec<ColorEntry> = Vec::new();

    for pixel in raster.pixels() {
        if pixel[3] == 0 {
            continue;
        }
        let colour = Colour::rgb(pixel[0], pixel[1], pixel[2]);
        if ignore.contains(&colour) {
            continue;
        }

        let slot = *index.entry(colour).or_insert_with(|| {
            colors.push(ColorEntry::new(colour));
            colors.len() - 1
        });
        colors[slot].pixel_count += 1;
    }

    Analysis {
        colors,
        total_pixels: raster.pixel_count(),
    }
}

/// Drop colours below the default significance threshold.
pub fn filter_significant(colors: &[ColorEntry], total_pixels: usize) -> Vec<ColorEntry> {
    filter_with(colors, AnalyzerLimits::default().threshold(total_pixels))
}

fn filter_with(colors: &[ColorEntry], threshold: usize) -> Vec<ColorEntry> {
    colors
        .iter()
        .filter(|c| c.pixel_count >= threshold)
        .copied()
        .collect()
}

/// Sort lightest first. Equal lightness keeps discovery order.
pub fn order_by_lightness(colors: &[ColorEntry]) -> Vec<ColorEntry> {
    let mut ordered = colors.to_vec();
    // `sort_by` is stable
    ordered.sort_by(|a, b| b.lightness.total_cmp(&a.lightness));
    ordered
}

/// Scan, filter and order a raster's palette, enforcing the limits.
pub fn significant_colors(raster: &Raster, limits: &AnalyzerLimits) -> Result<Vec<ColorEntry>> {
    let analysis = analyze_ignoring(raster, &limits.ignore);
    let threshold = limits.threshold(analysis.total_pixels);
    let significant = filter_with(&analysis.colors, threshold);

    tracing::debug!(
        found = analysis.colors.len(),
        significant = significant.len(),
        threshold,
        "analyzed palette"
    );

    if significant.len() > limits.max_colors {
        return Err(TrapError::TooManyColors {
            found: significant.len(),
            max: limits.max_colors,
        });
    }
    if significant.is_empty() {
        return Err(TrapError::NoSignificantColors);
    }

    Ok(order_by_lightness(&significant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RED: Colour = Colour::rgb(255, 0, 0);
    const BLUE: Colour = Colour::rgb(0, 0, 255);

    fn entry(colour: Colour, pixel_count: usize) -> ColorEntry {
        ColorEntry {
            colour,
            pixel_count,
            lightness: colour.lightness(),
        }
    }

    /// Fill the first `n` pixels (row-major) of a raster with a colour.
    fn fill(raster: &mut Raster, start: usize, n: usize, rgba: [u8; 4]) {
        let w = raster.width() as usize;
        for i in start..start + n {
            raster.set_pixel((i % w) as u32, (i / w) as u32, rgba);
        }
    }

    // -- analyze --

    #[test]
    fn test_analyze_skips_transparent() {
        let mut r = Raster::new(4, 4);
        r.set_pixel(0, 0, [255, 0, 0, 255]);
        r.set_pixel(1, 0, [0, 255, 0, 0]); // transparent green is not a colour

        let analysis = analyze(&r);
        assert_eq!(analysis.total_pixels, 16);
        assert_eq!(analysis.colors.len(), 1);
        assert_eq!(analysis.colors[0].colour, RED);
        assert_eq!(analysis.colors[0].pixel_count, 1);
    }

    #[test]
    fn test_analyze_keys_on_rgb_only() {
        let mut r = Raster::new(2, 1);
        r.set_pixel(0, 0, [255, 0, 0, 255]);
        r.set_pixel(1, 0, [255, 0, 0, 128]);

        let analysis = analyze(&r);
        assert_eq!(analysis.colors.len(), 1);
        assert_eq!(analysis.colors[0].pixel_count, 2);
    }

    #[test]
    fn test_analyze_counts_never_exceed_opaque() {
        let mut r = Raster::new(5, 5);
        r.set_pixel(0, 0, [1, 2, 3, 255]);
        r.set_pixel(4, 4, [1, 2, 3, 10]);
        r.set_pixel(2, 2, [9, 9, 9, 255]);
        r.set_pixel(3, 3, [9, 9, 9, 0]);

        let analysis = analyze(&r);
        let sum: usize = analysis.colors.iter().map(|c| c.pixel_count).sum();
        assert!(sum <= r.opaque_count());
        assert_eq!(sum, 3);
    }

    #[test]
    fn test_analyze_discovery_order() {
        let mut r = Raster::new(3, 2);
        r.set_pixel(2, 0, [0, 0, 255, 255]);
        r.set_pixel(0, 1, [255, 0, 0, 255]);
        r.set_pixel(1, 0, [0, 255, 0, 255]);

        let colours: Vec<Colour> = analyze(&r).colors.iter().map(|c| c.colour).collect();
        assert_eq!(
            colours,
            vec![Colour::rgb(0, 255, 0), BLUE, RED]
        );
    }

    #[test]
    fn test_analyze_ignoring_paper() {
        let mut r = Raster::new(2, 1);
        r.set_pixel(0, 0, [255, 255, 255, 255]);
        r.set_pixel(1, 0, [255, 0, 0, 255]);

        let analysis = analyze_ignoring(&r, &[Colour::WHITE]);
        assert_eq!(analysis.colors.len(), 1);
        assert_eq!(analysis.colors[0].colour, RED);
    }

    // -- filter_significant --

    #[test]
    fn test_filter_significant_floor() {
        let colors = vec![entry(RED, 100), entry(BLUE, 99)];
        let kept = filter_significant(&colors, 1000 * 1000);
        assert_eq!(kept, vec![entry(RED, 100)]);
    }

    #[test]
    fn test_filter_significant_relative_threshold() {
        // 0.01% of 4 million pixels is 400
        let colors = vec![entry(RED, 400), entry(BLUE, 399)];
        let kept = filter_significant(&colors, 2000 * 2000);
        assert_eq!(kept, vec![entry(RED, 400)]);
    }

    #[test]
    fn test_threshold() {
        let limits = AnalyzerLimits::default();
        assert_eq!(limits.threshold(100), 100);
        assert_eq!(limits.threshold(1000 * 1000), 100);
        assert_eq!(limits.threshold(3000 * 3000), 900);
    }

    // -- order_by_lightness --

    #[test]
    fn test_order_lightest_first() {
        let colors = vec![entry(Colour::BLACK, 1), entry(Colour::WHITE, 1), entry(RED, 1)];
        let ordered: Vec<Colour> = order_by_lightness(&colors).iter().map(|c| c.colour).collect();
        assert_eq!(ordered, vec![Colour::WHITE, RED, Colour::BLACK]);
    }

    #[test]
    fn test_order_is_stable() {
        // Same channels permuted are not guaranteed equal lightness, so force it
        let a = ColorEntry {
            colour: Colour::rgb(10, 0, 0),
            pixel_count: 1,
            lightness: 50.0,
        };
        let b = ColorEntry {
            colour: Colour::rgb(0, 10, 0),
            pixel_count: 2,
            lightness: 50.0,
        };
        let c = entry(Colour::WHITE, 3);

        let ordered = order_by_lightness(&[a, b, c]);
        assert_eq!(ordered, vec![c, a, b]);

        let ordered = order_by_lightness(&[b, a, c]);
        assert_eq!(ordered, vec![c, b, a]);
    }

    // -- significant_colors --

    #[test]
    fn test_significant_colors_ordered() {
        let mut r = Raster::new(20, 20);
        fill(&mut r, 0, 150, [0, 0, 0, 255]);
        fill(&mut r, 150, 150, [255, 0, 0, 255]);
        fill(&mut r, 300, 5, [128, 0, 0, 255]); // anti-aliasing noise

        let colors = significant_colors(&r, &AnalyzerLimits::default()).unwrap();
        let ordered: Vec<Colour> = colors.iter().map(|c| c.colour).collect();
        assert_eq!(ordered, vec![RED, Colour::BLACK]);
    }

    #[test]
    fn test_significant_colors_none() {
        let mut r = Raster::new(10, 10);
        fill(&mut r, 0, 50, [255, 0, 0, 255]);

        let err = significant_colors(&r, &AnalyzerLimits::default()).unwrap_err();
        assert!(matches!(err, TrapError::NoSignificantColors));
    }

    #[test]
    fn test_significant_colors_empty_raster() {
        let err = significant_colors(&Raster::new(4, 4), &AnalyzerLimits::default()).unwrap_err();
        assert!(matches!(err, TrapError::NoSignificantColors));
    }

    #[test]
    fn test_significant_colors_too_many() {
        let mut r = Raster::new(40, 40);
        for i in 0..11u8 {
            fill(&mut r, i as usize * 100, 100, [i * 20, 0, 0, 255]);
        }

        let err = significant_colors(&r, &AnalyzerLimits::default()).unwrap_err();
        assert!(matches!(err, TrapError::TooManyColors { found: 11, max: 10 }));
    }

    #[test]
    fn test_significant_colors_ignores_noise_for_limit() {
        let mut r = Raster::new(40, 40);
        for i in 0..10u8 {
            fill(&mut r, i as usize * 100, 100, [i * 20, 0, 0, 255]);
        }
        // Eleventh colour is too small to count
        fill(&mut r, 1000, 20, [0, 200, 0, 255]);

        assert_eq!(significant_colors(&r, &AnalyzerLimits::default()).unwrap().len(), 10);
    }
}
