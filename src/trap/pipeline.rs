//! Separation and trapping pipeline.
//!
//! A run moves strictly forward through its stages and stops at the first
//! failure:
//!
//! ```text
//! Idle -> Analyzing -> Separating -> Trapping -> Complete
//!   \________\______________\____________\_____> Failed
//! ```
//!
//! Every plate is extracted before any trapping starts, and plates are
//! trapped lightest first. Because a plate's mask only reads darker plates,
//! which are trapped later, every mask is built from untrapped extractions.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{Result, TrapError};
use crate::types::Raster;

use super::analyze::{significant_colors, AnalyzerLimits, ColorEntry};
use super::mask::darker_layers_mask;
use super::morph::dilate;
use super::separate::extract;
use super::size::{to_inches, to_pixels, TrapRange};

/// Rasters larger than this in either dimension are accepted but slow.
pub const LARGE_DIMENSION: u32 = 10_000;

/// One separated colour plate.
#[derive(Debug, Clone)]
pub struct LayerPlan {
    pub color: ColorEntry,
    /// Position in lightness order; 0 is the lightest.
    pub index: usize,
    /// The extracted plate, replaced by the trapped plate once trapped.
    pub raster: Raster,
    pub trap_radius_pixels: u32,
}

/// Stage of a trapping run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    Idle,
    Analyzing,
    Separating,
    Trapping,
    Complete,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Analyzing => "analyzing",
            Stage::Separating => "separating",
            Stage::Trapping => "trapping",
            Stage::Complete => "complete",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Receives progress updates. Purely informational.
pub trait Progress {
    /// `percent` is in `0..=100`.
    fn report(&mut self, percent: u8, message: &str);
}

impl<F: FnMut(u8, &str)> Progress for F {
    fn report(&mut self, percent: u8, message: &str) {
        self(percent, message)
    }
}

/// Cooperative cancellation flag, checked between layers.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The run stops at the next layer boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Everything a run needs besides the source raster.
#[derive(Debug, Clone)]
pub struct TrapSettings {
    pub range: TrapRange,
    /// Output resolution in dots per inch.
    pub dpi: f64,
    pub limits: AnalyzerLimits,
}

/// The ordered, trapped plates of a finished run, lightest first.
#[derive(Debug, Clone)]
pub struct TrapOutput {
    pub layers: Vec<LayerPlan>,
    pub dpi: f64,
}

impl TrapOutput {
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Trap size of a layer in inches after rounding to whole pixels.
    pub fn trap_inches(&self, layer: &LayerPlan) -> f64 {
        to_inches(layer.trap_radius_pixels, self.dpi)
    }
}

/// Runs the separation pipeline.
///
/// A run borrows the trapper mutably, so one trapper cannot run twice at
/// once. The stage of the last run stays readable afterwards.
#[derive(Debug)]
pub struct Trapper {
    settings: TrapSettings,
    stage: Stage,
    cancel: Option<CancelToken>,
}

impl Trapper {
    pub fn new(settings: TrapSettings) -> Self {
        Self {
            settings,
            stage: Stage::Idle,
            cancel: None,
        }
    }

    /// Stop runs at the next layer boundary once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Separate `source` into trapped plates.
    pub fn run(&mut self, source: &Raster, progress: Option<&mut dyn Progress>) -> Result<TrapOutput> {
        let mut sink = NullProgress;
        let progress = progress.unwrap_or(&mut sink);

        let result = self.run_stages(source, progress);
        self.stage = match result {
            Ok(_) => Stage::Complete,
            Err(ref e) => {
                tracing::debug!(stage = %self.stage, error = %e, "trapping failed");
                Stage::Failed
            }
        };
        result
    }

    fn run_stages(&mut self, source: &Raster, progress: &mut dyn Progress) -> Result<TrapOutput> {
        let (width, height) = source.size();
        if width > LARGE_DIMENSION || height > LARGE_DIMENSION {
            tracing::warn!(width, height, "raster is unusually large, trapping will be slow");
        }

        self.stage = Stage::Analyzing;
        progress.report(0, "Analyzing colours");
        let colors = significant_colors(source, &self.settings.limits)?;

        self.stage = Stage::Separating;
        let mut plans = self.separate(source, &colors, progress)?;

        self.stage = Stage::Trapping;
        self.trap(&mut plans, progress)?;

        progress.report(100, "Trapping complete");
        Ok(TrapOutput {
            layers: plans,
            dpi: self.settings.dpi,
        })
    }

    fn separate(
        &self,
        source: &Raster,
        colors: &[ColorEntry],
        progress: &mut dyn Progress,
    ) -> Result<Vec<LayerPlan>> {
        let total = colors.len();
        let mut plans = Vec::with_capacity(total);

        for (index, color) in colors.iter().enumerate() {
            self.check_cancelled()?;

            let inches = self.settings.range.layer_trap(index, total);
            let trap_radius_pixels = to_pixels(inches, self.settings.dpi);
            tracing::debug!(
                colour = %color.colour,
                index,
                trap_radius_pixels,
                "separated plate"
            );

            plans.push(LayerPlan {
                color: *color,
                index,
                raster: extract(source, color.colour),
                trap_radius_pixels,
            });

            progress.report(
                percent(index + 1, total, 0),
                &format!("Separated {} ({} of {})", color.colour, index + 1, total),
            );
        }

        Ok(plans)
    }

    fn trap(&self, plans: &mut [LayerPlan], progress: &mut dyn Progress) -> Result<()> {
        let total = plans.len();

        for i in 0..total {
            self.check_cancelled()?;

            let radius = plans[i].trap_radius_pixels;
            if radius > 0 {
                // Darker plates (index > i) have not been trapped yet
                let mask = darker_layers_mask(plans, plans[i].index)?;
                let trapped = dilate(&plans[i].raster, radius, Some(&mask))?;
                tracing::debug!(
                    colour = %plans[i].color.colour,
                    radius,
                    added = trapped.opaque_count() - plans[i].raster.opaque_count(),
                    "trapped plate"
                );
                plans[i].raster = trapped;
            }

            progress.report(
                percent(i + 1, total, 50),
                &format!("Trapped {} ({} of {})", plans[i].color.colour, i + 1, total),
            );
        }

        Ok(())
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(TrapError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Map `done` of `total` onto the half of the progress bar starting at `base`.
fn percent(done: usize, total: usize, base: u8) -> u8 {
    let half = if total == 0 { 50 } else { done * 50 / total };
    base + half as u8
}

struct NullProgress;

impl Progress for NullProgress {
    fn report(&mut self, _percent: u8, _message: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trap::mask::darker_footprints_mask;
    use crate::trap::size::validate_range;
    use crate::types::{Colour, CLEAR};
    use pretty_assertions::assert_eq;

    const RED: Colour = Colour::rgb(255, 0, 0);

    fn settings(min: &str, max: &str, dpi: f64) -> TrapSettings {
        TrapSettings {
            range: validate_range(min, max).unwrap(),
            dpi,
            limits: AnalyzerLimits::default(),
        }
    }

    /// 40x40: red on the left half, black on the right half.
    fn red_and_black() -> Raster {
        let mut r = Raster::new(40, 40);
        for y in 0..40 {
            for x in 0..40 {
                let c = if x < 20 { RED } else { Colour::BLACK };
                r.set_pixel(x, y, c.to_rgba());
            }
        }
        r
    }

    /// 40x40 with a black square inside a red field inside a yellow border.
    fn three_colours() -> Raster {
        let mut r = Raster::new(40, 40);
        for y in 0..40 {
            for x in 0..40 {
                let c = if (15..25).contains(&x) && (15..25).contains(&y) {
                    Colour::BLACK
                } else if (5..35).contains(&x) && (5..35).contains(&y) {
                    RED
                } else {
                    Colour::rgb(255, 255, 0)
                };
                r.set_pixel(x, y, c.to_rgba());
            }
        }
        r
    }

    // -- end to end --

    #[test]
    fn test_two_colours_end_to_end() {
        let source = red_and_black();
        let mut trapper = Trapper::new(settings("0", "4pt", 72.0));
        let output = trapper.run(&source, None).unwrap();

        assert_eq!(trapper.stage(), Stage::Complete);
        assert_eq!(output.len(), 2);

        let red = &output.layers[0];
        let black = &output.layers[1];
        assert_eq!(red.color.colour, RED);
        assert_eq!(black.color.colour, Colour::BLACK);
        assert_eq!(red.trap_radius_pixels, 4);
        assert_eq!(black.trap_radius_pixels, 0);

        // Red grows four columns into black, black is untouched
        for y in 0..40 {
            for x in 0..40 {
                let expect_red = x < 24;
                assert_eq!(red.raster.is_opaque(x, y), expect_red, "red at ({x}, {y})");
                if red.raster.is_opaque(x, y) {
                    assert_eq!(red.raster.pixel(x, y), RED.to_rgba());
                }
                assert_eq!(black.raster.is_opaque(x, y), x >= 20, "black at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_added_pixels_stay_in_darker_footprint() {
        let source = three_colours();
        let mut trapper = Trapper::new(settings("0", "4pt", 72.0));
        let output = trapper.run(&source, None).unwrap();
        assert_eq!(output.len(), 3);

        let radii: Vec<u32> = output.layers.iter().map(|l| l.trap_radius_pixels).collect();
        assert_eq!(radii, vec![4, 2, 0]);

        for (i, layer) in output.layers.iter().enumerate() {
            let original = extract(&source, layer.color.colour);
            for y in 0..40 {
                for x in 0..40 {
                    if layer.raster.is_opaque(x, y) && !original.is_opaque(x, y) {
                        let darker_covers = output.layers[i + 1..]
                            .iter()
                            .any(|d| extract(&source, d.color.colour).is_opaque(x, y));
                        assert!(darker_covers, "layer {i} grew outside darker plates at ({x}, {y})");
                    }
                }
            }
        }

        // Yellow reaches four pixels into red
        let yellow = &output.layers[0].raster;
        assert!(yellow.is_opaque(8, 20));
        assert!(!yellow.is_opaque(9, 20));
        // Red reaches two pixels into black
        let red = &output.layers[1].raster;
        assert!(red.is_opaque(16, 20));
        assert!(!red.is_opaque(17, 20));
    }

    #[test]
    fn test_masks_use_untrapped_darker_plates() {
        let source = three_colours();
        let mut trapper = Trapper::new(settings("0", "4pt", 72.0));
        let output = trapper.run(&source, None).unwrap();

        let yellow = extract(&source, Colour::rgb(255, 255, 0));
        let red = extract(&source, RED);
        let black = extract(&source, Colour::BLACK);

        let yellow_mask = darker_footprints_mask(40, 40, [&red, &black]).unwrap();
        let red_mask = darker_footprints_mask(40, 40, [&black]).unwrap();

        assert_eq!(output.layers[0].raster, dilate(&yellow, 4, Some(&yellow_mask)).unwrap());
        assert_eq!(output.layers[1].raster, dilate(&red, 2, Some(&red_mask)).unwrap());
        assert_eq!(output.layers[2].raster, black);
    }

    #[test]
    fn test_single_colour_traps_at_minimum() {
        let mut source = Raster::new(20, 20);
        for x in 0..10 {
            for y in 0..20 {
                source.set_pixel(x, y, RED.to_rgba());
            }
        }

        let mut trapper = Trapper::new(settings("0", "4pt", 72.0));
        let output = trapper.run(&source, None).unwrap();
        assert_eq!(output.len(), 1);
        assert_eq!(output.layers[0].trap_radius_pixels, 0);
        assert_eq!(output.layers[0].raster, extract(&source, RED));
    }

    #[test]
    fn test_transparent_background_stays_clear() {
        let mut source = Raster::new(30, 30);
        for y in 10..20 {
            for x in 0..30 {
                let c = if x < 15 { RED } else { Colour::BLACK };
                source.set_pixel(x, y, c.to_rgba());
            }
        }

        let mut trapper = Trapper::new(settings("0", "2pt", 72.0));
        let output = trapper.run(&source, None).unwrap();
        let red = &output.layers[0].raster;
        assert_eq!(red.pixel(5, 5), CLEAR);
        assert_eq!(red.pixel(5, 9), CLEAR);
        assert!(red.is_opaque(16, 10));
    }

    // -- failures --

    #[test]
    fn test_no_colours_fails() {
        let mut trapper = Trapper::new(settings("0", "4pt", 72.0));
        let err = trapper.run(&Raster::new(10, 10), None).unwrap_err();
        assert!(matches!(err, TrapError::NoSignificantColors));
        assert_eq!(trapper.stage(), Stage::Failed);
    }

    #[test]
    fn test_cancel_before_run() {
        let token = CancelToken::new();
        token.cancel();

        let mut trapper = Trapper::new(settings("0", "4pt", 72.0)).with_cancel(token);
        let err = trapper.run(&red_and_black(), None).unwrap_err();
        assert!(matches!(err, TrapError::Cancelled));
        assert_eq!(trapper.stage(), Stage::Failed);
    }

    #[test]
    fn test_cancel_from_progress() {
        let token = CancelToken::new();
        let handle = token.clone();
        let mut seen = Vec::new();
        let mut on_progress = |percent: u8, _: &str| {
            seen.push(percent);
            if percent >= 25 {
                handle.cancel();
            }
        };

        let mut trapper = Trapper::new(settings("0", "4pt", 72.0)).with_cancel(token);
        let err = trapper.run(&red_and_black(), Some(&mut on_progress)).unwrap_err();
        assert!(matches!(err, TrapError::Cancelled));
        // Stopped after the first separation
        assert_eq!(seen, vec![0, 25]);
    }

    #[test]
    fn test_cancel_while_trapping() {
        let token = CancelToken::new();
        let handle = token.clone();
        let mut seen = Vec::new();
        let mut on_progress = |percent: u8, _: &str| {
            seen.push(percent);
            if percent > 50 {
                handle.cancel();
            }
        };

        let mut trapper = Trapper::new(settings("0", "4pt", 72.0)).with_cancel(token);
        let result = trapper.run(&three_colours(), Some(&mut on_progress));
        assert!(matches!(result, Err(TrapError::Cancelled)));
        assert_eq!(trapper.stage(), Stage::Failed);
        // Three separations, then the first trapped layer; nothing after it
        assert_eq!(seen, vec![0, 16, 33, 50, 66]);
    }

    // -- progress --

    #[test]
    fn test_progress_reports() {
        let mut reports: Vec<(u8, String)> = Vec::new();
        let mut on_progress = |percent: u8, message: &str| reports.push((percent, message.to_string()));

        let mut trapper = Trapper::new(settings("0", "4pt", 72.0));
        trapper.run(&red_and_black(), Some(&mut on_progress)).unwrap();

        let percents: Vec<u8> = reports.iter().map(|(p, _)| *p).collect();
        assert_eq!(percents, vec![0, 25, 50, 75, 100, 100]);
        assert_eq!(reports[1].1, "Separated #FF0000 (1 of 2)");
        assert_eq!(reports[3].1, "Trapped #FF0000 (1 of 2)");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4, 0), 12);
        assert_eq!(percent(4, 4, 0), 50);
        assert_eq!(percent(4, 4, 50), 100);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(Stage::default().to_string(), "idle");
        assert_eq!(Stage::Trapping.to_string(), "trapping");
    }
}
