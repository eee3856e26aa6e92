//! Expansion permission masks.
//!
//! A mask is raster-shaped but only its alpha channel is meaningful: an
//! opaque cell permits a lighter plate to grow into it, a transparent cell
//! forbids it. The permitted area for a plate is exactly the footprint of
//! every darker plate, so light inks only ever spread underneath dark ones.

use crate::error::{Result, TrapError};
use crate::types::Raster;

use super::pipeline::LayerPlan;

/// Value written into permitted cells. Only the alpha is significant.
pub const PERMIT: [u8; 4] = [0, 0, 0, 255];

/// A binary expansion mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    cells: Raster,
}

impl Mask {
    /// A mask forbidding expansion everywhere.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            cells: Raster::new(width, height),
        }
    }

    /// Width in cells.
    pub fn width(&self) -> u32 {
        self.cells.width()
    }

    /// Height in cells.
    pub fn height(&self) -> u32 {
        self.cells.height()
    }

    /// Dimensions as (width, height).
    pub fn size(&self) -> (u32, u32) {
        self.cells.size()
    }

    /// Whether expansion into (x, y) is allowed.
    pub fn permits(&self, x: u32, y: u32) -> bool {
        self.cells.is_opaque(x, y)
    }

    /// Allow expansion into (x, y).
    pub fn permit(&mut self, x: u32, y: u32) {
        self.cells.set_pixel(x, y, PERMIT);
    }

    /// Number of permitted cells.
    pub fn permitted_count(&self) -> usize {
        self.cells.opaque_count()
    }

    /// Mark every cell covered by `layer` as permitted.
    fn union_footprint(&mut self, layer: &Raster) {
        // Sizes were checked by the caller.
        for y in 0..layer.height() {
            for x in 0..layer.width() {
                if layer.is_opaque(x, y) {
                    self.permit(x, y);
                }
            }
        }
    }

    /// The mask as a raster, for debugging output.
    pub fn as_raster(&self) -> &Raster {
        &self.cells
    }

    /// Consume the mask, returning its raster.
    pub fn into_raster(self) -> Raster {
        self.cells
    }
}

/// Build the mask of cells that plates darker than `current` will cover.
///
/// Reads each plan's raster as it is now, so callers must pass plans whose
/// darker rasters are still the untrapped extractions. The darkest layer
/// always gets an empty mask.
pub fn darker_layers_mask(plans: &[LayerPlan], current: usize) -> Result<Mask> {
    let first = plans
        .first()
        .ok_or_else(|| TrapError::dimension("cannot build a mask without any layers"))?;
    let (width, height) = first.raster.size();

    darker_footprints_mask(
        width,
        height,
        plans
            .iter()
            .filter(|plan| plan.index > current)
            .map(|plan| &plan.raster),
    )
}

/// Union the footprints of `darker` rasters into a `width` x `height` mask.
pub fn darker_footprints_mask<'a>(
    width: u32,
    height: u32,
    darker: impl IntoIterator<Item = &'a Raster>,
) -> Result<Mask> {
    let mut mask = Mask::empty(width, height);
    for layer in darker {
        mask.cells.ensure_same_size(layer, "darker layer")?;
        mask.union_footprint(layer);
    }
    Ok(mask)
}
