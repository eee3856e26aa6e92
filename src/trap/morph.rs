//! 4-connected morphological growth and shrink.
//!
//! Both operations run one-pixel passes. Every pass reads a frozen snapshot
//! of the previous pass and writes a fresh buffer, so a pixel filled during
//! a pass never feeds another pixel in the same pass.

use crate::error::Result;
use crate::types::{Raster, CLEAR};

use super::mask::Mask;

/// Neighbour offsets in tie-break order: up, right, down, left.
const NEIGHBOURS: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Grow opaque regions by `radius` pixels.
///
/// A transparent pixel is filled during a pass when the mask (if any)
/// permits it and one of its neighbours is opaque in the snapshot; the first
/// opaque neighbour in up, right, down, left order donates its RGBA.
pub fn dilate(raster: &Raster, radius: u32, mask: Option<&Mask>) -> Result<Raster> {
    if let Some(mask) = mask {
        raster.ensure_same_size(mask.as_raster(), "mask")?;
    }
    if radius == 0 {
        return Ok(raster.clone());
    }

    let mut current = raster.clone();
    for pass in 0..radius {
        let (next, grown) = dilate_pass(&current, mask);
        current = next;
        if grown == 0 {
            // Every later pass would see the same snapshot
            tracing::trace!(pass, radius, "dilation converged early");
            break;
        }
    }
    Ok(current)
}

fn dilate_pass(snapshot: &Raster, mask: Option<&Mask>) -> (Raster, usize) {
    let mut out = snapshot.clone();
    let mut grown = 0;

    for y in 0..snapshot.height() {
        for x in 0..snapshot.width() {
            if snapshot.is_opaque(x, y) {
                continue;
            }
            if mask.is_some_and(|m| !m.permits(x, y)) {
                continue;
            }
            if let Some(donor) = first_opaque_neighbour(snapshot, x, y) {
                out.set_pixel(x, y, donor);
                grown += 1;
            }
        }
    }

    (out, grown)
}

fn first_opaque_neighbour(snapshot: &Raster, x: u32, y: u32) -> Option<[u8; 4]> {
    NEIGHBOURS.iter().find_map(|&(dx, dy)| {
        let nx = i64::from(x) + dx;
        let ny = i64::from(y) + dy;
        snapshot
            .is_opaque_at(nx, ny)
            .then(|| snapshot.pixel(nx as u32, ny as u32))
    })
}

/// Shrink opaque regions by `radius` pixels.
///
/// An opaque pixel survives a pass only when all four neighbours are in
/// bounds and opaque in the snapshot, so image edges erode too.
pub fn erode(raster: &Raster, radius: u32) -> Raster {
    let mut current = raster.clone();
    for _ in 0..radius {
        let (next, removed) = erode_pass(&current);
        current = next;
        if removed == 0 {
            break;
        }
    }
    current
}

fn erode_pass(snapshot: &Raster) -> (Raster, usize) {
    let mut out = snapshot.clone();
    let mut removed = 0;

    for y in 0..snapshot.height() {
        for x in 0..snapshot.width() {
            if !snapshot.is_opaque(x, y) {
                continue;
            }
            let enclosed = NEIGHBOURS
                .iter()
                .all(|&(dx, dy)| snapshot.is_opaque_at(i64::from(x) + dx, i64::from(y) + dy));
            if !enclosed {
                out.set_pixel(x, y, CLEAR);
                removed += 1;
            }
        }
    }

    (out, removed)
}
