//! Choke command implementation.
//!
//! Shrinks a single plate inward, the reverse of a spread. Used for white
//! underbase plates that must sit inside the colours printed over them.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::{Result, TrapError};
use crate::output::{display_path, plural, Printer};
use crate::render::{load_raster, write_raster};
use crate::trap::{erode, parse_length, to_pixels, validate_dpi};

/// Shrink an underbase plate
#[derive(Args, Debug, Default)]
pub struct ChokeArgs {
    /// Plate to shrink
    #[arg(required = true)]
    pub input: PathBuf,

    /// How far to pull the edges in (e.g. 1pt, 1/72)
    #[arg(long, allow_hyphen_values = true)]
    pub amount: String,

    /// Resolution in dots per inch (default: from config)
    #[arg(long)]
    pub dpi: Option<f64>,

    /// Where to write the shrunk plate
    #[arg(long, short, required = true)]
    pub output: PathBuf,

    /// Config file (default: ./inktrap.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Returns the number of pixels removed from the plate.
pub fn run(args: ChokeArgs, printer: &Printer) -> Result<usize> {
    let inches = parse_length(&args.amount)?;
    if inches < 0.0 {
        return Err(TrapError::NegativeValue {
            input: args.amount.clone(),
        });
    }

    let dpi = match args.dpi {
        Some(dpi) => dpi,
        None => Config::discover(args.config.as_deref())?.dpi,
    };
    let radius = to_pixels(inches, validate_dpi(dpi)?);

    let plate = load_raster(&args.input)?;
    let choked = erode(&plate, radius);
    let removed = plate.opaque_count() - choked.opaque_count();

    write_raster(&choked, &args.output)?;

    printer.status(
        "Choked",
        &format!(
            "{} by {}px, {} removed -> {}",
            display_path(&args.input),
            radius,
            plural(removed, "pixel", "pixels"),
            display_path(&args.output)
        ),
    );

    Ok(removed)
}
