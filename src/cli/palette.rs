use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::render::load_raster;
use crate::trap::{significant_colors, ColorEntry};

/// List the print colours of an image, lightest first
#[derive(Args, Debug, Default)]
pub struct PaletteArgs {
    /// Image to analyze
    #[arg(required = true)]
    pub input: PathBuf,

    /// Paper colour to leave out (e.g. #FFFFFF)
    #[arg(long)]
    pub paper: Option<String>,

    /// Config file (default: ./inktrap.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: PaletteArgs, printer: &Printer) -> Result<Vec<ColorEntry>> {
    let mut config = Config::discover(args.config.as_deref())?;
    if let Some(paper) = &args.paper {
        config.paper = Some(paper.clone());
    }
    let limits = config.limits()?;

    let display = display_path(&args.input);
    let source = load_raster(&args.input)?;
    let colors = significant_colors(&source, &limits)?;

    printer.status(
        "Sampled",
        &format!(
            "{} from {} (at least {} each)",
            plural(colors.len(), "colour", "colours"),
            display,
            plural(limits.threshold(source.pixel_count()), "pixel", "pixels")
        ),
    );

    // Palette lines go to stdout
    for entry in &colors {
        println!("{}", format_entry(entry));
    }

    Ok(colors)
}

fn format_entry(entry: &ColorEntry) -> String {
    format!("{} {:>6.2} {}", entry.colour, entry.lightness, entry.pixel_count)
}
