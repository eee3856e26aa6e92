//! Trap command implementation.
//!
//! Loads flattened artwork, separates it into plates, traps them and writes
//! one PNG per plate plus a manifest.

use std::path::PathBuf;

use clap::Args;

use crate::config::Config;
use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::render::{load_raster, write_layers, write_masks, LayerManifest};
use crate::trap::Trapper;
use crate::validation::{check_run, print_diagnostics};

/// Separate flattened artwork into trapped colour plates
#[derive(Args, Debug, Default)]
pub struct TrapArgs {
    /// Flattened image to separate
    #[arg(required = true)]
    pub input: PathBuf,

    /// Trap for the darkest plate (e.g. 0, 1pt, 1/72)
    #[arg(long, allow_hyphen_values = true)]
    pub min: Option<String>,

    /// Trap for the lightest plate (e.g. 4pt, 1/32, 0.03125)
    #[arg(long, allow_hyphen_values = true)]
    pub max: Option<String>,

    /// Output resolution in dots per inch
    #[arg(long)]
    pub dpi: Option<f64>,

    /// Output directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Config file (default: ./inktrap.yaml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Paper colour to leave unprinted (e.g. #FFFFFF)
    #[arg(long)]
    pub paper: Option<String>,

    /// Also write each plate's expansion mask
    #[arg(long)]
    pub masks: bool,
}

impl TrapArgs {
    /// Apply command-line overrides on top of the loaded config.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(min) = &self.min {
            config.min_trap = min.clone();
        }
        if let Some(max) = &self.max {
            config.max_trap = max.clone();
        }
        if let Some(dpi) = self.dpi {
            config.dpi = dpi;
        }
        if let Some(output) = &self.output {
            config.output = output.clone();
        }
        if let Some(paper) = &self.paper {
            config.paper = Some(paper.clone());
        }
        config
    }
}

pub fn run(args: TrapArgs, printer: &Printer) -> Result<LayerManifest> {
    let config = args.apply(Config::discover(args.config.as_deref())?);
    let settings = config.settings()?;

    let display = display_path(&args.input);
    printer.status("Loading", &display);
    let source = load_raster(&args.input)?;

    let (width, height) = source.size();
    printer.info(
        "Trapping",
        &format!(
            "{}x{} at {} dpi, {:.4}in to {:.4}in",
            width, height, settings.dpi, settings.range.min, settings.range.max
        ),
    );

    let checks = check_run(width, height, &settings);
    print_diagnostics(&checks, printer);

    let mut trapper = Trapper::new(settings);
    let mut progress = printer.progress();
    let output = trapper.run(&source, Some(&mut progress))?;

    let manifest = write_layers(&output, &config.output)?;
    if args.masks {
        write_masks(&source, &output, &config.output)?;
    }

    for record in &manifest.layers {
        printer.info(
            &record.colour.to_string(),
            &format!("{}px trap -> {}", record.trap_pixels, record.file),
        );
    }
    printer.status(
        "Finished",
        &format!(
            "{} to {}",
            plural(manifest.layers.len(), "layer", "layers"),
            display_path(&config.output)
        ),
    );

    Ok(manifest)
}
