pub mod choke;
pub mod completions;
pub mod palette;
pub mod trap;

use clap::{Parser, Subcommand};

/// inktrap - Spot colour separation and trapping
#[derive(Parser, Debug)]
#[command(name = "inktrap")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Only print warnings and errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Separate flattened artwork into trapped colour plates
    Trap(trap::TrapArgs),

    /// List the print colours of an image, lightest first
    Palette(palette::PaletteArgs),

    /// Shrink an underbase plate
    Choke(choke::ChokeArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
