//! Project configuration (inktrap.yaml).
//!
//! Every field has a default, so an empty file and a missing file behave the
//! same. Command-line flags override whatever is loaded here.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrapError};
use crate::trap::{
    validate_dpi, validate_range, AnalyzerLimits, TrapSettings, MAX_COLORS, MIN_FRACTION,
    MIN_PIXELS,
};
use crate::types::Colour;

/// The name of the config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = "inktrap.yaml";

/// Trapping configuration loaded from inktrap.yaml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trap for the darkest plate (`4pt`, `1/32` or `0.03125`).
    pub min_trap: String,

    /// Trap for the lightest plate.
    pub max_trap: String,

    /// Output resolution in dots per inch.
    pub dpi: f64,

    /// Output directory for separated plates.
    pub output: PathBuf,

    /// Paper colour to leave unprinted, e.g. "#FFFFFF".
    pub paper: Option<String>,

    /// Maximum number of plates.
    pub max_colors: usize,

    /// Significance floor in pixels.
    pub min_pixels: usize,

    /// Significance threshold as a fraction of the image area.
    pub min_fraction: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_trap: "0".to_string(),
            max_trap: "1/32".to_string(),
            dpi: 300.0,
            output: PathBuf::from("dist"),
            paper: None,
            max_colors: MAX_COLORS,
            min_pixels: MIN_PIXELS,
            min_fraction: MIN_FRACTION,
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TrapError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Load `path` if given, else `./inktrap.yaml` if present, else defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let local = Path::new(CONFIG_FILENAME);
                if local.exists() {
                    Self::load(local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Parse config from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty document deserializes as null rather than an empty map
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| TrapError::Config {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// The paper colour, if configured.
    pub fn paper_colour(&self) -> Result<Option<Colour>> {
        self.paper.as_deref().map(Colour::from_hex).transpose()
    }

    /// Palette limits, with the paper colour ignored.
    pub fn limits(&self) -> Result<AnalyzerLimits> {
        Ok(AnalyzerLimits {
            max_colors: self.max_colors,
            min_pixels: self.min_pixels,
            min_fraction: self.min_fraction,
            ignore: self.paper_colour()?.into_iter().collect(),
        })
    }

    /// Validate everything a trapping run needs.
    pub fn settings(&self) -> Result<TrapSettings> {
        Ok(TrapSettings {
            range: validate_range(&self.min_trap, &self.max_trap)?,
            dpi: validate_dpi(self.dpi)?,
            limits: self.limits()?,
        })
    }
}
