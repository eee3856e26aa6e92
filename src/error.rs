use miette::Diagnostic;
use thiserror::Error;

/// Main error type for inktrap operations
#[derive(Error, Diagnostic, Debug)]
pub enum TrapError {
    #[error("Invalid length '{input}': {message}")]
    #[diagnostic(
        code(inktrap::length::format),
        help("Use points (4pt), a fraction of an inch (1/32) or decimal inches (0.03125)")
    )]
    InvalidFormat { input: String, message: String },

    #[error("Division by zero in fractional length '{input}'")]
    #[diagnostic(code(inktrap::length::division_by_zero))]
    DivisionByZero { input: String },

    #[error("Negative length '{input}'")]
    #[diagnostic(
        code(inktrap::length::negative),
        help("Trap sizes must be zero or greater")
    )]
    NegativeValue { input: String },

    #[error("Minimum trap ({min:.5}in) is larger than maximum trap ({max:.5}in)")]
    #[diagnostic(code(inktrap::length::range_order))]
    RangeOrder { min: f64, max: f64 },

    #[error("Invalid resolution: {dpi}")]
    #[diagnostic(
        code(inktrap::resolution),
        help("Resolution must be a positive number of dots per inch")
    )]
    InvalidResolution { dpi: f64 },

    #[error("Too many colours: found {found}, at most {max} are supported")]
    #[diagnostic(
        code(inktrap::analyze::too_many_colors),
        help("Flatten the artwork to spot colours without anti-aliasing before trapping")
    )]
    TooManyColors { found: usize, max: usize },

    #[error("No significant colours found")]
    #[diagnostic(
        code(inktrap::analyze::no_colors),
        help("Every colour covers fewer pixels than the significance threshold, or the image is empty")
    )]
    NoSignificantColors,

    #[error("Dimension mismatch: {message}")]
    #[diagnostic(code(inktrap::dimension))]
    DimensionMismatch { message: String },

    #[error("Trapping cancelled")]
    #[diagnostic(code(inktrap::cancelled))]
    Cancelled,

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(inktrap::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Config error: {message}")]
    #[diagnostic(code(inktrap::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },
}

impl TrapError {
    pub(crate) fn dimension(message: impl Into<String>) -> Self {
        TrapError::DimensionMismatch {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrapError>;
