//! Pre-flight checks for trapping runs.
//!
//! Nothing here is fatal to the pipeline; the checks surface advisories
//! (oversized traps, slow rasters, traps that round to nothing) before a run.

mod checks;
mod warning;

pub use checks::{check_dimensions, check_resolution, check_trap_size};
pub use warning::{Diagnostic, Severity, ValidationResult};

use crate::output::Printer;
use crate::trap::TrapSettings;

/// Run all checks for a raster of the given size.
pub fn check_run(width: u32, height: u32, settings: &TrapSettings) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.extend(check_trap_size(&settings.range));
    result.extend(check_dimensions(width, height));
    result.extend(check_resolution(&settings.range, settings.dpi));
    result
}

/// Print advisories to stderr, each followed by its help line.
pub fn print_diagnostics(result: &ValidationResult, printer: &Printer) {
    for d in result {
        let label = printer.severity(d.severity);
        printer.line(&format!("{}[{}]: {}", label, d.code, d.message));
        if let Some(help) = d.help {
            printer.line(&format!("    {}", printer.dim(&format!("help: {help}"))));
        }
    }
}
