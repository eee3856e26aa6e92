//! Terminal output for the inktrap CLI.
//!
//! Status lines follow Cargo's layout: a bold verb right-aligned in a fixed
//! column, then the message. Everything here writes to stderr so stdout
//! stays clean for the `palette` listing.

use std::io::{self, IsTerminal, Write};
use std::path::Path;

use crate::trap::Progress;
use crate::validation::Severity;

const VERB_WIDTH: usize = 12;

/// Colour of a verb or label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Done,
    Info,
    Caution,
}

impl Tone {
    fn ansi(self) -> &'static str {
        match self {
            Tone::Done => "\x1b[1;32m",
            Tone::Info => "\x1b[1;36m",
            Tone::Caution => "\x1b[1;33m",
        }
    }
}

impl From<Severity> for Tone {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Note => Tone::Info,
            Severity::Warning => Tone::Caution,
        }
    }
}

const RESET: &str = "\x1b[0m";
const DIM: &str = "\x1b[2m";

/// Status printer for the CLI.
///
/// Colour follows whether stderr is a terminal. Quiet mode drops status
/// and progress lines; advisories and warnings are always shown.
#[derive(Debug)]
pub struct Printer {
    color: bool,
    quiet: bool,
}

impl Printer {
    pub fn new() -> Self {
        Self {
            color: io::stderr().is_terminal(),
            quiet: false,
        }
    }

    pub fn quiet(self, quiet: bool) -> Self {
        Self { quiet, ..self }
    }

    /// `    Finished 3 layers to dist`
    pub fn status(&self, verb: &str, message: &str) {
        if !self.quiet {
            self.verb_line(Tone::Done, verb, message);
        }
    }

    /// `     #FF0000 4px trap -> 00-FF0000.png`
    pub fn info(&self, verb: &str, message: &str) {
        if !self.quiet {
            self.verb_line(Tone::Info, verb, message);
        }
    }

    /// A line with no verb column.
    pub fn line(&self, message: &str) {
        let _ = writeln!(io::stderr().lock(), "{message}");
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    /// An advisory label such as `warning`, coloured by severity.
    pub fn severity(&self, severity: Severity) -> String {
        self.paint(Tone::from(severity).ansi(), &severity.to_string())
    }

    /// A progress observer printing through this printer.
    pub fn progress(&self) -> StatusProgress<'_> {
        StatusProgress { printer: self }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn verb_line(&self, tone: Tone, verb: &str, message: &str) {
        let verb = format!("{verb:>VERB_WIDTH$}");
        let _ = writeln!(
            io::stderr().lock(),
            "{} {message}",
            self.paint(tone.ansi(), &verb)
        );
    }
}

impl Default for Printer {
    fn default() -> Self {
        Self::new()
    }
}

/// Pipeline progress as status lines: `   Separated [ 50%] #000000 (2 of 2)`.
///
/// The first word of each progress message becomes the verb.
pub struct StatusProgress<'a> {
    printer: &'a Printer,
}

impl Progress for StatusProgress<'_> {
    fn report(&mut self, percent: u8, message: &str) {
        let (verb, rest) = message.split_once(' ').unwrap_or((message, ""));
        let counter = self.printer.dim(&format!("[{percent:>3}%]"));
        self.printer.status(verb, &format!("{counter} {rest}"));
    }
}

/// `plural(1, "layer", "layers")` is "1 layer".
pub fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{} {}", n, if n == 1 { one } else { many })
}

/// A path relative to the working directory when it lies inside it.
pub fn display_path(path: &Path) -> String {
    let relative = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf));

    match relative {
        Some(p) if p.as_os_str().is_empty() => ".".to_string(),
        Some(p) => p.display().to_string(),
        None => path.display().to_string(),
    }
}
