//! Rendering of check reports and archive listings.
//!
//! Everything a command reports goes to stdout, either as styled text or as
//! one JSON document per command. Logging stays on stderr so `--json` output
//! remains parseable.

mod formatter;
mod human;
mod json;

pub use formatter::OutputFormatter;

use human::HumanFormatter;
use json::JsonFormatter;

/// How results are rendered, derived from the global flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    /// Machine-readable JSON envelope.
    Json,
    /// Text for a terminal.
    Human {
        /// Show rule sources and archive contents.
        verbose: bool,
        /// Show error findings only.
        quiet: bool,
    },
}

impl OutputStyle {
    pub const fn from_flags(json: bool, verbose: bool, quiet: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human { verbose, quiet }
        }
    }

    /// Whether a spinner may be drawn next to the output.
    pub const fn shows_progress(self) -> bool {
        matches!(self, Self::Human { quiet: false, .. })
    }
}

pub fn create_formatter(style: OutputStyle) -> Box<dyn OutputFormatter> {
    match style {
        OutputStyle::Json => Box::new(JsonFormatter),
        OutputStyle::Human { verbose, quiet } => Box::new(HumanFormatter::new(verbose, quiet)),
    }
}
