//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escape codes when stdout
//! is not a terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;

/// Check mark for completed steps
pub const CHECK: &str = "✓";

/// Cross for failed steps
pub const CROSS: &str = "✗";

/// Semantic styles for terminal text
pub trait Stylize: std::fmt::Display {
    /// Bold, for headings
    fn emphasis(&self) -> String {
        self.to_string().bold().to_string()
    }

    /// Dimmed, for secondary information
    fn muted(&self) -> String {
        self.to_string().dimmed().to_string()
    }

    /// Cyan, for identifiers
    fn accent(&self) -> String {
        self.to_string().cyan().to_string()
    }

    /// Green
    fn success(&self) -> String {
        self.to_string().green().to_string()
    }

    /// Yellow
    fn warn(&self) -> String {
        self.to_string().yellow().to_string()
    }

    /// Bold red
    fn error(&self) -> String {
        self.to_string().red().bold().to_string()
    }
}

impl<T: std::fmt::Display + ?Sized> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.error()
}

/// Spinner used while external commands run
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

/// Color one line of a unified diff
pub fn diff_line(line: &str) -> String {
    if line.starts_with("+++") || line.starts_with("---") {
        line.emphasis()
    } else if line.starts_with('+') {
        line.success()
    } else if line.starts_with('-') {
        line.to_string().red().to_string()
    } else if line.starts_with("@@") {
        line.accent()
    } else {
        line.to_string()
    }
}
