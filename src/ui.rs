//! Centralized output formatting for the CLI.
//!
//! Results and progress go to stdout through these helpers so quiet mode and
//! colors are handled in one place. Diagnostics go through `tracing`.

use colored::{ColoredString, Colorize};

/// Check if quiet mode is enabled via environment variable or --quiet flag
pub fn is_quiet() -> bool {
    std::env::var("NBLOG_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn success_icon() -> ColoredString {
    "✓".green()
}

pub fn failure_icon() -> ColoredString {
    "✗".red()
}

pub fn arrow() -> ColoredString {
    "→".cyan()
}

/// Print unless quiet.
pub fn info(message: &str) {
    if !is_quiet() {
        println!("{}", message);
    }
}

/// Print a success line. Always shown; it carries the command's result.
pub fn success(message: &str) {
    println!("{} {}", success_icon(), message);
}

/// Indented `label: value` line, shown unless quiet.
pub fn field(label: &str, value: &str) {
    if !is_quiet() {
        println!("  {} {}", format!("{}:", label).dimmed(), value);
    }
}

/// Common text formatting patterns
pub mod format {
    /// Render a list as a JSON array, e.g. `["a","b"]`.
    pub fn list(items: &[String]) -> String {
        serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
    }
}
