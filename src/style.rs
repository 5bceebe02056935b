//! Terminal styling utilities for consistent CLI output

use colored::Colorize;

/// Print an error message to stderr
pub fn error(msg: &str) {
    eprintln!("{} {}", "error:".red().bold(), msg);
}

/// Print a warning message to stderr
pub fn warning(msg: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), msg);
}

/// Print a success message to stdout
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// Print a status/info header
pub fn header(msg: &str) {
    println!("{}", msg.cyan().bold());
}

/// Print a status update
pub fn status(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

/// Format a path for display (bright white)
pub fn path(p: &std::path::Path) -> String {
    p.display().to_string().bright_white().to_string()
}

/// Format a label-value pair for metrics display
pub fn metric(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {}: {}", label.dimmed(), value.to_string().cyan())
}

/// Format a section header (for summaries, etc.)
pub fn section(title: &str) {
    println!("\n{}", title.bold());
}
