//! Operator-facing output helpers for the command handlers.
//!
//! Status lines go to stdout; errors go to stderr so scripted callers can
//! separate diagnostics from the report.

use owo_colors::OwoColorize;
use std::fmt::Display;
use std::io::{self, Write};

/// Print a section header followed by a rule sized to the title.
pub fn section(title: &str) {
    println!();
    println!("{title}");
    println!("{}", "─".repeat(title.len().max(40)));
}

/// Print an aligned key/value line.
pub fn key_value(label: &str, value: impl Display) {
    println!("{label:<18} {value}");
}

pub fn ok(message: &str) {
    println!("{} {message}", "✓".green());
}

pub fn warn(message: &str) {
    println!("{} {message}", "⚠".yellow());
}

pub fn error(message: &str) {
    eprintln!("{} {message}", "✗".red());
}

/// Start a progress line in the form `Label... `; pair with
/// [`progress_done`].
pub fn progress(label: &str) {
    print!("{label}... ");
    let _ = io::stdout().flush();
}

pub fn progress_done(success: bool) {
    if success {
        println!("{}", "ok".green());
    } else {
        println!("{}", "failed".red());
    }
}
