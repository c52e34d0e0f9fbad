//! Handles all user-facing output for the CLI.
//!
//! Serialized trees go to stdout; diagnostics and per-file status lines go
//! through `miette` and `termcolor` so every command reports the same way.

use std::io::Write;
use std::path::Path;

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::Node;
use crate::cli::args::Format;
use crate::errors::PhpError;
use crate::validation::ValidationResult;

// ============================================================================
// TREES
// ============================================================================

/// Serializes a tree in the requested format.
pub fn render_tree(program: &Node, format: Format) -> Result<String, Box<dyn std::error::Error>> {
    let text = match format {
        Format::Json => serde_json::to_string_pretty(program)?,
        Format::Yaml => serde_yaml::to_string(program)?,
    };
    Ok(text)
}

pub fn print_tree(program: &Node, format: Format) -> Result<(), Box<dyn std::error::Error>> {
    let text = render_tree(program, format)?;
    println!("{}", text.trim_end());
    Ok(())
}

// ============================================================================
// DIAGNOSTICS
// ============================================================================

/// Renders a parse error with its source snippet on stderr.
pub fn print_error(error: PhpError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

/// One `ok`/`FAIL` line per checked file.
pub fn print_status(path: &Path, error: Option<&PhpError>) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let (label, color) = match error {
        None => ("ok", Color::Green),
        Some(_) => ("FAIL", Color::Red),
    };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stdout, "{label:>4}");
    let _ = stdout.reset();
    let _ = writeln!(stdout, " {}", path.display());
    if let Some(error) = error {
        let _ = writeln!(stdout, "     {error}");
    }
}

pub fn print_summary(checked: usize, failed: usize) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if failed == 0 { Color::Green } else { Color::Red };
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(stdout, "{} checked, {} failed", checked, failed);
    let _ = stdout.reset();
}

/// Prints a validation report, colored by its worst finding.
pub fn print_validation(rule_count: usize, result: &ValidationResult) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let color = if !result.is_valid() {
        Color::Red
    } else if result.is_clean() {
        Color::Green
    } else {
        Color::Yellow
    };
    let _ = writeln!(stdout, "{rule_count} rules");
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)));
    let _ = write!(stdout, "{}", result.render());
    let _ = stdout.reset();
}
