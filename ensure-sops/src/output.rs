//! Shared output formatting for validation reports.
//!
//! Provides JSON and plain-text formatters for `ValidationReport`.
//! Color/terminal formatting is left out of this core module;
//! that concern belongs to the CLI layer.

use std::io::Write;

use crate::report::ValidationReport;

/// Format a `ValidationReport` as JSON to a writer.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_json(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json}")?;
    Ok(())
}

/// Format a `ValidationReport` as plain text to a writer.
///
/// Writes one line per unreadable file, then one line per failed file.
/// A fully successful report writes nothing.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_human(report: &ValidationReport, writer: &mut dyn Write) -> anyhow::Result<()> {
    for scan_err in &report.scan_errors {
        writeln!(writer, "{}", scan_err.format_human_readable())?;
    }
    for failure in &report.failures {
        writeln!(writer, "{}", failure.format_human_readable())?;
    }
    Ok(())
}
