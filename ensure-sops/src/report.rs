//! Validation report types.

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{ScanError, ValidationFailure};
use crate::format::Format;

/// A file that was read but did not pass the encryption check.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct FileFailure {
    /// The file that failed.
    pub file: PathBuf,
    /// The format the file resolved to (`bin` when undetermined).
    pub format: Format,
    /// Why it failed.
    pub failure: ValidationFailure,
}

impl FileFailure {
    /// Format the failure for human-readable output: `{file} - {message}`.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("{} - {}", self.file.display(), self.failure)
    }
}

/// Result of a validation run.
///
/// Callers must check both `failures` and `scan_errors`. A non-empty
/// `scan_errors` means some files could not be read at all.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct ValidationReport {
    /// Number of files read and checked (passed or failed).
    pub checked_files: usize,
    /// Whether every file passed and no scan errors occurred.
    pub ok: bool,
    /// Files that were read but are not fully encrypted.
    pub failures: Vec<FileFailure>,
    /// Files that could not be read.
    pub scan_errors: Vec<ScanError>,
}

impl ValidationReport {
    /// Total number of files attempted (checked + unreadable).
    #[must_use]
    pub fn files_attempted(&self) -> usize {
        self.checked_files + self.scan_errors.len()
    }

    /// Number of files that did not pass, for any reason.
    #[must_use]
    pub fn failed_files(&self) -> usize {
        self.failures.len() + self.scan_errors.len()
    }
}
