//! Error types for encryption validation.

use std::fmt::Display;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::format::Format;

/// Why a file did not pass the encryption check.
///
/// All three are expected outcomes of validating a file, not crashes. Each
/// carries the data needed to explain the failure to a user or a machine.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[non_exhaustive]
pub enum ValidationFailure {
    /// No candidate format could parse the input.
    #[error(
        "File format cannot be determined, here's the list of formats tried: {}",
        render_list(.tried_formats)
    )]
    UnknownFormat {
        /// The candidate formats that were attempted, in order.
        tried_formats: Vec<Format>,
    },

    /// At least one value outside the SOPS metadata is neither encrypted nor empty.
    #[error(
        "Some items in this file are not encrypted, here's the list: {}",
        render_list(.items)
    )]
    UnencryptedItems {
        /// Dotted paths of the offending values, in document order.
        items: Vec<String>,
    },

    /// Every value is encrypted or empty, but the SOPS metadata is absent.
    #[error(
        "SOPS metadata is missing, here's all the top level keys in the file: {}",
        render_list(.found_keys)
    )]
    MissingMetadata {
        /// All top-level keys of the parsed document.
        found_keys: Vec<String>,
    },
}

fn render_list<T: Display>(items: &[T]) -> String {
    let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
    format!("[{}]", rendered.join(", "))
}

/// The kind of scan-level failure that prevented a file from being validated.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanErrorKind {
    /// An I/O error occurred while opening or reading the file.
    IoError,
    /// The file exceeded the configured maximum size limit.
    FileTooLarge,
}

/// A scan-level error: a file that could not be validated at all.
///
/// These are distinct from `ValidationFailure`, which means the file was read
/// and found lacking. A `ScanError` means the file could not even be read:
/// callers must still treat these as failures.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ScanError {
    /// The file path that could not be read.
    pub file: PathBuf,
    /// The kind of failure.
    pub kind: ScanErrorKind,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ScanError {
    /// Format the error for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("{} - [scan error] {}", self.file.display(), self.message)
    }
}
