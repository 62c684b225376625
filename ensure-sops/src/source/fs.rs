//! Filesystem validation source.
//!
//! Reads files for the validation pipeline with a bounded streaming read, so
//! an oversized file is rejected without being loaded in full.

use std::io::Read;
use std::path::Path;

use crate::error::{ScanError, ScanErrorKind};

/// File name used for extension hints.
///
/// Only the final path component is considered, so dots in directory names
/// never count as extensions.
#[must_use]
pub fn hint_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Read a file using a bounded streaming read, enforcing `max_file_size`.
///
/// Uses `Read::take` so the size check and the read are the same operation.
/// The bytes are returned as-is; decoding is the session's concern.
///
/// # Errors
///
/// Returns a `ScanError` (never silently discards failures) if:
/// - The file cannot be opened or read
/// - The file exceeds `max_file_size`
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> Result<Vec<u8>, ScanError> {
    let file = std::fs::File::open(path).map_err(|e| ScanError {
        file: path.to_owned(),
        kind: ScanErrorKind::IoError,
        message: format!("Failed to open file: {e}"),
    })?;

    // Read at most max_file_size + 1 bytes to detect oversized files
    let mut buffer = Vec::new();
    file.take(max_file_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| ScanError {
            file: path.to_owned(),
            kind: ScanErrorKind::IoError,
            message: format!("Failed to read file: {e}"),
        })?;

    if buffer.len() as u64 > max_file_size {
        return Err(ScanError {
            file: path.to_owned(),
            kind: ScanErrorKind::FileTooLarge,
            message: format!("File exceeds maximum size of {max_file_size} bytes"),
        });
    }

    Ok(buffer)
}
