//! # ensure-sops
//!
//! Checks that configuration files (JSON, YAML, INI, dotenv) were fully
//! encrypted by SOPS.
//!
//! For every file the format is detected from an ordered list of candidates
//! (driven by the file extension and a [`Strategy`]), the content is parsed
//! into a value tree, SOPS metadata keys are set aside, and every remaining
//! leaf must be `ENC[...]`, `null` or empty.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use ensure_sops::{validate_files, FsSourceConfig, Strategy, ValidationConfig};
//!
//! let mut fs_config = FsSourceConfig::default();
//! fs_config.paths = vec![PathBuf::from("secrets.enc.yaml")];
//!
//! let mut validation_config = ValidationConfig::default();
//! validation_config.strategy = Strategy::Bruteforce;
//!
//! let report = validate_files(&fs_config, &validation_config).unwrap();
//! println!("Files checked: {}", report.checked_files);
//! println!("Failures: {}", report.failures.len());
//! println!("OK: {}", report.ok);
//! ```
//!
//! Single streams can be validated with a [`SopsValidator`] session directly.

pub mod checker;
mod config;
mod error;
pub mod format;
pub mod output;
mod report;
pub mod resolver;
mod source;
mod validator;

pub use config::{FsSourceConfig, Strategy, UnknownStrategy, ValidationConfig};
pub use error::{ScanError, ScanErrorKind, ValidationFailure};
pub use format::{Format, ValueTree};
pub use report::{FileFailure, ValidationReport};
pub use validator::SopsValidator;

use tracing::{debug, warn};

use source::fs::{hint_name, read_file_bounded};

/// Validate the encryption of files on disk.
///
/// This is the primary public API. Each path gets its own [`SopsValidator`]
/// session; files are independent and processed in the given order.
///
/// # Arguments
///
/// * `fs_config` - Filesystem-specific source options (paths, max file size)
/// * `validation_config` - Core validation config (format selection strategy)
///
/// # Errors
///
/// Returns an error if `fs_config.paths` is empty.
/// Unreadable files are reported in `report.scan_errors` and never silently
/// discarded.
pub fn validate_files(
    fs_config: &FsSourceConfig,
    validation_config: &ValidationConfig,
) -> anyhow::Result<ValidationReport> {
    if fs_config.paths.is_empty() {
        anyhow::bail!("No paths provided for validation");
    }

    let mut failures = Vec::new();
    let mut scan_errors = Vec::new();
    let mut checked_files: usize = 0;

    for file_path in &fs_config.paths {
        let content = match read_file_bounded(file_path, fs_config.max_file_size) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %file_path.display(), error = %e.message, "file could not be read");
                scan_errors.push(e);
                continue;
            }
        };

        let mut validator = SopsValidator::new(
            content.as_slice(),
            hint_name(file_path),
            validation_config.strategy,
        );
        let (format, values) = match validator.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                scan_errors.push(ScanError {
                    file: file_path.clone(),
                    kind: ScanErrorKind::IoError,
                    message: format!("Failed to read file: {e}"),
                });
                continue;
            }
        };
        checked_files += 1;

        match validator.check_encryption(format, &values) {
            Ok(()) => debug!(file = %file_path.display(), format = %format, "file is encrypted"),
            Err(failure) => failures.push(FileFailure {
                file: file_path.clone(),
                format,
                failure,
            }),
        }
    }

    let ok = failures.is_empty() && scan_errors.is_empty();
    Ok(ValidationReport {
        checked_files,
        ok,
        failures,
        scan_errors,
    })
}
