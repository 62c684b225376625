//! Configuration types for encryption validation.
//!
//! Split into core validation config (how formats are chosen) and source-specific
//! config (how content is read). The core API never sees filesystem concerns.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Policy controlling which formats are attempted for a file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Try only the format matching the file extension. Without a match, try
    /// JSON then YAML, the two formats SOPS accepts for unknown extensions.
    #[default]
    Strict,
    /// Try every format, starting with the one matching the file extension.
    Bruteforce,
}

impl Strategy {
    /// Every strategy, in declaration order.
    pub const ALL: [Strategy; 2] = [Strategy::Strict, Strategy::Bruteforce];

    /// Lowercase name used on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Strategy::Strict => "strict",
            Strategy::Bruteforce => "bruteforce",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a strategy name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}', expected one of: strict, bruteforce")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| UnknownStrategy(s.to_owned()))
    }
}

/// Core validation config: applies regardless of input source.
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct ValidationConfig {
    /// Format selection strategy used for every file.
    pub strategy: Strategy,
}

/// Filesystem-specific source options.
///
/// NOTE: `paths` is required and must be non-empty. Each path is validated
/// in its own session; directories are not traversed.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct FsSourceConfig {
    /// Files to validate. Required, must be non-empty.
    pub paths: Vec<PathBuf>,
    /// Maximum file size in bytes (default: 10 MB).
    pub max_file_size: u64,
}

impl Default for FsSourceConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            max_file_size: 10_485_760,
        }
    }
}
