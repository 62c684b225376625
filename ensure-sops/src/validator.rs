//! Per-file validation session.
//!
//! A [`SopsValidator`] moves through two transitions:
//! 1. [`SopsValidator::parse`] reads the input once and finds the first
//!    candidate format that can parse it (or falls back to [`Format::Bin`]).
//! 2. [`SopsValidator::check_encryption`] verifies the parsed tree carries
//!    SOPS metadata and that every other leaf is encrypted or empty.

use std::io::{self, Read};

use tracing::debug;

use crate::checker::check_tree;
use crate::config::Strategy;
use crate::error::ValidationFailure;
use crate::format::{Format, ValueTree};
use crate::resolver::determine_candidates;

/// Validation session for a single input.
///
/// The candidate list is fixed at construction and never changes. The input
/// is consumed on the first [`parse`](Self::parse) call and kept in memory so
/// every candidate parses the same bytes.
#[derive(Debug)]
pub struct SopsValidator<R> {
    source: R,
    filename: String,
    candidates: Vec<Format>,
    cache: Option<Vec<u8>>,
}

impl<R: Read> SopsValidator<R> {
    /// Create a session for `source`, using `filename` only for extension hints.
    pub fn new(source: R, filename: impl Into<String>, strategy: Strategy) -> Self {
        let filename = filename.into();
        let candidates = determine_candidates(&filename, strategy);
        Self {
            source,
            filename,
            candidates,
            cache: None,
        }
    }

    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Formats this session attempts, in order.
    #[must_use]
    pub fn candidates(&self) -> &[Format] {
        &self.candidates
    }

    /// Determine the format and parse the content.
    ///
    /// Returns the first candidate that parses, with its tree. When none does,
    /// the cached content is released and `(Format::Bin, empty tree)` is
    /// returned; that is not an error by itself. Content that is not UTF-8
    /// cannot be any textual format and ends up as `Bin` too.
    ///
    /// # Errors
    ///
    /// Returns an error if reading the source fails.
    pub fn parse(&mut self) -> io::Result<(Format, ValueTree)> {
        if self.cache.is_none() {
            let mut buffer = Vec::new();
            self.source.read_to_end(&mut buffer)?;
            self.cache = Some(buffer);
        }

        let content = self.cache.as_deref().unwrap_or_default();
        match std::str::from_utf8(content) {
            Ok(text) => {
                for &format in &self.candidates {
                    debug!(file = %self.filename, format = %format, "trying format");
                    if let Some(values) = format.parse(text) {
                        debug!(file = %self.filename, format = %format, "format determined");
                        return Ok((format, values));
                    }
                }
            }
            Err(e) => {
                debug!(file = %self.filename, error = %e, "content is not UTF-8");
            }
        }

        debug!(
            file = %self.filename,
            tried = ?self.candidates,
            "format could not be determined"
        );
        self.cache = None;
        Ok((Format::Bin, ValueTree::new()))
    }

    /// Check that `values`, parsed as `format`, is fully encrypted.
    ///
    /// # Errors
    ///
    /// - [`ValidationFailure::UnknownFormat`] if `format` is `Bin`, whatever
    ///   `values` holds.
    /// - [`ValidationFailure::UnencryptedItems`] if any non-metadata leaf is a
    ///   plaintext scalar.
    /// - [`ValidationFailure::MissingMetadata`] if every leaf passes but no
    ///   SOPS metadata key is present.
    pub fn check_encryption(
        &self,
        format: Format,
        values: &ValueTree,
    ) -> Result<(), ValidationFailure> {
        if format == Format::Bin {
            return Err(ValidationFailure::UnknownFormat {
                tried_formats: self.candidates.clone(),
            });
        }

        let (has_sops_keys, user_defined_values) = format.filter_values(values);
        let outcome = check_tree(&user_defined_values);
        debug!(
            file = %self.filename,
            encrypted = outcome.successful.len(),
            unencrypted = outcome.failed.len(),
            has_sops_keys,
            "checked values"
        );

        if !outcome.failed.is_empty() {
            return Err(ValidationFailure::UnencryptedItems {
                items: outcome.failed.into_vec(),
            });
        }
        if !has_sops_keys {
            return Err(ValidationFailure::MissingMetadata {
                found_keys: values.keys().cloned().collect(),
            });
        }
        Ok(())
    }
}
