//! Candidate format resolution.
//!
//! Turns a file name and a [`Strategy`] into the ordered list of formats a
//! validator session will attempt.

use crate::config::Strategy;
use crate::format::Format;

/// Formats tried under [`Strategy::Strict`] when no extension matches.
///
/// SOPS itself only handles JSON and YAML for unrecognized extensions, so
/// nothing else can be a SOPS file there. Kept literal: it must not grow with
/// the catalog.
pub const STRICT_FALLBACK: [Format; 2] = [Format::Json, Format::Yaml];

/// Format implied by the file name's extensions, if any.
///
/// Every dot-separated segment after the first is a hint, so `app.prod.yaml`
/// and `app.yaml.prod` both hint at YAML. Formats are checked in catalog order,
/// and for each format the hints in file-name order.
#[must_use]
pub fn hinted_format(filename: &str) -> Option<Format> {
    let hints: Vec<&str> = filename.split('.').skip(1).collect();
    Format::ALL.into_iter().find(|format| {
        hints
            .iter()
            .any(|hint| format.extensions().contains(hint))
    })
}

/// Ordered list of formats to attempt for `filename`.
///
/// - `Strict`: the hinted format alone, or [`STRICT_FALLBACK`] without a hint.
/// - `Bruteforce`: the whole catalog, with the hinted format moved to the front.
#[must_use]
pub fn determine_candidates(filename: &str, strategy: Strategy) -> Vec<Format> {
    let hinted = hinted_format(filename);

    match strategy {
        Strategy::Strict => hinted.map_or_else(|| STRICT_FALLBACK.to_vec(), |format| vec![format]),
        Strategy::Bruteforce => {
            let mut formats = Format::ALL.to_vec();
            if let Some(position) = hinted.and_then(|h| formats.iter().position(|f| *f == h)) {
                let format = formats.remove(position);
                formats.insert(0, format);
            }
            formats
        }
    }
}
