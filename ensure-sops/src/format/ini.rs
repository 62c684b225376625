//! INI format parser.
//!
//! Produces a two-level tree `{section: {key: value}}`. Every key must live in
//! a named section; an empty value becomes `null`. Keys of the `[DEFAULT]`
//! section are not a section of their own: every other section inherits them.

use ini::{Ini, ParseOption};
use serde_json::Value;
use tracing::debug;

use super::ValueTree;

const DEFAULT_SECTION: &str = "DEFAULT";

fn ini_value(raw: &str) -> Value {
    if raw.is_empty() {
        Value::Null
    } else {
        Value::String(raw.to_owned())
    }
}

/// Parse INI content with at least one named section.
///
/// Values are kept as written, quotes included. Yields `None` for syntax
/// errors, keys outside any section, an empty section header, or content
/// without sections. Repeated section headers are merged into the first
/// occurrence.
#[must_use]
pub fn parse_ini(content: &str) -> Option<ValueTree> {
    let options = ParseOption {
        enabled_quote: false,
        enabled_escape: false,
        ..ParseOption::default()
    };
    let parsed = match Ini::load_from_str_opt(content, options) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "not an INI document");
            return None;
        }
    };

    let mut defaults = ValueTree::new();
    for properties in parsed.section_all(Some(DEFAULT_SECTION)) {
        for (key, value) in properties.iter() {
            defaults.insert(key.to_owned(), ini_value(value));
        }
    }

    let mut values = ValueTree::new();
    for (section, properties) in &parsed {
        let Some(section) = section else {
            if properties.iter().next().is_none() {
                continue;
            }
            debug!("INI document has keys outside of a section");
            return None;
        };
        if section.trim().is_empty() {
            debug!("INI document has an empty section header");
            return None;
        }
        if section == DEFAULT_SECTION {
            continue;
        }

        if !values.contains_key(section) {
            values.insert(section.to_owned(), Value::Object(defaults.clone()));
        }
        if let Some(Value::Object(keys)) = values.get_mut(section) {
            for (key, value) in properties.iter() {
                keys.insert(key.to_owned(), ini_value(value));
            }
        }
    }

    if values.is_empty() {
        debug!("INI document has no sections");
        return None;
    }
    Some(values)
}
