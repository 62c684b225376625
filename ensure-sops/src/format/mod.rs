//! Format catalog and per-format parsers.
//!
//! Each sub-module wraps the external parser for one syntax family:
//! - `json`: JSON documents via `serde_json`
//! - `yaml`: YAML documents via `serde_saphyr`
//! - `ini`: INI sections via `rust-ini`
//! - `env`: dotenv assignments via `dotenvy`
//!
//! The `bin` format has no parser: it stands for "format undetermined".

pub mod env;
pub mod ini;
pub mod json;
pub mod yaml;

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// A parsed document: string keys mapped to values, in document order.
pub type ValueTree = Map<String, Value>;

/// Reserved top-level key used by SOPS for JSON, YAML and INI files.
static SOPS_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"^sops$") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid reserved key regex: {err}"),
});

/// dotenv cannot nest, so SOPS flattens its metadata into `sops_`-prefixed keys.
static SOPS_PREFIX_PATTERN: LazyLock<Regex> = LazyLock::new(|| match Regex::new(r"^sops_.+") {
    Ok(regex) => regex,
    Err(err) => panic!("Invalid reserved key regex: {err}"),
});

/// A supported file format.
///
/// Declaration order is the catalog order used when resolving candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Yaml,
    Ini,
    Env,
    /// Fallback for anything that no other format could parse.
    Bin,
}

impl Format {
    /// The catalog, in canonical order.
    pub const ALL: [Format; 5] = [
        Format::Json,
        Format::Yaml,
        Format::Ini,
        Format::Env,
        Format::Bin,
    ];

    /// Canonical format name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Ini => "ini",
            Format::Env => "env",
            Format::Bin => "bin",
        }
    }

    /// File extensions that hint at this format.
    #[must_use]
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yaml", "yml"],
            Format::Ini => &["ini", "cfg", "conf", "config"],
            Format::Env => &["env"],
            Format::Bin => &[],
        }
    }

    /// Pattern matching the top-level keys SOPS reserves for its metadata.
    ///
    /// `None` for `Bin`, which never has reserved keys.
    #[must_use]
    pub fn reserved_key_pattern(self) -> Option<&'static Regex> {
        match self {
            Format::Json | Format::Yaml | Format::Ini => Some(&*SOPS_KEY_PATTERN),
            Format::Env => Some(&*SOPS_PREFIX_PATTERN),
            Format::Bin => None,
        }
    }

    /// Whether `key` is a SOPS metadata key in this format.
    #[must_use]
    pub fn is_reserved_key(self, key: &str) -> bool {
        self.reserved_key_pattern()
            .is_some_and(|pattern| pattern.is_match(key))
    }

    /// Parse `raw` into a value tree.
    ///
    /// Returns `None` when the content is not this format: malformed syntax,
    /// or a well-formed document whose top level is not a mapping.
    #[must_use]
    pub fn parse(self, raw: &str) -> Option<ValueTree> {
        match self {
            Format::Json => json::parse_json(raw),
            Format::Yaml => yaml::parse_yaml(raw),
            Format::Ini => ini::parse_ini(raw),
            Format::Env => env::parse_env(raw),
            Format::Bin => None,
        }
    }

    /// Split off the SOPS metadata keys.
    ///
    /// Returns whether any top-level key was reserved, and the tree without
    /// those keys. Only the top level is inspected.
    #[must_use]
    pub fn filter_values(self, values: &ValueTree) -> (bool, ValueTree) {
        let mut has_sops_keys = false;
        let mut user_defined_values = ValueTree::new();
        for (key, value) in values {
            if self.is_reserved_key(key) {
                has_sops_keys = true;
            } else {
                user_defined_values.insert(key.clone(), value.clone());
            }
        }
        (has_sops_keys, user_defined_values)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
