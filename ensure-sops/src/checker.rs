//! Recursive encrypted-leaf checker.
//!
//! Walks a value tree and sorts every leaf path into "successful" (encrypted
//! or empty) and "failed" (anything else). Paths are dotted; sequence items
//! use their decimal index, e.g. `data.subdata.1.fail_me`.

use std::collections::HashSet;

use serde_json::Value;

use crate::format::ValueTree;

/// Prefix of a SOPS-encrypted value.
pub const ENCRYPTED_PREFIX: &str = "ENC[";
/// Suffix of a SOPS-encrypted value.
pub const ENCRYPTED_SUFFIX: &str = "]";

/// Whether `value` has the `ENC[...]` envelope.
///
/// Only the surface syntax is checked; the payload is not inspected.
#[must_use]
pub fn is_encrypted_value(value: &str) -> bool {
    value.starts_with(ENCRYPTED_PREFIX) && value.ends_with(ENCRYPTED_SUFFIX)
}

/// Insertion-ordered set of key paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPaths {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl KeyPaths {
    /// Add `path` unless already present. Returns whether it was added.
    pub fn insert(&mut self, path: String) -> bool {
        if self.seen.contains(&path) {
            return false;
        }
        self.seen.insert(path.clone());
        self.ordered.push(path);
        true
    }

    /// Append every path of `other` that is not already present, in order.
    pub fn merge(&mut self, other: KeyPaths) {
        for path in other.ordered {
            self.insert(path);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Paths in first-seen order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.ordered
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}

/// Result of walking a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Leaves that are encrypted, `null`, or empty.
    pub successful: KeyPaths,
    /// Leaves holding a plaintext scalar.
    pub failed: KeyPaths,
}

impl CheckOutcome {
    /// Fold a child outcome into this one, keeping first-seen order.
    pub fn merge(&mut self, child: CheckOutcome) {
        self.successful.merge(child.successful);
        self.failed.merge(child.failed);
    }
}

fn is_acceptable_leaf(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty() || is_encrypted_value(s),
        _ => false,
    }
}

fn check_entry(key: &str, value: &Value, prefix: &str, outcome: &mut CheckOutcome) {
    match value {
        Value::Object(_) | Value::Array(_) => {
            outcome.merge(check_container(value, &format!("{prefix}{key}.")));
        }
        leaf if is_acceptable_leaf(leaf) => {
            outcome.successful.insert(format!("{prefix}{key}"));
        }
        _ => {
            outcome.failed.insert(format!("{prefix}{key}"));
        }
    }
}

/// Check every leaf of a mapping or sequence, naming paths with `prefix`.
///
/// Mappings are walked in key order, sequences by ascending index. The whole
/// container is always visited. A scalar `container` has no entries and
/// yields an empty outcome.
#[must_use]
pub fn check_container(container: &Value, prefix: &str) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();
    match container {
        Value::Object(map) => {
            for (key, value) in map {
                check_entry(key, value, prefix, &mut outcome);
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                check_entry(&index.to_string(), value, prefix, &mut outcome);
            }
        }
        _ => {}
    }
    outcome
}

/// Check every leaf of a parsed document.
#[must_use]
pub fn check_tree(values: &ValueTree) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();
    for (key, value) in values {
        check_entry(key, value, "", &mut outcome);
    }
    outcome
}
