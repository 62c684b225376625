//! YAML format parser.
//!
//! Documents are deserialized straight into `serde_json::Value` so YAML and
//! JSON share one tree representation. `serde_saphyr` only builds plain data,
//! so tags never trigger arbitrary construction.

use serde_json::Value;
use tracing::debug;

use super::ValueTree;

/// Parse YAML content whose top level is a mapping.
///
/// Syntax errors and non-mapping documents yield `None`.
#[must_use]
pub fn parse_yaml(content: &str) -> Option<ValueTree> {
    match serde_saphyr::from_str::<Value>(content) {
        Ok(Value::Object(values)) => Some(values),
        Ok(_) => {
            debug!("YAML document is not a mapping");
            None
        }
        Err(e) => {
            debug!(error = %e, "not a YAML document");
            None
        }
    }
}
