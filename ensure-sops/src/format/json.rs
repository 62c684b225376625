//! JSON format parser.

use serde_json::Value;
use tracing::debug;

use super::ValueTree;

/// Parse JSON content whose top level is an object.
///
/// Decode errors and non-object documents (arrays, scalars) yield `None`.
#[must_use]
pub fn parse_json(content: &str) -> Option<ValueTree> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(values)) => Some(values),
        Ok(_) => {
            debug!("JSON document is not an object");
            None
        }
        Err(e) => {
            debug!(error = %e, "not a JSON document");
            None
        }
    }
}
