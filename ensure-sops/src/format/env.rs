//! dotenv format parser.

use serde_json::Value;
use tracing::trace;

use super::ValueTree;

/// Quoting state while scanning dotenv content, tracked the way the decoder
/// groups lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Plain,
    PlainEscape,
    Single,
    SingleEscape,
    Double,
    DoubleEscape,
    Comment,
}

/// Escape every `$` the decoder would substitute.
///
/// `dotenvy` expands `$NAME` and `${NAME}` from earlier keys and from the
/// process environment. Escaped, the text comes back verbatim and decoding
/// does not depend on the caller's environment. Single-quoted text is never
/// substituted and is left alone.
fn escape_substitutions(content: &str) -> String {
    let mut escaped = String::with_capacity(content.len());
    let mut state = Scan::Plain;
    let mut after_blank = true;

    for c in content.chars() {
        state = match state {
            Scan::Comment => {
                if c == '\n' {
                    Scan::Plain
                } else {
                    Scan::Comment
                }
            }
            Scan::Plain => match c {
                '#' if after_blank => Scan::Comment,
                '\\' => Scan::PlainEscape,
                '\'' => Scan::Single,
                '"' => Scan::Double,
                '$' => {
                    escaped.push('\\');
                    Scan::Plain
                }
                _ => Scan::Plain,
            },
            Scan::PlainEscape => Scan::Plain,
            Scan::Single => match c {
                '\\' => Scan::SingleEscape,
                '\'' => Scan::Plain,
                _ => Scan::Single,
            },
            Scan::SingleEscape => Scan::Single,
            Scan::Double => match c {
                '\\' => Scan::DoubleEscape,
                '"' => Scan::Plain,
                '$' => {
                    escaped.push('\\');
                    Scan::Double
                }
                _ => Scan::Double,
            },
            Scan::DoubleEscape => Scan::Double,
        };
        escaped.push(c);
        after_blank = c.is_whitespace();
    }
    escaped
}

/// Parse `KEY=VALUE` assignments.
///
/// Values are kept as written: no variable substitution takes place. Lines
/// the decoder rejects are skipped, not reported. Keys with an empty value
/// are dropped; the result is `None` when no key is left.
#[must_use]
pub fn parse_env(content: &str) -> Option<ValueTree> {
    let content = escape_substitutions(content);
    let mut values = ValueTree::new();
    for item in dotenvy::from_read_iter(content.as_bytes()) {
        match item {
            Ok((key, value)) => {
                if !value.is_empty() {
                    values.insert(key, Value::String(value));
                }
            }
            Err(e) => trace!(error = %e, "skipping malformed dotenv line"),
        }
    }

    if values.is_empty() { None } else { Some(values) }
}
