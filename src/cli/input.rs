//! Input document parsing.
//!
//! The external structural parser hands the core a ready-made mapping from
//! rule selector to normalized declaration strings; on the wire that is one
//! JSON object, `{"<selector>": ["<property:value>", ...], ...}`, with key
//! order carried through as rule order.

use serde_json::Value;
use std::fmt;
use std::io::Read;

/// Errors reading the input document.
#[derive(Debug)]
pub enum InputError {
    /// The document is not valid JSON.
    Json(serde_json::Error),
    /// The document parsed but is not a selector-to-declarations object.
    Shape(String),
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::Json(e) => write!(f, "invalid JSON input: {}", e),
            InputError::Shape(detail) => write!(f, "unexpected input shape: {}", detail),
        }
    }
}

impl std::error::Error for InputError {}

impl From<serde_json::Error> for InputError {
    fn from(e: serde_json::Error) -> Self {
        InputError::Json(e)
    }
}

/// Read the rule mapping from a JSON document.
pub fn read_rules<R: Read>(reader: R) -> Result<Vec<(String, Vec<String>)>, InputError> {
    let doc: serde_json::Map<String, Value> = serde_json::from_reader(reader)?;

    let mut rules = Vec::with_capacity(doc.len());
    for (selector, value) in doc {
        let Value::Array(items) = value else {
            return Err(InputError::Shape(format!(
                "rule '{}' must map to an array of declarations",
                selector
            )));
        };
        let mut decls = Vec::with_capacity(items.len());
        for item in items {
            let Value::String(decl) = item else {
                return Err(InputError::Shape(format!(
                    "rule '{}' contains a non-string declaration",
                    selector
                )));
            };
            decls.push(decl);
        }
        rules.push((selector, decls));
    }
    Ok(rules)
}
