//! Top-level catalog validation
//!
//! The catalog body must be a JSON array. Entry shapes are checked later by the
//! normalizer; this only decides whether the body is a catalog at all.

use serde_json::Value;

/// Parse a catalog body into its raw entries.
///
/// `[]` (or an empty array with whitespace) is a valid empty catalog. An empty
/// body, invalid JSON, or any non-array value is rejected.
pub fn parse_catalog_body(body: &str) -> Result<Vec<Value>, String> {
    if body.trim().is_empty() {
        return Err("Empty response body".to_string());
    }

    let value: Value = serde_json::from_str(body).map_err(|e| format!("Invalid JSON: {}", e))?;

    match value {
        Value::Array(entries) => Ok(entries),
        Value::Object(_) => Err("Catalog must be a JSON array, got an object".to_string()),
        other => Err(format!("Catalog must be a JSON array, got {}", json_type_name(&other))),
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
