//! Raw catalog entry → `ExtensionDescriptor`
//!
//! Any invalid entry or id collision fails the whole catalog; nothing is dropped.

use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::{debug, info};

use super::identity::derive_id;
use super::validation::json_type_name;
use crate::domain::{EnvironmentVariable, ExtensionDescriptor};
use crate::error::{CatalogError, Result};

/// Normalize one raw entry.
pub fn normalize_descriptor(raw: &Value) -> Result<ExtensionDescriptor> {
    let obj = raw.as_object().ok_or_else(|| {
        CatalogError::schema(format!("expected an object, got {}", json_type_name(raw)))
    })?;

    let name = required_string(obj, "name")?;
    if name.is_empty() {
        return Err(CatalogError::schema("field 'name' must not be empty"));
    }
    let description = required_string(obj, "description")?;
    let link = required_string(obj, "link")?;
    if link.is_empty() {
        return Err(CatalogError::schema("field 'link' must not be empty"));
    }

    let explicit_id = optional_string(obj, "id")?;
    let id = derive_id(explicit_id.as_deref(), &name, &link);

    Ok(ExtensionDescriptor {
        id,
        name,
        description,
        command: optional_string(obj, "command")?,
        is_builtin: flag(obj, "is_builtin")?,
        link,
        github_stars: star_count(obj.get("githubStars")),
        installation_notes: optional_string(obj, "installation_notes")?,
        environment_variables: environment_variables(obj)?,
    })
}

/// Normalize a whole catalog, preserving order.
///
/// Fails on the first invalid entry, or when two entries derive the same id.
pub fn normalize_catalog(raws: &[Value]) -> Result<Vec<ExtensionDescriptor>> {
    let mut descriptors = Vec::with_capacity(raws.len());
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(raws.len());

    for (index, raw) in raws.iter().enumerate() {
        let descriptor = normalize_descriptor(raw).map_err(|e| e.at_index(index))?;

        if let Some(&first) = seen.get(&descriptor.id) {
            return Err(CatalogError::DuplicateId {
                id: descriptor.id,
                first,
                second: index,
            });
        }
        seen.insert(descriptor.id.clone(), index);

        debug!("[Normalize] #{} -> {}", index, descriptor.id);
        descriptors.push(descriptor);
    }

    info!("[Normalize] Normalized {} catalog entries", descriptors.len());
    Ok(descriptors)
}

fn required_string(obj: &Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        None | Some(Value::Null) => Err(CatalogError::schema(format!(
            "missing required field '{}'",
            field
        ))),
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(other) => Err(wrong_type(field, "a string", other)),
    }
}

/// Trimmed string; blank counts as absent
fn optional_string(obj: &Map<String, Value>, field: &str) -> Result<Option<String>> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        Some(other) => Err(wrong_type(field, "a string", other)),
    }
}

fn flag(obj: &Map<String, Value>, field: &str) -> Result<bool> {
    match obj.get(field) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
        Some(other) => Err(wrong_type(field, "a boolean", other)),
    }
}

/// Never fails: anything that is not a usable count becomes 0
fn star_count(value: Option<&Value>) -> u64 {
    match value {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(float_count)).unwrap_or(0),
        Some(Value::String(s)) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(float_count))
                .unwrap_or(0)
        }
        _ => 0,
    }
}

/// Floors positive finite values; everything else is 0
fn float_count(f: f64) -> u64 {
    if f.is_finite() && f > 0.0 {
        f as u64
    } else {
        0
    }
}

fn environment_variables(obj: &Map<String, Value>) -> Result<Vec<EnvironmentVariable>> {
    let entries = match obj.get("environmentVariables") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => return Err(wrong_type("environmentVariables", "an array", other)),
    };

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let field = format!("environmentVariables[{}]", i);
            let var = entry
                .as_object()
                .ok_or_else(|| wrong_type(&field, "an object", entry))?;

            let name = match var.get("name") {
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                Some(Value::String(_)) | None | Some(Value::Null) => {
                    return Err(CatalogError::schema(format!("{} is missing 'name'", field)))
                }
                Some(other) => return Err(wrong_type(&format!("{}.name", field), "a string", other)),
            };

            Ok(EnvironmentVariable {
                name,
                description: optional_string(var, "description")
                    .map_err(|_| {
                        CatalogError::schema(format!("{}.description must be a string", field))
                    })?
                    .unwrap_or_default(),
                required: flag(var, "required").map_err(|_| {
                    CatalogError::schema(format!("{}.required must be a boolean", field))
                })?,
            })
        })
        .collect()
}

fn wrong_type(field: &str, expected: &str, got: &Value) -> CatalogError {
    CatalogError::schema(format!(
        "field '{}' must be {}, got {}",
        field,
        expected,
        json_type_name(got)
    ))
}
