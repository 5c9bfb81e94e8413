//! Shape detection and parsing of the JSON input documents.
//!
//! Every parser takes an already decoded [`Value`]. Records that do not fit
//! are skipped and reported as diagnostics; only a field document without
//! any form is an error.

use std::path::Path;

use formgen_model::{
    AreaConfig, AreaMapEntry, FieldDefinition, LabelMapping, LayoutDiagnostic, Nature,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

pub const ORIGINAL_JSON_KEY: &str = "originalJson";
pub const LABEL_MAPPINGS_KEY: &str = "labelMappings";
pub const AREA_CONFIGS_KEY: &str = "areaConfigs";

/// Contents of the raw field document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldsDocument {
    pub form_id: String,
    /// Fields in document order.
    pub fields: Vec<FieldDefinition>,
    /// Every key of the selected form, including entries that are not
    /// field objects. Static panels are triggered by these keys.
    pub raw_keys: Vec<String>,
    pub label_mappings: Vec<LabelMapping>,
    /// Area configuration embedded next to `originalJson`.
    pub area_configs: Vec<AreaConfig>,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

/// Parses `{"originalJson": {form: {...}}, ...}` or `{form: {...}}`.
///
/// The first form key is used unless `preferred_form` names another one.
/// A preferred id that is not a key of the document renames the first form.
pub fn parse_fields_document(
    document: &Value,
    preferred_form: Option<&str>,
    path: &Path,
) -> Result<FieldsDocument> {
    let Value::Object(root) = document else {
        return Err(IngestError::UnexpectedShape {
            path: path.to_path_buf(),
            reason: "field document is not a JSON object".to_string(),
        });
    };

    let mut parsed = FieldsDocument::default();
    let forms = match root.get(ORIGINAL_JSON_KEY) {
        Some(Value::Object(forms)) => {
            if let Some(mappings) = root.get(LABEL_MAPPINGS_KEY) {
                parsed.label_mappings =
                    parse_label_mappings(mappings, LABEL_MAPPINGS_KEY, &mut parsed.diagnostics);
            }
            if let Some(configs) = root.get(AREA_CONFIGS_KEY) {
                parsed.area_configs =
                    parse_area_configs(configs, AREA_CONFIGS_KEY, &mut parsed.diagnostics);
            }
            forms
        }
        Some(_) => {
            return Err(IngestError::UnexpectedShape {
                path: path.to_path_buf(),
                reason: format!("`{ORIGINAL_JSON_KEY}` is not an object"),
            });
        }
        None => root,
    };

    let candidates: Vec<(&String, &Map<String, Value>)> = forms
        .iter()
        .filter(|(key, _)| key.as_str() != LABEL_MAPPINGS_KEY && key.as_str() != AREA_CONFIGS_KEY)
        .filter_map(|(key, value)| value.as_object().map(|form| (key, form)))
        .collect();

    let selected = preferred_form
        .and_then(|wanted| candidates.iter().find(|(key, _)| key.as_str() == wanted))
        .or_else(|| candidates.first());
    let Some((form_key, form)) = selected else {
        return Err(IngestError::NoForm {
            path: path.to_path_buf(),
        });
    };

    parsed.form_id = match preferred_form {
        Some(wanted) if !wanted.trim().is_empty() && wanted != form_key.as_str() => {
            warn!(
                requested = %wanted,
                found = %form_key,
                "requested form id not in document, using the first form"
            );
            wanted.trim().to_string()
        }
        _ => (*form_key).clone(),
    };
    debug!(form_id = %parsed.form_id, field_count = form.len(), "form selected");

    for (field_id, raw) in *form {
        parsed.raw_keys.push(field_id.clone());
        let Value::Object(entry) = raw else {
            warn!(field_id = %field_id, "field entry is not an object");
            parsed.diagnostics.push(LayoutDiagnostic::malformed(
                field_id.as_str(),
                "field entry is not an object",
            ));
            continue;
        };
        for problem in shape_problems(entry) {
            warn!(field_id = %field_id, problem, "field attribute ignored");
            parsed
                .diagnostics
                .push(LayoutDiagnostic::malformed(field_id.as_str(), problem));
        }
        let mut field = match serde_json::from_value::<FieldDefinition>(raw.clone()) {
            Ok(field) => field,
            Err(error) => {
                warn!(field_id = %field_id, %error, "field attributes unreadable, kept as string");
                parsed.diagnostics.push(LayoutDiagnostic::malformed(
                    field_id.as_str(),
                    format!("field attributes unreadable, kept as a string field: {error}"),
                ));
                FieldDefinition::new(field_id.as_str(), Nature::String)
            }
        };
        field.id = field_id.clone();
        if field.promote_values_list() {
            debug!(field_id = %field_id, "values list field rendered as lov");
        }
        parsed.fields.push(field);
    }
    Ok(parsed)
}

/// Attributes whose JSON type cannot be used. They are read as absent.
fn shape_problems(entry: &Map<String, Value>) -> Vec<&'static str> {
    let mut problems = Vec::new();
    if matches!(
        entry.get("nature"),
        Some(Value::Null | Value::Array(_) | Value::Object(_))
    ) {
        problems.push("nature is not a scalar, using string");
    }
    if matches!(entry.get("controls"), Some(value) if !value.is_array() && !value.is_null()) {
        problems.push("controls is not an array");
    }
    if matches!(entry.get("filters"), Some(value) if !value.is_array() && !value.is_null()) {
        problems.push("filters is not an array");
    }
    problems
}

/// Parses the explicit area map.
///
/// Accepts an array of entries or an object keyed by field id.
pub fn parse_area_map(
    document: &Value,
    source: &str,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Vec<AreaMapEntry> {
    match document {
        Value::Array(items) => records(items.iter().cloned(), source, diagnostics),
        Value::Object(map) => {
            let keyed = map.iter().map(|(field_id, entry)| match entry {
                Value::Object(entry) => {
                    let mut entry = entry.clone();
                    entry
                        .entry("fieldId")
                        .or_insert_with(|| Value::String(field_id.clone()));
                    Value::Object(entry)
                }
                other => other.clone(),
            });
            records(keyed, source, diagnostics)
        }
        Value::Null => Vec::new(),
        _ => {
            diagnostics.push(LayoutDiagnostic::malformed(
                source,
                "area map is neither an array nor an object",
            ));
            Vec::new()
        }
    }
}

/// Parses the label area configuration.
///
/// Elements may be JSON-encoded strings. An object root is read as area
/// name to configuration.
pub fn parse_area_configs(
    document: &Value,
    source: &str,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Vec<AreaConfig> {
    match document {
        Value::Array(items) => {
            let decoded = items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| decode_embedded(item, source, index, diagnostics))
                .collect::<Vec<_>>();
            records(decoded.into_iter(), source, diagnostics)
        }
        Value::Object(map) => {
            let decoded = map
                .iter()
                .enumerate()
                .filter_map(|(index, (area, item))| {
                    decode_embedded(item, source, index, diagnostics).map(|value| match value {
                        Value::Object(mut config) => {
                            config
                                .entry("area")
                                .or_insert_with(|| Value::String(area.clone()));
                            Value::Object(config)
                        }
                        Value::Array(fields) => {
                            serde_json::json!({"area": area, "fields": fields})
                        }
                        other => other,
                    })
                })
                .collect::<Vec<_>>();
            records(decoded.into_iter(), source, diagnostics)
        }
        Value::Null => Vec::new(),
        _ => {
            diagnostics.push(LayoutDiagnostic::malformed(
                source,
                "area configuration is neither an array nor an object",
            ));
            Vec::new()
        }
    }
}

/// Parses `[{ancien, nouveau}]` or an object of old label to new label.
pub fn parse_label_mappings(
    document: &Value,
    source: &str,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Vec<LabelMapping> {
    match document {
        Value::Array(items) => records(items.iter().cloned(), source, diagnostics),
        Value::Object(map) => map
            .iter()
            .filter_map(|(old_label, new_label)| match new_label {
                Value::String(new_label) => Some(LabelMapping {
                    old_label: old_label.clone(),
                    new_label: new_label.clone(),
                }),
                _ => {
                    diagnostics.push(LayoutDiagnostic::malformed(
                        format!("{source} {old_label}"),
                        "label rename target is not a string",
                    ));
                    None
                }
            })
            .collect(),
        Value::Null => Vec::new(),
        _ => {
            diagnostics.push(LayoutDiagnostic::malformed(
                source,
                "label renames are neither an array nor an object",
            ));
            Vec::new()
        }
    }
}

fn decode_embedded(
    item: &Value,
    source: &str,
    index: usize,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Option<Value> {
    match item {
        Value::String(encoded) => match serde_json::from_str(encoded) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!(source, index, %error, "embedded JSON element skipped");
                diagnostics.push(LayoutDiagnostic::malformed(
                    format!("{source} [{index}]"),
                    format!("embedded JSON is invalid: {error}"),
                ));
                None
            }
        },
        other => Some(other.clone()),
    }
}

fn records<T: DeserializeOwned>(
    items: impl Iterator<Item = Value>,
    source: &str,
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Vec<T> {
    items
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(source, index, %error, "record skipped");
                diagnostics.push(LayoutDiagnostic::malformed(
                    format!("{source} [{index}]"),
                    error.to_string(),
                ));
                None
            }
        })
        .collect()
}
