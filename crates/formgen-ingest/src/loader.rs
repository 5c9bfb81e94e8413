//! Reading the input documents of one generation run from a directory.

use std::fs;
use std::path::{Path, PathBuf};

use formgen_model::{FieldDefinition, LayoutDiagnostic, PlacementSources};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, info_span};

use crate::documents::{parse_area_configs, parse_area_map, parse_fields_document};
use crate::error::{IngestError, Result};

/// File names of the input documents, relative to the input directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputFiles {
    pub fields: String,
    pub area_map: String,
    pub area_config: String,
    pub field_links: String,
    pub filters: String,
}

impl Default for InputFiles {
    fn default() -> Self {
        Self {
            fields: "transformed_result.json".to_string(),
            area_map: "area_map.json".to_string(),
            area_config: "area_data.json".to_string(),
            field_links: "fieldlink.json".to_string(),
            filters: "parsed_result.json".to_string(),
        }
    }
}

/// Everything read for one form, ready for resolution.
#[derive(Debug, Clone, Default)]
pub struct FormInputs {
    pub form_id: String,
    pub fields: Vec<FieldDefinition>,
    /// Every key of the form, including entries that were not fields.
    pub raw_keys: Vec<String>,
    pub sources: PlacementSources,
    /// Raw link document; `Value::Null` when absent.
    pub field_links: Value,
    /// Raw filter document; `Value::Null` when absent.
    pub filters: Value,
    pub diagnostics: Vec<LayoutDiagnostic>,
    /// Documents that were found and read.
    pub loaded: Vec<PathBuf>,
}

/// Loads every input document from `input_dir`.
///
/// Only the field document is required. The embedded `areaConfigs` of the
/// field document is used when the area configuration file is absent.
pub fn load_inputs(
    input_dir: &Path,
    files: &InputFiles,
    preferred_form: Option<&str>,
) -> Result<FormInputs> {
    let span = info_span!("ingest", input_dir = %input_dir.display());
    let _guard = span.enter();

    let fields_path = input_dir.join(&files.fields);
    let Some(fields_document) = read_optional_json(&fields_path)? else {
        return Err(IngestError::MissingInput { path: fields_path });
    };
    let document = parse_fields_document(&fields_document, preferred_form, &fields_path)?;

    let mut inputs = FormInputs {
        form_id: document.form_id,
        fields: document.fields,
        raw_keys: document.raw_keys,
        diagnostics: document.diagnostics,
        loaded: vec![fields_path],
        ..FormInputs::default()
    };
    inputs.sources.label_mappings = document.label_mappings;

    let area_map_path = input_dir.join(&files.area_map);
    if let Some(area_map) = read_optional_json(&area_map_path)? {
        inputs.sources.area_map =
            parse_area_map(&area_map, &files.area_map, &mut inputs.diagnostics);
        inputs.loaded.push(area_map_path);
    }

    let area_config_path = input_dir.join(&files.area_config);
    match read_optional_json(&area_config_path)? {
        Some(configs) => {
            inputs.sources.area_configs =
                parse_area_configs(&configs, &files.area_config, &mut inputs.diagnostics);
            inputs.loaded.push(area_config_path);
        }
        None => {
            debug!("area configuration file absent, using embedded configuration");
            inputs.sources.area_configs = document.area_configs;
        }
    }

    let links_path = input_dir.join(&files.field_links);
    if let Some(links) = read_optional_json(&links_path)? {
        inputs.field_links = links;
        inputs.loaded.push(links_path);
    }

    let filters_path = input_dir.join(&files.filters);
    if let Some(filters) = read_optional_json(&filters_path)? {
        inputs.filters = filters;
        inputs.loaded.push(filters_path);
    }

    info!(
        form_id = %inputs.form_id,
        field_count = inputs.fields.len(),
        area_map_entries = inputs.sources.area_map.len(),
        area_configs = inputs.sources.area_configs.len(),
        label_mappings = inputs.sources.label_mappings.len(),
        documents = inputs.loaded.len(),
        "inputs loaded"
    );
    Ok(inputs)
}

/// Reads and decodes a JSON document.
pub fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`read_json`], returning `None` when the file does not exist.
pub fn read_optional_json(path: &Path) -> Result<Option<Value>> {
    if !path.is_file() {
        debug!(path = %path.display(), "optional document absent");
        return Ok(None);
    }
    read_json(path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn optional_document_absent() {
        let dir = TempDir::new().unwrap();
        assert!(
            read_optional_json(&dir.path().join("none.json"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn syntax_errors_are_fatal() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("area_map.json");
        fs::write(&path, "[{").unwrap();
        let error = read_optional_json(&path).unwrap_err();
        assert!(matches!(error, IngestError::Json { .. }));
    }
}
