//! Placement sources read from the input documents.

use serde::{Deserialize, Serialize};

use crate::value::{deserialize_lenient_i64, deserialize_lenient_string};

/// Sort number assumed for a configured field without one.
pub const DEFAULT_CONFIG_SORT_NUMBER: i64 = 999;
/// Column assumed when none is given.
pub const DEFAULT_COLUMN_NUMBER: i64 = 1;

/// Explicit placement keyed by field identifier (`area_map.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaMapEntry {
    pub field_id: String,
    /// Area title or identifier; unknown names fall back to area1.
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub sort_number: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_i64")]
    pub column_number: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub label: Option<String>,
}

/// One area of the label-based configuration (`area_data.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaConfig {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub area: Option<String>,
    #[serde(default)]
    pub fields: Vec<AreaConfigField>,
}

/// Field of an area configuration, matched by label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaConfigField {
    pub name: String,
    /// Per-field area override of the enclosing area.
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub area: Option<String>,
    #[serde(
        default,
        alias = "sortNumber",
        deserialize_with = "deserialize_lenient_i64"
    )]
    pub sort_number: Option<i64>,
    #[serde(
        default,
        rename = "columnNumber",
        alias = "column_number",
        deserialize_with = "deserialize_lenient_i64"
    )]
    pub column_number: Option<i64>,
}

/// Label rename (`{"ancien": ..., "nouveau": ...}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelMapping {
    #[serde(rename = "ancien")]
    pub old_label: String,
    #[serde(rename = "nouveau")]
    pub new_label: String,
}

/// Every placement source of a run, in one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacementSources {
    pub area_map: Vec<AreaMapEntry>,
    pub area_configs: Vec<AreaConfig>,
    pub label_mappings: Vec<LabelMapping>,
}
