//! Field definitions as read from the upstream form description.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::value::{
    deserialize_lenient_bool, deserialize_lenient_i64, deserialize_lenient_string,
    deserialize_lenient_vec, lenient_string,
};

/// Display type tag of a field.
///
/// Unknown tags are kept verbatim so they round-trip into the generated XML.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Nature {
    #[default]
    String,
    Date,
    Lov,
    Checkbox,
    DualField,
    Fk,
    Other(String),
}

impl Nature {
    pub fn as_str(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Date => "date",
            Self::Lov => "lov",
            Self::Checkbox => "checkbox",
            Self::DualField => "dualfield",
            Self::Fk => "fk",
            Self::Other(tag) => tag.as_str(),
        }
    }

    pub fn is_lov(&self) -> bool {
        matches!(self, Self::Lov)
    }
}

impl From<String> for Nature {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "string" => Self::String,
            "date" => Self::Date,
            "lov" => Self::Lov,
            "checkbox" => Self::Checkbox,
            "dualfield" => Self::DualField,
            "fk" => Self::Fk,
            _ => Self::Other(raw.trim().to_string()),
        }
    }
}

impl From<&str> for Nature {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<Nature> for String {
    fn from(nature: Nature) -> Self {
        nature.as_str().to_string()
    }
}

impl fmt::Display for Nature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation control attached to a field (e.g. `mandatory`/`MANDATORY`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    pub nature: String,
}

impl Control {
    pub fn mandatory() -> Self {
        Self {
            id: "mandatory".to_string(),
            nature: "MANDATORY".to_string(),
        }
    }
}

/// LOV query filter: the field is queried by the value of `field_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filter {
    pub id: String,
    pub field_id: String,
}

impl Filter {
    /// Filter whose id and target field are the same identifier.
    pub fn on_field(field_id: impl Into<String>) -> Self {
        let field_id = field_id.into();
        Self {
            id: field_id.clone(),
            field_id,
        }
    }
}

/// One field of a form, as described upstream.
///
/// The identifier is the key of the field in the upstream object, so it is
/// not part of the JSON body and is filled in by the loader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldDefinition {
    #[serde(skip)]
    pub id: String,
    #[serde(deserialize_with = "deserialize_lenient_nature")]
    pub nature: Nature,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub label: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub label1: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub label2: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub default_value: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_i64")]
    pub max_length: Option<i64>,
    #[serde(deserialize_with = "deserialize_lenient_bool")]
    pub read_only: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient_bool")]
    pub hidden: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub lov: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub value_field: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub display_template: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub function_id: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_string")]
    pub fk_search_field: Option<String>,
    #[serde(deserialize_with = "deserialize_lenient_bool")]
    pub clear_value_if_not_in_store: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient_bool")]
    pub set_with_values_list: Option<bool>,
    #[serde(deserialize_with = "deserialize_lenient_vec")]
    pub controls: Vec<Control>,
    #[serde(deserialize_with = "deserialize_lenient_vec")]
    pub filters: Vec<Filter>,
}

/// Missing, null and non-scalar natures fall back to `string`.
fn deserialize_lenient_nature<'de, D>(deserializer: D) -> Result<Nature, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(lenient_string)
        .filter(|tag| !tag.trim().is_empty())
        .map(Nature::from)
        .unwrap_or_default())
}

impl FieldDefinition {
    pub fn new(id: impl Into<String>, nature: Nature) -> Self {
        Self {
            id: id.into(),
            nature,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Labels in matching priority order: `label2`, `label1`, `label`.
    ///
    /// Blank labels are skipped.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        [&self.label2, &self.label1, &self.label]
            .into_iter()
            .filter_map(|label| label.as_deref())
            .filter(|label| !label.trim().is_empty())
    }

    /// A field filled from a values list is rendered as a LOV whatever its
    /// declared nature. Returns true when the nature changed.
    pub fn promote_values_list(&mut self) -> bool {
        if self.set_with_values_list == Some(true) && !self.nature.is_lov() {
            self.nature = Nature::Lov;
            return true;
        }
        false
    }

    /// Highest-priority non-blank label, if any.
    pub fn preferred_label(&self) -> Option<&str> {
        self.labels().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nature_keeps_unknown_tags() {
        assert_eq!(Nature::from("LOV"), Nature::Lov);
        assert_eq!(Nature::from("dualField"), Nature::DualField);
        assert_eq!(
            Nature::from("LdsComboBox"),
            Nature::Other("LdsComboBox".to_string())
        );
        assert_eq!(Nature::from("LdsComboBox").as_str(), "LdsComboBox");
    }

    #[test]
    fn field_accepts_string_encoded_scalars() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "nature": "lov",
            "label": "Code",
            "maxLength": "12",
            "readOnly": "true",
            "hidden": false,
            "defaultValue": 3,
            "unknownKey": {"nested": true}
        }))
        .unwrap();
        assert_eq!(field.nature, Nature::Lov);
        assert_eq!(field.max_length, Some(12));
        assert_eq!(field.read_only, Some(true));
        assert_eq!(field.hidden, Some(false));
        assert_eq!(field.default_value.as_deref(), Some("3"));
    }

    #[test]
    fn label_priority_skips_blank_labels() {
        let field = FieldDefinition {
            label: Some("base".to_string()),
            label1: Some("first".to_string()),
            label2: Some("  ".to_string()),
            ..FieldDefinition::default()
        };
        let labels: Vec<&str> = field.labels().collect();
        assert_eq!(labels, vec!["first", "base"]);
        assert_eq!(field.preferred_label(), Some("first"));
    }

    #[test]
    fn misshapen_nature_and_lists_fall_back() {
        let field: FieldDefinition = serde_json::from_value(json!({
            "nature": null,
            "label": "Code",
            "controls": null,
            "filters": [{"id": "xceopt", "fieldId": "xceopt"}, 4]
        }))
        .unwrap();
        assert_eq!(field.nature, Nature::String);
        assert!(field.controls.is_empty());
        assert_eq!(field.filters.len(), 1);

        let field: FieldDefinition =
            serde_json::from_value(json!({"nature": ["lov"], "controls": "mandatory"})).unwrap();
        assert_eq!(field.nature, Nature::String);
        assert!(field.controls.is_empty());
    }

    #[test]
    fn values_list_fields_become_lov() {
        let mut field: FieldDefinition =
            serde_json::from_value(json!({"nature": "string", "setWithValuesList": "true"}))
                .unwrap();
        assert!(field.promote_values_list());
        assert_eq!(field.nature, Nature::Lov);
        assert!(!field.promote_values_list());

        let mut plain = FieldDefinition::new("xceopt", Nature::Date);
        plain.set_with_values_list = Some(false);
        assert!(!plain.promote_values_list());
        assert_eq!(plain.nature, Nature::Date);
    }
}
