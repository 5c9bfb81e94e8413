//! Lookup tables shared by the placement strategies.

use std::collections::BTreeMap;

use formgen_model::{
    Area, DEFAULT_COLUMN_NUMBER, DEFAULT_CONFIG_SORT_NUMBER, LayoutDiagnostic, PlacementSources,
};
use tracing::debug;

use crate::normalize::{area_or_default, normalize_label};

/// Sort number of an explicit entry that does not carry one.
pub const DEFAULT_EXPLICIT_SORT_NUMBER: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitEntry {
    pub area: Area,
    pub sort_number: i64,
    pub column_number: i64,
    pub label: Option<String>,
}

/// Area configuration entry keyed by its normalized name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: String,
    pub name: String,
    pub area: Area,
    pub sort_number: i64,
    pub column_number: i64,
}

/// Indexed view over the placement sources of one run.
#[derive(Debug, Clone, Default)]
pub struct PlacementContext {
    explicit: BTreeMap<String, ExplicitEntry>,
    config: Vec<ConfigEntry>,
    config_index: BTreeMap<String, usize>,
    renames: BTreeMap<String, String>,
}

impl PlacementContext {
    /// Indexes every source. Repeated keys within one source keep the last
    /// occurrence and yield a duplicate diagnostic.
    pub fn build(sources: &PlacementSources) -> (Self, Vec<LayoutDiagnostic>) {
        let mut context = Self::default();
        let mut diagnostics = Vec::new();

        for entry in &sources.area_map {
            let field_id = entry.field_id.trim();
            if field_id.is_empty() {
                diagnostics.push(LayoutDiagnostic::malformed(
                    "area map",
                    "entry without fieldId skipped",
                ));
                continue;
            }
            let explicit = ExplicitEntry {
                area: area_or_default(entry.area.as_deref()),
                sort_number: entry.sort_number.unwrap_or(DEFAULT_EXPLICIT_SORT_NUMBER),
                column_number: entry.column_number.unwrap_or(DEFAULT_COLUMN_NUMBER),
                label: entry
                    .label
                    .as_deref()
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .map(str::to_string),
            };
            if context
                .explicit
                .insert(field_id.to_string(), explicit)
                .is_some()
            {
                diagnostics.push(LayoutDiagnostic::duplicate(
                    field_id,
                    "area map lists the field more than once; last entry kept",
                ));
            }
        }

        for area_config in &sources.area_configs {
            let enclosing = area_config.area.as_deref();
            for field in &area_config.fields {
                let key = normalize_label(&field.name);
                if key.is_empty() {
                    continue;
                }
                let entry = ConfigEntry {
                    key: key.clone(),
                    name: field.name.trim().to_string(),
                    area: area_or_default(field.area.as_deref().or(enclosing)),
                    sort_number: field.sort_number.unwrap_or(DEFAULT_CONFIG_SORT_NUMBER),
                    column_number: field.column_number.unwrap_or(DEFAULT_COLUMN_NUMBER),
                };
                match context.config_index.get(&key) {
                    Some(&index) => {
                        diagnostics.push(LayoutDiagnostic::duplicate(
                            field.name.as_str(),
                            "area configuration names the label more than once; last entry kept",
                        ));
                        context.config[index] = entry;
                    }
                    None => {
                        context.config_index.insert(key, context.config.len());
                        context.config.push(entry);
                    }
                }
            }
        }

        for mapping in &sources.label_mappings {
            let old_key = normalize_label(&mapping.old_label);
            let new_key = normalize_label(&mapping.new_label);
            if old_key.is_empty() || new_key.is_empty() {
                continue;
            }
            if context.renames.insert(old_key, new_key).is_some() {
                diagnostics.push(LayoutDiagnostic::duplicate(
                    mapping.old_label.as_str(),
                    "label rename given more than once; last entry kept",
                ));
            }
        }

        debug!(
            explicit_entries = context.explicit.len(),
            config_entries = context.config.len(),
            renames = context.renames.len(),
            "placement context built"
        );
        (context, diagnostics)
    }

    pub fn explicit(&self, field_id: &str) -> Option<&ExplicitEntry> {
        self.explicit.get(field_id)
    }

    /// Exact lookup by normalized name.
    pub fn config_exact(&self, key: &str) -> Option<&ConfigEntry> {
        self.config_index.get(key).map(|&index| &self.config[index])
    }

    /// Configuration entries in configuration order.
    pub fn config_entries(&self) -> &[ConfigEntry] {
        &self.config
    }

    /// Normalized target label of a rename, by normalized source label.
    pub fn renamed(&self, key: &str) -> Option<&str> {
        self.renames.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_model::{AreaConfig, AreaConfigField, AreaMapEntry, DiagnosticKind, LabelMapping};

    fn config_field(name: &str, sort: Option<i64>) -> AreaConfigField {
        AreaConfigField {
            name: name.to_string(),
            area: None,
            sort_number: sort,
            column_number: None,
        }
    }

    #[test]
    fn config_defaults_and_area_override() {
        let sources = PlacementSources {
            area_configs: vec![AreaConfig {
                area: Some("Critères avancés".to_string()),
                fields: vec![
                    config_field("Date de début", None),
                    AreaConfigField {
                        area: Some("area3".to_string()),
                        ..config_field("Portefeuille", Some(4))
                    },
                ],
            }],
            ..PlacementSources::default()
        };
        let (context, diagnostics) = PlacementContext::build(&sources);
        assert!(diagnostics.is_empty());
        let date = context.config_exact("date de debut").unwrap();
        assert_eq!(date.area, Area::Area2);
        assert_eq!(date.sort_number, DEFAULT_CONFIG_SORT_NUMBER);
        assert_eq!(date.column_number, DEFAULT_COLUMN_NUMBER);
        assert_eq!(context.config_exact("portefeuille").unwrap().area, Area::Area3);
    }

    #[test]
    fn duplicates_keep_last_entry() {
        let entry = |sort: i64| AreaMapEntry {
            field_id: "xceopt".to_string(),
            area: Some("area2".to_string()),
            sort_number: Some(sort),
            column_number: None,
            label: Some("  ".to_string()),
        };
        let sources = PlacementSources {
            area_map: vec![entry(1), entry(7)],
            label_mappings: vec![
                LabelMapping {
                    old_label: "Ancien".to_string(),
                    new_label: "Premier".to_string(),
                },
                LabelMapping {
                    old_label: "ancien".to_string(),
                    new_label: "Second".to_string(),
                },
            ],
            ..PlacementSources::default()
        };
        let (context, diagnostics) = PlacementContext::build(&sources);
        let explicit = context.explicit("xceopt").unwrap();
        assert_eq!(explicit.sort_number, 7);
        assert_eq!(explicit.label, None);
        assert_eq!(context.renamed("ancien"), Some("second"));
        assert_eq!(diagnostics.len(), 2);
        assert!(
            diagnostics
                .iter()
                .all(|d| d.kind == DiagnosticKind::DuplicateEntry)
        );
    }
}
