//! LOV filter dependencies from the parsed query parameter list.

use std::collections::BTreeMap;

use formgen_model::value::lenient_string;
use formgen_model::{Filter, FilterDependency, LayoutDiagnostic, ResolvedLayout};
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub dependencies: Vec<FilterDependency>,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

impl FilterSet {
    pub fn get(&self, field_id: &str) -> Option<&FilterDependency> {
        self.dependencies
            .iter()
            .find(|dependency| dependency.field_id == field_id)
    }
}

/// Reads `[{champ, parametres: [...]}]`.
///
/// Parameters lose their surrounding quotes and empty ones are dropped.
/// A field listed twice keeps its last entry.
pub fn build_filter_dependencies(document: &Value) -> FilterSet {
    let mut set = FilterSet::default();
    let entries = match document {
        Value::Null => return set,
        Value::Array(entries) => entries,
        _ => {
            set.diagnostics.push(LayoutDiagnostic::malformed(
                "parsed_result",
                "filter document is not an array",
            ));
            return set;
        }
    };

    let mut by_field: BTreeMap<String, usize> = BTreeMap::new();
    for (index, entry) in entries.iter().enumerate() {
        let subject = format!("parsed_result [{index}]");
        let Some(map) = entry.as_object() else {
            warn!(record = %subject, "filter entry is not an object");
            set.diagnostics
                .push(LayoutDiagnostic::malformed(subject, "entry is not an object"));
            continue;
        };
        let Some(field_id) = map
            .get("champ")
            .and_then(lenient_string)
            .map(|champ| champ.trim().to_string())
            .filter(|champ| !champ.is_empty())
        else {
            warn!(record = %subject, "filter entry without champ");
            set.diagnostics
                .push(LayoutDiagnostic::malformed(subject, "missing champ"));
            continue;
        };
        let Some(Value::Array(parameters)) = map.get("parametres") else {
            warn!(record = %subject, field_id = %field_id, "filter entry without parametres");
            set.diagnostics.push(LayoutDiagnostic::malformed(
                subject,
                "parametres is missing or not an array",
            ));
            continue;
        };
        let depends_on: Vec<String> = parameters
            .iter()
            .filter_map(lenient_string)
            .map(|parameter| strip_quotes(&parameter))
            .filter(|parameter| !parameter.is_empty())
            .collect();

        let dependency = FilterDependency {
            field_id: field_id.clone(),
            depends_on,
        };
        match by_field.get(&field_id) {
            Some(&position) => {
                set.diagnostics.push(LayoutDiagnostic::duplicate(
                    field_id.as_str(),
                    "filter parameters given more than once; last entry kept",
                ));
                set.dependencies[position] = dependency;
            }
            None => {
                by_field.insert(field_id, set.dependencies.len());
                set.dependencies.push(dependency);
            }
        }
    }
    set
}

fn strip_quotes(raw: &str) -> String {
    raw.trim()
        .trim_matches(|ch: char| ch == '\'' || ch == '"')
        .trim()
        .to_string()
}

/// Attaches filters to `lov` fields that do not carry any yet.
///
/// Returns the number of fields that received filters.
pub fn apply_filters(layout: &mut ResolvedLayout, filters: &FilterSet) -> usize {
    let mut applied = 0;
    for field in &mut layout.fields {
        let definition = &mut field.definition;
        if !definition.nature.is_lov() || !definition.filters.is_empty() {
            continue;
        }
        let Some(dependency) = filters.get(&definition.id) else {
            continue;
        };
        if dependency.depends_on.is_empty() {
            continue;
        }
        definition.filters = dependency
            .depends_on
            .iter()
            .map(|field_id| Filter::on_field(field_id.as_str()))
            .collect();
        debug!(
            field_id = %definition.id,
            filter_count = definition.filters.len(),
            "filters attached"
        );
        applied += 1;
    }
    info!(applied, "lov filters applied");
    applied
}
