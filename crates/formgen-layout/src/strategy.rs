//! Placement strategies, tried in precedence order by the resolver.

use formgen_model::{Area, FieldDefinition, PlacementOrigin};

use crate::context::{ConfigEntry, PlacementContext};
use crate::normalize::normalize_label;

/// Placement proposed by a strategy, before the field id is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub area: Area,
    pub sort_number: i64,
    pub column_number: i64,
    pub origin: PlacementOrigin,
    /// Display label carried by the matched source, if any.
    pub label: Option<String>,
}

impl Placement {
    fn from_config(entry: &ConfigEntry, origin: PlacementOrigin) -> Self {
        Self {
            area: entry.area,
            sort_number: entry.sort_number,
            column_number: entry.column_number,
            origin,
            label: Some(entry.name.clone()),
        }
    }
}

/// One rule of the resolver chain. Strategies are pure: the same field and
/// context always give the same answer.
pub trait PlacementStrategy {
    fn origin(&self) -> PlacementOrigin;

    fn place(&self, field: &FieldDefinition, context: &PlacementContext) -> Option<Placement>;
}

/// Normalized non-empty labels of a field, label2 first.
pub fn label_keys(field: &FieldDefinition) -> Vec<String> {
    field
        .labels()
        .map(normalize_label)
        .filter(|key| !key.is_empty())
        .collect()
}

/// Entry of the field-id keyed area map.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitAreaMap;

impl PlacementStrategy for ExplicitAreaMap {
    fn origin(&self) -> PlacementOrigin {
        PlacementOrigin::Explicit
    }

    fn place(&self, field: &FieldDefinition, context: &PlacementContext) -> Option<Placement> {
        context.explicit(&field.id).map(|entry| Placement {
            area: entry.area,
            sort_number: entry.sort_number,
            column_number: entry.column_number,
            origin: self.origin(),
            label: entry.label.clone(),
        })
    }
}

/// Exact normalized label match against the area configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactLabel;

impl PlacementStrategy for ExactLabel {
    fn origin(&self) -> PlacementOrigin {
        PlacementOrigin::LabelConfig
    }

    fn place(&self, field: &FieldDefinition, context: &PlacementContext) -> Option<Placement> {
        label_keys(field)
            .iter()
            .find_map(|key| context.config_exact(key))
            .map(|entry| Placement::from_config(entry, self.origin()))
    }
}

/// Label looked up in the rename table, then matched exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenamedLabel;

impl PlacementStrategy for RenamedLabel {
    fn origin(&self) -> PlacementOrigin {
        PlacementOrigin::RenamedLabel
    }

    fn place(&self, field: &FieldDefinition, context: &PlacementContext) -> Option<Placement> {
        label_keys(field)
            .iter()
            .filter_map(|key| context.renamed(key))
            .find_map(|renamed| context.config_exact(renamed))
            .map(|entry| Placement::from_config(entry, self.origin()))
    }
}

/// Substring containment in either direction. Labels are tried in priority
/// order, configuration entries in configuration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelContainment;

impl PlacementStrategy for LabelContainment {
    fn origin(&self) -> PlacementOrigin {
        PlacementOrigin::LabelContainment
    }

    fn place(&self, field: &FieldDefinition, context: &PlacementContext) -> Option<Placement> {
        label_keys(field)
            .iter()
            .find_map(|key| {
                context.config_entries().iter().find(|entry| {
                    entry.key.contains(key.as_str()) || key.contains(entry.key.as_str())
                })
            })
            .map(|entry| Placement::from_config(entry, self.origin()))
    }
}

/// The standard chain: explicit map, exact label, rename, containment.
pub fn default_chain() -> Vec<Box<dyn PlacementStrategy>> {
    vec![
        Box::new(ExplicitAreaMap),
        Box::new(ExactLabel),
        Box::new(RenamedLabel),
        Box::new(LabelContainment),
    ]
}
