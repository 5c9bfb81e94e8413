//! Resolved and grouped layout models.

use serde::{Deserialize, Serialize};

use crate::area::{Area, AreaPlacement, PlacementOrigin};
use crate::diagnostics::LayoutDiagnostic;
use crate::field::FieldDefinition;

/// A field with its authoritative placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedField {
    pub definition: FieldDefinition,
    pub placement: AreaPlacement,
    /// Display label; never blank.
    pub label: String,
    pub is_static_panel: bool,
}

impl ResolvedField {
    pub fn id(&self) -> &str {
        &self.placement.field_id
    }
}

/// Static panel activated by its trigger key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedPanel {
    pub id: String,
    pub area: Area,
}

/// Output of the area assignment resolver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResolvedLayout {
    pub form_id: String,
    /// Raw fields in input order, then static panel fields in catalog order.
    pub fields: Vec<ResolvedField>,
    pub activated_panels: Vec<ActivatedPanel>,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

impl ResolvedLayout {
    pub fn field(&self, field_id: &str) -> Option<&ResolvedField> {
        self.fields.iter().find(|field| field.id() == field_id)
    }

    pub fn placement(&self, field_id: &str) -> Option<&AreaPlacement> {
        self.field(field_id).map(|field| &field.placement)
    }

    pub fn contains(&self, field_id: &str) -> bool {
        self.field(field_id).is_some()
    }
}

/// A field ready for rendering: corrected position and normalized flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutField {
    pub definition: FieldDefinition,
    pub area: Area,
    pub sort_number: i64,
    pub column_number: i64,
    pub origin: PlacementOrigin,
    pub label: String,
    pub read_only: bool,
    pub hidden: bool,
    pub is_static_panel: bool,
}

impl LayoutField {
    pub fn id(&self) -> &str {
        &self.definition.id
    }
}

/// Ordered fields of one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaLayout {
    pub area: Area,
    pub fields: Vec<LayoutField>,
}

impl AreaLayout {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn field_ids(&self) -> Vec<&str> {
        self.fields.iter().map(LayoutField::id).collect()
    }

    /// Number of fields placed with any of `origins`.
    pub fn count_by_origin(&self, origins: &[PlacementOrigin]) -> usize {
        self.fields
            .iter()
            .filter(|field| origins.contains(&field.origin))
            .count()
    }
}

/// Output of the grouper: one ordered sequence per area, area1 first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedLayout {
    pub form_id: String,
    pub areas: Vec<AreaLayout>,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

impl GroupedLayout {
    pub fn area(&self, area: Area) -> Option<&AreaLayout> {
        self.areas.iter().find(|layout| layout.area == area)
    }

    pub fn field_count(&self) -> usize {
        self.areas.iter().map(|layout| layout.fields.len()).sum()
    }

    pub fn fields(&self) -> impl Iterator<Item = &LayoutField> {
        self.areas.iter().flat_map(|layout| layout.fields.iter())
    }

    pub fn non_empty_areas(&self) -> impl Iterator<Item = &AreaLayout> {
        self.areas.iter().filter(|layout| !layout.is_empty())
    }
}
