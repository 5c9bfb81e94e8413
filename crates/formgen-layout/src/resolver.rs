//! Area assignment: one authoritative placement per field.

use std::collections::BTreeSet;

use formgen_model::{
    ActivatedPanel, Area, AreaPlacement, DEFAULT_COLUMN_NUMBER, FieldDefinition, LayoutDiagnostic,
    PlacementOrigin, PlacementSources, ResolvedField, ResolvedLayout,
};
use tracing::{debug, info, info_span};

use crate::context::PlacementContext;
use crate::panels::{StaticPanel, StaticPanelCatalog};
use crate::strategy::{Placement, PlacementStrategy, default_chain};

/// Area1 anchor used when no explicit area1 placement exists.
pub const DEFAULT_AREA1_ANCHOR: i64 = 10;
/// Gap between consecutive area1 sort numbers.
pub const SORT_STEP: i64 = 10;

pub struct AreaResolver {
    catalog: StaticPanelCatalog,
    strategies: Vec<Box<dyn PlacementStrategy>>,
}

impl Default for AreaResolver {
    fn default() -> Self {
        Self::new(StaticPanelCatalog::builtin())
    }
}

impl AreaResolver {
    pub fn new(catalog: StaticPanelCatalog) -> Self {
        Self {
            catalog,
            strategies: default_chain(),
        }
    }

    pub fn catalog(&self) -> &StaticPanelCatalog {
        &self.catalog
    }

    /// Resolves every raw field, then merges the activated static panels.
    ///
    /// Panels are triggered by the ids of `fields`. Use
    /// [`resolve_with_triggers`](Self::resolve_with_triggers) when the form
    /// has keys that did not produce a field.
    pub fn resolve(
        &self,
        form_id: &str,
        fields: &[FieldDefinition],
        sources: &PlacementSources,
    ) -> ResolvedLayout {
        self.resolve_with_triggers(
            form_id,
            fields,
            fields.iter().map(|field| field.id.as_str()),
            sources,
        )
    }

    /// Resolves every raw field, activating the panels whose id is among
    /// `trigger_keys`.
    ///
    /// Raw fields replaced by a panel field are dropped from the raw part of
    /// the output; the panel definition takes their place.
    pub fn resolve_with_triggers<'a>(
        &self,
        form_id: &str,
        fields: &[FieldDefinition],
        trigger_keys: impl IntoIterator<Item = &'a str>,
        sources: &PlacementSources,
    ) -> ResolvedLayout {
        let span = info_span!("resolve", form_id = %form_id);
        let _guard = span.enter();

        let (context, mut diagnostics) = PlacementContext::build(sources);
        let panels = self.catalog.panels_defined_for(trigger_keys);
        let overridden: BTreeSet<&str> = panels
            .iter()
            .copied()
            .flat_map(StaticPanel::field_ids)
            .collect();

        let mut decided = Vec::with_capacity(fields.len());
        for field in fields {
            if overridden.contains(field.id.as_str()) {
                diagnostics.push(LayoutDiagnostic::panel_override(
                    field.id.as_str(),
                    "raw definition replaced by the static panel field",
                ));
                continue;
            }
            decided.push((field, self.place(field, &context)));
        }

        let anchor = decided
            .iter()
            .filter_map(|(_, placement)| placement.as_ref())
            .filter(|placement| {
                placement.origin == PlacementOrigin::Explicit && placement.area == Area::Area1
            })
            .map(|placement| placement.sort_number)
            .min()
            .unwrap_or(DEFAULT_AREA1_ANCHOR);
        let highest = decided
            .iter()
            .filter_map(|(_, placement)| placement.as_ref())
            .filter(|placement| placement.area == Area::Area1)
            .map(|placement| placement.sort_number)
            .max();
        let first_default = first_default_sort_number(anchor, highest);

        let (_, mut resolved) = decided.into_iter().fold(
            (first_default, Vec::with_capacity(fields.len())),
            |(next, mut acc), (field, placement)| {
                let (placement, next) = match placement {
                    Some(placement) => (placement, next),
                    None => (default_placement(next), next.saturating_add(SORT_STEP)),
                };
                acc.push(resolved_field(field, placement));
                (next, acc)
            },
        );

        let mut activated_panels = Vec::with_capacity(panels.len());
        for panel in panels {
            debug!(
                panel = %panel.id,
                area = %panel.area,
                field_count = panel.fields.len(),
                "static panel activated"
            );
            resolved.extend(panel.resolved_fields());
            activated_panels.push(ActivatedPanel {
                id: panel.id.clone(),
                area: panel.area,
            });
        }

        info!(
            field_count = resolved.len(),
            panel_count = activated_panels.len(),
            default_count = resolved
                .iter()
                .filter(|field| field.placement.origin == PlacementOrigin::Default)
                .count(),
            diagnostic_count = diagnostics.len(),
            "fields resolved"
        );

        ResolvedLayout {
            form_id: form_id.to_string(),
            fields: resolved,
            activated_panels,
            diagnostics,
        }
    }

    fn place(&self, field: &FieldDefinition, context: &PlacementContext) -> Option<Placement> {
        let placement = self
            .strategies
            .iter()
            .find_map(|strategy| strategy.place(field, context));
        match &placement {
            Some(placement) => debug!(
                field_id = %field.id,
                origin = %placement.origin,
                area = %placement.area,
                sort_number = placement.sort_number,
                column_number = placement.column_number,
                "field placed"
            ),
            None => debug!(field_id = %field.id, "no placement rule matched"),
        }
        placement
    }
}

/// Resolves with the built-in panel catalog and strategy chain.
pub fn resolve_layout(
    form_id: &str,
    fields: &[FieldDefinition],
    sources: &PlacementSources,
) -> ResolvedLayout {
    AreaResolver::default().resolve(form_id, fields, sources)
}

/// Smallest `anchor + SORT_STEP * k` (k >= 1) above every area1 sort number
/// already placed. Saturates at `i64::MAX`.
fn first_default_sort_number(anchor: i64, highest: Option<i64>) -> i64 {
    let steps = match highest {
        Some(highest) if highest >= anchor => {
            (i128::from(highest) - i128::from(anchor)).div_euclid(i128::from(SORT_STEP)) + 1
        }
        _ => 1,
    };
    let sort_number = i128::from(anchor) + i128::from(SORT_STEP) * steps;
    i64::try_from(sort_number).unwrap_or(i64::MAX)
}

fn default_placement(sort_number: i64) -> Placement {
    Placement {
        area: Area::Area1,
        sort_number,
        column_number: DEFAULT_COLUMN_NUMBER,
        origin: PlacementOrigin::Default,
        label: None,
    }
}

fn resolved_field(field: &FieldDefinition, placement: Placement) -> ResolvedField {
    let label = placement
        .label
        .clone()
        .or_else(|| field.preferred_label().map(|label| label.trim().to_string()))
        .unwrap_or_else(|| field.id.clone());
    ResolvedField {
        definition: field.clone(),
        placement: AreaPlacement {
            field_id: field.id.clone(),
            area: placement.area,
            sort_number: placement.sort_number,
            column_number: placement.column_number,
            origin: placement.origin,
        },
        label,
        is_static_panel: false,
    }
}
