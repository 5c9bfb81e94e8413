//! Grouping of resolved fields into ordered area sequences.

use std::collections::BTreeSet;

use formgen_model::{
    Area, AreaLayout, GroupedLayout, LayoutDiagnostic, LayoutField, PlacementOrigin,
    ResolvedField, ResolvedLayout,
};
use tracing::{debug, info, info_span, warn};

use crate::resolver::{DEFAULT_AREA1_ANCHOR, SORT_STEP};

/// Buckets fields by area and orders each bucket.
///
/// Area1 sort numbers are rewritten to an evenly spaced sequence starting at
/// the anchor. In area2 and area3 static panel positions are fixed and other
/// fields move down until their (sort, column) pair is free.
pub fn group_layout(resolved: &ResolvedLayout) -> GroupedLayout {
    let span = info_span!("group", form_id = %resolved.form_id);
    let _guard = span.enter();

    let mut diagnostics = resolved.diagnostics.clone();
    let areas: Vec<AreaLayout> = Area::ALL
        .into_iter()
        .map(|area| {
            let mut bucket: Vec<&ResolvedField> = resolved
                .fields
                .iter()
                .filter(|field| field.placement.area == area)
                .collect();
            bucket.sort_by(|a, b| a.placement.order_key().cmp(&b.placement.order_key()));
            let fields = match area {
                Area::Area1 => correct_area1(&bucket, &mut diagnostics),
                Area::Area2 | Area::Area3 => resolve_collisions(&bucket, &mut diagnostics),
            };
            debug!(area = %area, field_count = fields.len(), "area grouped");
            AreaLayout { area, fields }
        })
        .collect();

    for panel in &resolved.activated_panels {
        let empty = areas
            .iter()
            .find(|layout| layout.area == panel.area)
            .is_none_or(AreaLayout::is_empty);
        if empty {
            warn!(panel = %panel.id, area = %panel.area, "activated panel area is empty");
            diagnostics.push(LayoutDiagnostic::empty_area(
                panel.area.as_str(),
                format!("{} is activated but {} has no fields", panel.id, panel.area),
            ));
        }
    }

    let grouped = GroupedLayout {
        form_id: resolved.form_id.clone(),
        areas,
        diagnostics,
    };
    info!(
        area1 = area_len(&grouped, Area::Area1),
        area2 = area_len(&grouped, Area::Area2),
        area3 = area_len(&grouped, Area::Area3),
        "layout grouped"
    );
    grouped
}

fn area_len(grouped: &GroupedLayout, area: Area) -> usize {
    grouped.area(area).map_or(0, |layout| layout.fields.len())
}

fn correct_area1(
    bucket: &[&ResolvedField],
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Vec<LayoutField> {
    let anchor = match bucket.first() {
        Some(first) if first.placement.origin == PlacementOrigin::Explicit => {
            first.placement.sort_number
        }
        _ => DEFAULT_AREA1_ANCHOR,
    };
    bucket
        .iter()
        .fold(
            (Some(anchor), Vec::with_capacity(bucket.len())),
            |(sort_number, mut acc), field| {
                let assigned = sort_number.unwrap_or_else(|| {
                    warn!(field_id = %field.id(), "area1 sort numbers exhausted");
                    diagnostics.push(LayoutDiagnostic::sort_overflow(
                        field.id(),
                        "no area1 sort number left after the anchor, using the maximum",
                    ));
                    i64::MAX
                });
                acc.push(layout_field(field, assigned));
                (assigned.checked_add(SORT_STEP), acc)
            },
        )
        .1
}

fn resolve_collisions(
    bucket: &[&ResolvedField],
    diagnostics: &mut Vec<LayoutDiagnostic>,
) -> Vec<LayoutField> {
    let reserved: BTreeSet<(i64, i64)> = bucket
        .iter()
        .filter(|field| field.is_static_panel)
        .map(|field| (field.placement.sort_number, field.placement.column_number))
        .collect();
    let (_, mut fields) = bucket.iter().fold(
        (reserved, Vec::with_capacity(bucket.len())),
        |(mut taken, mut acc), field| {
            let column = field.placement.column_number;
            let mut sort_number = field.placement.sort_number;
            if !field.is_static_panel {
                while taken.contains(&(sort_number, column)) {
                    let Some(next) = sort_number.checked_add(1) else {
                        warn!(field_id = %field.id(), column, "no free sort number left");
                        diagnostics.push(LayoutDiagnostic::sort_overflow(
                            field.id(),
                            format!("no free sort number in column {column}, position shared"),
                        ));
                        break;
                    };
                    sort_number = next;
                }
                if sort_number != field.placement.sort_number {
                    debug!(
                        field_id = %field.id(),
                        from = field.placement.sort_number,
                        to = sort_number,
                        "sort number moved off an occupied position"
                    );
                }
                taken.insert((sort_number, column));
            }
            acc.push(layout_field(field, sort_number));
            (taken, acc)
        },
    );
    fields.sort_by(|a, b| {
        (a.sort_number, a.column_number, a.id()).cmp(&(b.sort_number, b.column_number, b.id()))
    });
    fields
}

fn layout_field(field: &ResolvedField, sort_number: i64) -> LayoutField {
    let read_only = if field.is_static_panel {
        field.definition.read_only.unwrap_or(false)
    } else {
        false
    };
    LayoutField {
        definition: field.definition.clone(),
        area: field.placement.area,
        sort_number,
        column_number: field.placement.column_number,
        origin: field.placement.origin,
        label: field.label.clone(),
        read_only,
        hidden: field.definition.hidden.unwrap_or(false),
        is_static_panel: field.is_static_panel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgen_model::{AreaPlacement, FieldDefinition, Nature};

    fn field(id: &str, area: Area, sort: i64, col: i64, origin: PlacementOrigin) -> ResolvedField {
        let mut definition = FieldDefinition::new(id, Nature::String);
        definition.read_only = Some(true);
        ResolvedField {
            definition,
            placement: AreaPlacement {
                field_id: id.to_string(),
                area,
                sort_number: sort,
                column_number: col,
                origin,
            },
            label: id.to_string(),
            is_static_panel: origin == PlacementOrigin::StaticPanel,
        }
    }

    fn layout(fields: Vec<ResolvedField>) -> ResolvedLayout {
        ResolvedLayout {
            form_id: "aini".to_string(),
            fields,
            ..ResolvedLayout::default()
        }
    }

    #[test]
    fn area1_reanchors_on_explicit_first_field() {
        let grouped = group_layout(&layout(vec![
            field("b", Area::Area1, 40, 1, PlacementOrigin::LabelConfig),
            field("a", Area::Area1, 5, 1, PlacementOrigin::Explicit),
            field("c", Area::Area1, 40, 2, PlacementOrigin::Default),
        ]));
        let area1 = grouped.area(Area::Area1).unwrap();
        let sorts: Vec<(&str, i64)> = area1
            .fields
            .iter()
            .map(|f| (f.id(), f.sort_number))
            .collect();
        assert_eq!(sorts, vec![("a", 5), ("b", 15), ("c", 25)]);
    }

    #[test]
    fn area1_anchor_defaults_to_ten() {
        let grouped = group_layout(&layout(vec![
            field("x", Area::Area1, 999, 1, PlacementOrigin::LabelConfig),
            field("y", Area::Area1, 3, 1, PlacementOrigin::LabelContainment),
        ]));
        let sorts: Vec<i64> = grouped.fields().map(|f| f.sort_number).collect();
        assert_eq!(sorts, vec![10, 20]);
    }

    #[test]
    fn area1_anchor_ignores_sort_of_non_explicit_first_field() {
        let grouped = group_layout(&layout(vec![
            field("x", Area::Area1, 3, 1, PlacementOrigin::LabelConfig),
            field("y", Area::Area1, 20, 1, PlacementOrigin::Default),
            field("z", Area::Area1, 30, 1, PlacementOrigin::Default),
        ]));
        let sorts: Vec<(&str, i64)> = grouped.fields().map(|f| (f.id(), f.sort_number)).collect();
        assert_eq!(sorts, vec![("x", 10), ("y", 20), ("z", 30)]);
    }

    #[test]
    fn area1_sequence_stops_at_i64_max() {
        let grouped = group_layout(&layout(vec![
            field("a", Area::Area1, i64::MAX - 5, 1, PlacementOrigin::Explicit),
            field("b", Area::Area1, i64::MAX, 1, PlacementOrigin::Default),
        ]));
        let sorts: Vec<i64> = grouped.fields().map(|f| f.sort_number).collect();
        assert_eq!(sorts, vec![i64::MAX - 5, i64::MAX]);
        assert_eq!(grouped.diagnostics.len(), 1);
        assert_eq!(grouped.diagnostics[0].subject, "b");
        assert_eq!(
            grouped.diagnostics[0].kind,
            formgen_model::DiagnosticKind::SortOverflow
        );
    }

    #[test]
    fn collision_at_i64_max_keeps_position() {
        let grouped = group_layout(&layout(vec![
            field("riddev", Area::Area3, i64::MAX, 1, PlacementOrigin::StaticPanel),
            field("raw", Area::Area3, i64::MAX, 1, PlacementOrigin::Explicit),
        ]));
        let area3 = grouped.area(Area::Area3).unwrap();
        let positions: Vec<(&str, i64)> = area3
            .fields
            .iter()
            .map(|f| (f.id(), f.sort_number))
            .collect();
        assert_eq!(positions, vec![("raw", i64::MAX), ("riddev", i64::MAX)]);
        assert_eq!(grouped.diagnostics.len(), 1);
        assert_eq!(
            grouped.diagnostics[0].kind,
            formgen_model::DiagnosticKind::SortOverflow
        );
    }

    #[test]
    fn static_positions_win_collisions() {
        let grouped = group_layout(&layout(vec![
            field("raw", Area::Area3, 1, 1, PlacementOrigin::LabelConfig),
            field("riddev", Area::Area3, 1, 1, PlacementOrigin::StaticPanel),
            field("acetdev", Area::Area3, 2, 1, PlacementOrigin::StaticPanel),
        ]));
        let area3 = grouped.area(Area::Area3).unwrap();
        let positions: Vec<(&str, i64, i64)> = area3
            .fields
            .iter()
            .map(|f| (f.id(), f.sort_number, f.column_number))
            .collect();
        assert_eq!(
            positions,
            vec![("riddev", 1, 1), ("acetdev", 2, 1), ("raw", 3, 1)]
        );
    }

    #[test]
    fn read_only_is_forced_off_except_for_panels() {
        let mut panel = field("adtchgo", Area::Area3, 1, 2, PlacementOrigin::StaticPanel);
        panel.definition.read_only = Some(true);
        let grouped = group_layout(&layout(vec![
            field("raw", Area::Area2, 1, 1, PlacementOrigin::Explicit),
            panel,
        ]));
        let flags: Vec<(&str, bool)> = grouped.fields().map(|f| (f.id(), f.read_only)).collect();
        assert_eq!(flags, vec![("raw", false), ("adtchgo", true)]);
    }

    #[test]
    fn empty_panel_area_is_reported() {
        let mut resolved = layout(vec![field("a", Area::Area1, 1, 1, PlacementOrigin::Explicit)]);
        resolved.activated_panels.push(formgen_model::ActivatedPanel {
            id: "emptyPanel".to_string(),
            area: Area::Area3,
        });
        let grouped = group_layout(&resolved);
        assert_eq!(grouped.diagnostics.len(), 1);
        assert_eq!(
            grouped.diagnostics[0].kind,
            formgen_model::DiagnosticKind::EmptyArea
        );
    }
}
