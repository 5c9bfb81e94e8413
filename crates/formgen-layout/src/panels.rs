//! Static panel catalog.
//!
//! A static panel is a fixed group of synthetic fields inserted when its
//! trigger key appears among the raw fields of a form.

use std::collections::BTreeSet;

use formgen_model::{
    Area, AreaPlacement, Control, FieldDefinition, Filter, Nature, PlacementOrigin, ResolvedField,
};

/// Synthetic field of a static panel with its hardcoded position.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelField {
    pub definition: FieldDefinition,
    pub sort_number: i64,
    pub column_number: i64,
}

impl PanelField {
    pub fn id(&self) -> &str {
        &self.definition.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StaticPanel {
    /// Trigger key looked up among the raw field identifiers.
    pub id: String,
    pub area: Area,
    pub fields: Vec<PanelField>,
}

impl StaticPanel {
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(PanelField::id)
    }

    /// Panel fields as resolved fields, in catalog order.
    pub fn resolved_fields(&self) -> Vec<ResolvedField> {
        self.fields
            .iter()
            .map(|field| ResolvedField {
                label: field
                    .definition
                    .preferred_label()
                    .unwrap_or(field.id())
                    .to_string(),
                placement: AreaPlacement {
                    field_id: field.id().to_string(),
                    area: self.area,
                    sort_number: field.sort_number,
                    column_number: field.column_number,
                    origin: PlacementOrigin::StaticPanel,
                },
                definition: field.definition.clone(),
                is_static_panel: true,
            })
            .collect()
    }
}

/// Ordered set of static panels, built once and handed to the resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticPanelCatalog {
    panels: Vec<StaticPanel>,
}

impl StaticPanelCatalog {
    pub fn new(panels: Vec<StaticPanel>) -> Self {
        Self { panels }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The `valeurPanel` and `csoPanel` panels.
    pub fn builtin() -> Self {
        Self::new(vec![valeur_panel(), cso_panel()])
    }

    pub fn panels(&self) -> &[StaticPanel] {
        &self.panels
    }

    pub fn get(&self, panel_id: &str) -> Option<&StaticPanel> {
        self.panels.iter().find(|panel| panel.id == panel_id)
    }

    /// Panels whose trigger key is among `field_ids`, in catalog order.
    pub fn panels_defined_for<'a>(
        &self,
        field_ids: impl IntoIterator<Item = &'a str>,
    ) -> Vec<&StaticPanel> {
        let present: BTreeSet<&str> = field_ids.into_iter().collect();
        self.panels
            .iter()
            .filter(|panel| present.contains(panel.id.as_str()))
            .collect()
    }
}

fn panel_field(
    id: &str,
    nature: Nature,
    sort_number: i64,
    column_number: i64,
    label: &str,
) -> PanelField {
    let mut definition = FieldDefinition::new(id, nature).with_label(label);
    definition.read_only = Some(false);
    definition.controls = vec![Control::mandatory()];
    PanelField {
        definition,
        sort_number,
        column_number,
    }
}

fn lov_field(
    id: &str,
    lov: &str,
    sort_number: i64,
    column_number: i64,
    label: &str,
    filters: &[&str],
) -> PanelField {
    let mut field = panel_field(id, Nature::Lov, sort_number, column_number, label);
    let definition = &mut field.definition;
    definition.lov = Some(lov.to_string());
    definition.value_field = Some("value".to_string());
    definition.display_template = Some("{value} - {longLabel}".to_string());
    definition.clear_value_if_not_in_store = Some(true);
    definition.filters = filters.iter().map(|id| Filter::on_field(*id)).collect();
    field
}

fn valeur_panel() -> StaticPanel {
    let mut instrument = panel_field("reiv_rceval", Nature::Fk, 1, 2, "Revenu évalué");
    instrument.definition.function_id = Some("FK_instrument".to_string());
    instrument.definition.value_field = Some("acecev".to_string());
    instrument.definition.fk_search_field = Some("acecev".to_string());
    instrument.definition.display_template = Some("{acecev}".to_string());
    instrument.definition.clear_value_if_not_in_store = Some(true);

    let mut validation = lov_field(
        "iprap_adtvalid",
        "IprapAdtpalLovQueryServiceImpl",
        4,
        2,
        "Date de validation",
        &[
            "reiv_rceval",
            "reiv_xidcev",
            "reiv_ridori",
            "xetb_xidcec",
            "xetb_xidced",
            "reic_rcepla",
            "xuti_xidclg",
        ],
    );
    validation.definition.display_template = Some("{value}".to_string());

    let mut settlement = panel_field("rgvlm_rllgvl", Nature::String, 5, 2, "Réglement valeur");
    settlement.definition.hidden = Some(false);
    settlement.definition.controls.clear();

    StaticPanel {
        id: "valeurPanel".to_string(),
        area: Area::Area2,
        fields: vec![
            instrument,
            lov_field(
                "reiv_ridori",
                "IprapRidoriLovQueryServiceImpl",
                2,
                2,
                "Revenu origine",
                &["reiv_rceval", "reiv_xidcev"],
            ),
            lov_field(
                "reic_rcepla",
                "IprapRceplaLovQueryServiceImpl",
                3,
                2,
                "Revenu crédit place",
                &["reiv_rceval", "reiv_xidcev", "reiv_ridori"],
            ),
            validation,
            settlement,
        ],
    }
}

fn cso_panel() -> StaticPanel {
    StaticPanel {
        id: "csoPanel".to_string(),
        area: Area::Area3,
        fields: vec![
            lov_field(
                "riddev",
                "IprapRiddevLovQueryServiceImpl",
                1,
                1,
                "Risque de défaut",
                &[],
            ),
            panel_field("adtchgo", Nature::Date, 1, 2, "Date de changement"),
            lov_field(
                "rcepla",
                "IprapRceplaLovQueryServiceImpl",
                2,
                2,
                "Risque de crédit",
                &[],
            ),
            lov_field(
                "acetdev",
                "IprapAcetdevLovQueryServiceImpl",
                2,
                1,
                "Acceptation de défaut",
                &[],
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_order_and_areas() {
        let catalog = StaticPanelCatalog::builtin();
        let ids: Vec<&str> = catalog.panels().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["valeurPanel", "csoPanel"]);
        assert_eq!(catalog.get("valeurPanel").unwrap().area, Area::Area2);
        assert_eq!(catalog.get("csoPanel").unwrap().area, Area::Area3);
    }

    #[test]
    fn only_present_triggers_activate() {
        let catalog = StaticPanelCatalog::builtin();
        let active = catalog.panels_defined_for(["xceopt", "csoPanel"]);
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "csoPanel");
        assert!(catalog.panels_defined_for(["xceopt"]).is_empty());
    }

    #[test]
    fn panel_fields_are_editable_and_controlled() {
        let catalog = StaticPanelCatalog::builtin();
        for panel in catalog.panels() {
            for field in &panel.fields {
                assert_eq!(field.definition.read_only, Some(false), "{}", field.id());
                let controlled = !field.definition.controls.is_empty();
                assert_eq!(controlled, field.id() != "rgvlm_rllgvl", "{}", field.id());
            }
        }
    }

    #[test]
    fn cso_positions() {
        let catalog = StaticPanelCatalog::builtin();
        let cso = catalog.get("csoPanel").unwrap();
        let positions: Vec<(&str, i64, i64)> = cso
            .fields
            .iter()
            .map(|f| (f.id(), f.sort_number, f.column_number))
            .collect();
        assert_eq!(
            positions,
            vec![
                ("riddev", 1, 1),
                ("adtchgo", 1, 2),
                ("rcepla", 2, 2),
                ("acetdev", 2, 1),
            ]
        );
        let resolved = cso.resolved_fields();
        assert!(resolved.iter().all(|f| f.is_static_panel));
        assert_eq!(resolved[1].label, "Date de changement");
    }
}
