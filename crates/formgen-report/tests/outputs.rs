//! Integration tests for artifact rendering and writing.

use std::fs;

use formgen_layout::{build_field_links, group_layout, resolve_layout};
use formgen_model::{AreaMapEntry, FieldDefinition, GroupedLayout, Nature, PlacementSources};
use formgen_report::{
    AreaTitles, ArtifactKind, ReportOptions, render_artifacts, render_form_xml,
    render_properties, write_artifacts,
};
use serde_json::json;
use tempfile::TempDir;

fn sample_layout() -> GroupedLayout {
    let fields = vec![
        FieldDefinition::new("xceopt", Nature::String).with_label("Option"),
        FieldDefinition::new("optcrm", Nature::Checkbox),
        FieldDefinition::new("csoPanel", Nature::String),
    ];
    let sources = PlacementSources {
        area_map: vec![AreaMapEntry {
            field_id: "xceopt".to_string(),
            area: Some("area1".to_string()),
            sort_number: Some(1),
            column_number: Some(1),
            label: None,
        }],
        ..PlacementSources::default()
    };
    group_layout(&resolve_layout("aini", &fields, &sources))
}

#[test]
fn properties_follow_grouped_order() {
    let properties = render_properties(&sample_layout(), &AreaTitles::default());
    insta::assert_snapshot!(properties);
}

#[test]
fn custom_area_titles_are_escaped() {
    let titles = AreaTitles {
        area1: "Critères de lancement".to_string(),
        ..AreaTitles::default()
    };
    let properties = render_properties(&sample_layout(), &titles);
    assert!(properties.contains("area1.title=Crit\\u00E8res de lancement\n"));
    assert!(properties.contains("area3.title=Criteres de consolidation\n"));
    assert!(!properties.contains("area2.title"));
}

#[test]
fn form_xml_orders_areas_and_fields() {
    let links = build_field_links(&json!({
        "links": [{"childFieldId": "optcrm", "fatherFieldIds": ["xceopt"]}]
    }));
    let xml = render_form_xml(&sample_layout(), &links.links, &ReportOptions::default()).unwrap();

    let positions: Vec<usize> = [
        "id=\"xceopt\"",
        "id=\"optcrm\"",
        "id=\"csoPanel\"",
        "id=\"riddev\"",
        "id=\"adtchgo\"",
        "id=\"acetdev\"",
        "id=\"rcepla\"",
    ]
    .iter()
    .map(|needle| xml.find(needle).unwrap())
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    assert!(xml.contains("<fieldLink childFieldId=\"optcrm\" id=\"link_optcrm\""));
    assert!(xml.contains("<fieldLinkFather fatherFieldId=\"xceopt\"/>"));
    assert!(xml.contains("<area id=\"area3\" sortNumber=\"2\">"));
    assert!(xml.contains("sortNumber=\"21\""));
}

#[test]
fn screen_is_rendered_only_with_function_name() {
    let layout = sample_layout();
    let kinds = |options: &ReportOptions| -> Vec<ArtifactKind> {
        render_artifacts(&layout, &[], options)
            .unwrap()
            .into_iter()
            .map(|artifact| artifact.kind)
            .collect()
    };
    assert_eq!(
        kinds(&ReportOptions::default()),
        vec![ArtifactKind::FormXml, ArtifactKind::Properties]
    );
    let options = ReportOptions {
        function_name: Some("Aini".to_string()),
        ..ReportOptions::default()
    };
    assert_eq!(
        kinds(&options),
        vec![
            ArtifactKind::FormXml,
            ArtifactKind::Properties,
            ArtifactKind::ScreenXml
        ]
    );
}

#[test]
fn artifacts_are_written_under_form_directory() {
    let dir = TempDir::new().unwrap();
    let layout = sample_layout();
    let options = ReportOptions {
        function_name: Some("Aini".to_string()),
        ..ReportOptions::default()
    };
    let artifacts = render_artifacts(&layout, &[], &options).unwrap();
    let written = write_artifacts(dir.path(), &layout.form_id, &artifacts).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|file| file.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "ainiBlockForm.block.xml",
            "ainiBlockForm.block.properties",
            "AiniIRap.screen.xml"
        ]
    );
    for (file, artifact) in written.iter().zip(&artifacts) {
        assert!(file.path.starts_with(dir.path().join("aini")));
        assert_eq!(fs::read_to_string(&file.path).unwrap(), artifact.contents);
        assert_eq!(file.bytes, artifact.contents.len());
    }
}
