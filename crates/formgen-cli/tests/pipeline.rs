//! Integration tests for the generation pipeline.

use std::fs;
use std::path::Path;

use formgen_cli::config::{ConfigOverrides, GeneratorConfig};
use formgen_cli::pipeline::run_generation;
use formgen_model::{Area, DiagnosticKind};
use formgen_report::ArtifactKind;
use serde_json::json;
use tempfile::TempDir;

fn write_json(dir: &Path, name: &str, value: &serde_json::Value) {
    fs::write(dir.join(name), serde_json::to_string_pretty(value).unwrap()).unwrap();
}

fn sample_inputs() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_json(
        dir.path(),
        "transformed_result.json",
        &json!({
            "originalJson": {
                "aini": {
                    "xceopt": {"nature": "string", "label": "Option"},
                    "optcrm": {"nature": "checkbox", "label": "Option CRM"},
                    "ridlov": {"nature": "lov", "label2": "Risque", "lov": "RidLovService"},
                    "csoPanel": {"nature": "string"},
                    "broken": 3
                }
            },
            "labelMappings": [],
            "areaConfigs": [
                {"area": "Critères avancés", "fields": [{"name": "Risque", "sort_number": 5}]}
            ]
        }),
    );
    write_json(
        dir.path(),
        "area_map.json",
        &json!([
            {"fieldId": "xceopt", "area": "Critères de lancement", "sortNumber": 1, "columnNumber": 1}
        ]),
    );
    write_json(
        dir.path(),
        "fieldlink.json",
        &json!({"links": [{"childFieldId": "optcrm", "fatherFieldIds": ["xceopt"]}]}),
    );
    write_json(
        dir.path(),
        "parsed_result.json",
        &json!([{"champ": "ridlov", "parametres": ["'xceopt'", ""]}]),
    );
    dir
}

fn config_for(input: &Path, output: &Path) -> GeneratorConfig {
    let mut config = GeneratorConfig::default();
    config.apply_overrides(&ConfigOverrides {
        input_dir: Some(input.to_path_buf()),
        output_dir: Some(output.to_path_buf()),
        ..ConfigOverrides::default()
    });
    config
}

#[test]
fn generates_every_artifact() {
    let input = sample_inputs();
    let output = TempDir::new().unwrap();
    let mut config = config_for(input.path(), output.path());
    config.function_name = Some("Aini".to_string());

    let result = run_generation(&config, false).unwrap();

    assert_eq!(result.form_id, "aini");
    assert_eq!(result.form_dir, output.path().join("aini"));
    assert_eq!(result.link_count, 1);
    assert_eq!(result.filtered_fields, 1);
    let kinds: Vec<ArtifactKind> = result.outputs.iter().map(|output| output.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ArtifactKind::FormXml,
            ArtifactKind::Properties,
            ArtifactKind::ScreenXml
        ]
    );
    assert!(result.outputs.iter().all(|output| output.written));

    let area1 = &result.areas[Area::Area1.index()];
    assert_eq!((area1.fields, area1.explicit, area1.defaulted), (3, 1, 2));
    let area2 = &result.areas[Area::Area2.index()];
    assert_eq!((area2.fields, area2.configured), (1, 1));
    let area3 = &result.areas[Area::Area3.index()];
    assert_eq!((area3.fields, area3.static_panel), (4, 4));
    assert!(
        result
            .diagnostics
            .iter()
            .any(|diagnostic| diagnostic.kind == DiagnosticKind::MalformedRecord
                && diagnostic.subject.contains("broken"))
    );

    let xml = fs::read_to_string(output.path().join("aini/ainiBlockForm.block.xml")).unwrap();
    assert!(xml.contains("<filter id=\"xceopt\" fieldId=\"xceopt\"/>"));
    assert!(xml.contains("<fieldLinkFather fatherFieldId=\"xceopt\"/>"));
    let properties =
        fs::read_to_string(output.path().join("aini/ainiBlockForm.block.properties")).unwrap();
    assert!(properties.starts_with("title=\n\narea1.title=Criteres de lancement\n"));
    assert!(properties.contains("    ridlov.label=Risque\n"));
    assert!(output.path().join("aini/AiniIRap.screen.xml").is_file());
}

#[test]
fn dry_run_writes_nothing() {
    let input = sample_inputs();
    let output = TempDir::new().unwrap();
    let config = config_for(input.path(), output.path());

    let result = run_generation(&config, true).unwrap();

    assert!(result.dry_run);
    assert_eq!(result.outputs.len(), 2);
    assert!(result.outputs.iter().all(|output| !output.written));
    assert!(!output.path().join("aini").exists());
}

#[test]
fn form_id_override_renames_outputs() {
    let input = sample_inputs();
    let output = TempDir::new().unwrap();
    let mut config = config_for(input.path(), output.path());
    config.apply_overrides(&ConfigOverrides {
        form_id: Some("aini2".to_string()),
        ..ConfigOverrides::default()
    });

    let result = run_generation(&config, false).unwrap();

    assert_eq!(result.form_id, "aini2");
    assert!(
        output
            .path()
            .join("aini2/aini2BlockForm.block.xml")
            .is_file()
    );
}

#[test]
fn missing_field_document_is_fatal() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = config_for(input.path(), output.path());

    let error = run_generation(&config, false).unwrap_err();

    assert!(format!("{error:#}").contains("transformed_result.json"));
}

#[test]
fn configuration_file_sets_input_and_titles() {
    let input = sample_inputs();
    let output = TempDir::new().unwrap();
    let config_path = input.path().join("formgen.toml");
    fs::write(
        &config_path,
        format!(
            "input_dir = {:?}\noutput_dir = {:?}\n\n[area_titles]\narea1 = \"Lancement\"\n",
            input.path().display().to_string(),
            output.path().display().to_string()
        ),
    )
    .unwrap();

    let config = GeneratorConfig::load(&config_path).unwrap();
    run_generation(&config, false).unwrap();

    let properties =
        fs::read_to_string(output.path().join("aini/ainiBlockForm.block.properties")).unwrap();
    assert!(properties.contains("area1.title=Lancement\n"));
}

#[test]
fn raw_keys_trigger_panels_and_keep_misshapen_fields() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write_json(
        input.path(),
        "transformed_result.json",
        &json!({"aini": {
            "xceopt": {"nature": "string", "label": "Option"},
            "optcrm": {"nature": null, "controls": null},
            "ridsta": {"nature": "string", "setWithValuesList": true, "lov": "StatutLov"},
            "csoPanel": true
        }}),
    );
    write_json(
        input.path(),
        "parsed_result.json",
        &json!([{"champ": "ridsta", "parametres": ["'xceopt'"]}]),
    );
    let config = config_for(input.path(), output.path());

    let result = run_generation(&config, false).unwrap();

    let area1 = &result.areas[Area::Area1.index()];
    assert_eq!((area1.fields, area1.defaulted), (3, 3));
    let area3 = &result.areas[Area::Area3.index()];
    assert_eq!(area3.static_panel, 4);
    assert_eq!(result.filtered_fields, 1);

    let xml = fs::read_to_string(output.path().join("aini/ainiBlockForm.block.xml")).unwrap();
    assert!(xml.contains("id=\"optcrm\""));
    assert!(xml.contains("id=\"riddev\""));
    assert!(xml.contains("<filter id=\"xceopt\" fieldId=\"xceopt\"/>"));
}
