//! Generation pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Ingest**: read the input documents of the form
//! 2. **Resolve**: place every field and attach LOV filters
//! 3. **Group**: order each area and correct sort numbers
//! 4. **Output**: render the block form, properties and screen files
//!
//! Each stage takes the output of the previous stage and returns typed results.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use formgen_ingest::{FormInputs, load_inputs};
use formgen_layout::{
    AreaResolver, FilterSet, LinkGraph, apply_filters, build_field_links,
    build_filter_dependencies, group_layout,
};
use formgen_model::{
    GroupedLayout, LayoutDiagnostic, PlacementOrigin, ResolvedLayout, warning_count,
};
use formgen_report::{render_artifacts, write_artifacts};

use crate::config::GeneratorConfig;
use crate::types::{AreaSummary, GenerationResult, OutputSummary};

// ============================================================================
// Stage 1: Ingest
// ============================================================================

pub fn ingest(config: &GeneratorConfig) -> Result<FormInputs> {
    let input_dir = config.input_dir()?;
    load_inputs(input_dir, &config.files, config.form_id.as_deref())
        .with_context(|| format!("load inputs from {}", input_dir.display()))
}

// ============================================================================
// Stage 2: Resolve
// ============================================================================

/// Result of the resolve stage.
#[derive(Debug)]
pub struct ResolveResult {
    pub layout: ResolvedLayout,
    pub links: LinkGraph,
    pub filters: FilterSet,
    pub filtered_fields: usize,
}

pub fn resolve(inputs: &FormInputs, resolver: &AreaResolver) -> ResolveResult {
    let mut layout = resolver.resolve_with_triggers(
        &inputs.form_id,
        &inputs.fields,
        inputs.raw_keys.iter().map(String::as_str),
        &inputs.sources,
    );
    let filters = build_filter_dependencies(&inputs.filters);
    let filtered_fields = apply_filters(&mut layout, &filters);
    let links = build_field_links(&inputs.field_links);
    ResolveResult {
        layout,
        links,
        filters,
        filtered_fields,
    }
}

// ============================================================================
// Stage 3: Group
// ============================================================================

pub fn group(resolved: &ResolveResult) -> GroupedLayout {
    group_layout(&resolved.layout)
}

// ============================================================================
// Stage 4: Output
// ============================================================================

pub fn output(
    config: &GeneratorConfig,
    layout: &GroupedLayout,
    links: &LinkGraph,
    dry_run: bool,
) -> Result<Vec<OutputSummary>> {
    let output_dir = config.output_dir()?;
    let artifacts = render_artifacts(layout, &links.links, &config.report_options())?;
    if dry_run {
        let form_dir = output_dir.join(&layout.form_id);
        info!(file_count = artifacts.len(), "dry run, nothing written");
        return Ok(artifacts
            .iter()
            .map(|artifact| OutputSummary {
                kind: artifact.kind,
                path: form_dir.join(&artifact.file_name),
                bytes: artifact.contents.len(),
                written: false,
            })
            .collect());
    }
    let written = write_artifacts(&output_dir, &layout.form_id, &artifacts)?;
    Ok(written
        .into_iter()
        .map(|file| OutputSummary {
            kind: file.kind,
            path: file.path,
            bytes: file.bytes,
            written: true,
        })
        .collect())
}

/// Runs every stage for the configured form.
pub fn run_generation(config: &GeneratorConfig, dry_run: bool) -> Result<GenerationResult> {
    let input_dir = config.input_dir()?.to_path_buf();
    let span = info_span!("generate", input_dir = %input_dir.display());
    let _guard = span.enter();

    let inputs = ingest(config)?;
    let resolver = AreaResolver::default();
    let resolved = resolve(&inputs, &resolver);
    let grouped = group(&resolved);
    let outputs = output(config, &grouped, &resolved.links, dry_run)?;

    let diagnostics = collect_diagnostics(&inputs, &resolved, &grouped);
    let result = GenerationResult {
        form_id: grouped.form_id.clone(),
        input_dir,
        form_dir: config.output_dir()?.join(&grouped.form_id),
        dry_run,
        areas: summarize_areas(&grouped, config),
        outputs,
        link_count: resolved.links.links.len(),
        filtered_fields: resolved.filtered_fields,
        diagnostics,
    };
    info!(
        form_id = %result.form_id,
        field_count = result.field_count(),
        link_count = result.link_count,
        warning_count = warning_count(&result.diagnostics),
        "generation finished"
    );
    Ok(result)
}

/// Diagnostics of every stage, in the order the stages ran.
fn collect_diagnostics(
    inputs: &FormInputs,
    resolved: &ResolveResult,
    grouped: &GroupedLayout,
) -> Vec<LayoutDiagnostic> {
    inputs
        .diagnostics
        .iter()
        .chain(&grouped.diagnostics)
        .chain(&resolved.filters.diagnostics)
        .chain(&resolved.links.diagnostics)
        .cloned()
        .collect()
}

pub fn summarize_areas(layout: &GroupedLayout, config: &GeneratorConfig) -> Vec<AreaSummary> {
    layout
        .areas
        .iter()
        .map(|area| AreaSummary {
            area: area.area,
            title: config.area_titles.title(area.area).to_string(),
            fields: area.fields.len(),
            explicit: area.count_by_origin(&[PlacementOrigin::Explicit]),
            configured: area.count_by_origin(&[
                PlacementOrigin::LabelConfig,
                PlacementOrigin::RenamedLabel,
                PlacementOrigin::LabelContainment,
            ]),
            defaulted: area.count_by_origin(&[PlacementOrigin::Default]),
            static_panel: area.count_by_origin(&[PlacementOrigin::StaticPanel]),
        })
        .collect()
}
