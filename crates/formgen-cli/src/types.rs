use std::path::PathBuf;

use formgen_model::{Area, LayoutDiagnostic};
use formgen_report::ArtifactKind;

#[derive(Debug)]
pub struct GenerationResult {
    pub form_id: String,
    pub input_dir: PathBuf,
    /// Directory holding the artifacts of the form.
    pub form_dir: PathBuf,
    pub dry_run: bool,
    pub areas: Vec<AreaSummary>,
    pub outputs: Vec<OutputSummary>,
    pub link_count: usize,
    pub filtered_fields: usize,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

impl GenerationResult {
    pub fn field_count(&self) -> usize {
        self.areas.iter().map(|area| area.fields).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaSummary {
    pub area: Area,
    pub title: String,
    pub fields: usize,
    pub explicit: usize,
    /// Placed through the label configuration, renames or containment.
    pub configured: usize,
    pub defaulted: usize,
    pub static_panel: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSummary {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub bytes: usize,
    pub written: bool,
}
