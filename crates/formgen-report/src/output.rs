//! Rendering and writing of every artifact of a form.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info, info_span};

use formgen_model::{FieldLink, GroupedLayout};

use crate::common::ReportOptions;
use crate::form_xml::{form_xml_file_name, render_form_xml};
use crate::properties::{properties_file_name, render_properties};
use crate::screen_xml::{render_screen_xml, screen_xml_file_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    FormXml,
    Properties,
    ScreenXml,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FormXml => "form xml",
            Self::Properties => "properties",
            Self::ScreenXml => "screen xml",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rendered file, not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub contents: String,
}

/// A file written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Renders the block form, its properties and, when a function name is
/// configured, the screen descriptor.
pub fn render_artifacts(
    layout: &GroupedLayout,
    links: &[FieldLink],
    options: &ReportOptions,
) -> Result<Vec<Artifact>> {
    let form_id = layout.form_id.as_str();
    let mut artifacts = vec![
        Artifact {
            kind: ArtifactKind::FormXml,
            file_name: form_xml_file_name(form_id),
            contents: render_form_xml(layout, links, options)
                .with_context(|| format!("render block form for {form_id}"))?,
        },
        Artifact {
            kind: ArtifactKind::Properties,
            file_name: properties_file_name(form_id),
            contents: render_properties(layout, &options.area_titles),
        },
    ];
    if let Some(function_name) = options
        .function_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        artifacts.push(Artifact {
            kind: ArtifactKind::ScreenXml,
            file_name: screen_xml_file_name(function_name),
            contents: render_screen_xml(function_name, form_id)
                .with_context(|| format!("render screen for {function_name}"))?,
        });
    }
    Ok(artifacts)
}

/// Writes artifacts into `<output_dir>/<form_id>/`.
pub fn write_artifacts(
    output_dir: &Path,
    form_id: &str,
    artifacts: &[Artifact],
) -> Result<Vec<WrittenFile>> {
    let span = info_span!("write", form_id = %form_id);
    let _guard = span.enter();

    let form_dir = output_dir.join(form_id);
    fs::create_dir_all(&form_dir).with_context(|| format!("create {}", form_dir.display()))?;

    let mut written = Vec::with_capacity(artifacts.len());
    for artifact in artifacts {
        let path = form_dir.join(&artifact.file_name);
        write_atomic(&path, artifact.contents.as_bytes())?;
        debug!(kind = %artifact.kind, path = %path.display(), "artifact written");
        written.push(WrittenFile {
            kind: artifact.kind,
            path,
            bytes: artifact.contents.len(),
        });
    }
    info!(file_count = written.len(), dir = %form_dir.display(), "outputs written");
    Ok(written)
}

/// Writes through a sibling temporary file renamed over the target.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("no file name in {}", path.display()))?;
    let temp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));
    fs::write(&temp_path, contents).with_context(|| format!("write {}", temp_path.display()))?;
    if let Err(error) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(error).with_context(|| format!("rename into {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_replaces_target() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xml");
        fs::write(&path, "old").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
