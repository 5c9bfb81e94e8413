use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Record skipped because of missing keys or a wrong shape.
    MalformedRecord,
    /// Same key given more than once within one source; last one kept.
    DuplicateEntry,
    /// Activated static panel whose area ended up without fields.
    EmptyArea,
    /// Upstream definition replaced by a static panel field.
    PanelOverride,
    /// Sort number could not move further without leaving the `i64` range.
    SortOverflow,
}

/// A recoverable problem found while loading or resolving a layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDiagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Document, field or area the diagnostic is about.
    pub subject: String,
    pub message: String,
}

impl LayoutDiagnostic {
    pub fn malformed(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::MalformedRecord,
            severity: Severity::Warning,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn duplicate(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::DuplicateEntry,
            severity: Severity::Info,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn empty_area(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::EmptyArea,
            severity: Severity::Warning,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn panel_override(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::PanelOverride,
            severity: Severity::Info,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn sort_overflow(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DiagnosticKind::SortOverflow,
            severity: Severity::Warning,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.severity >= Severity::Warning
    }
}

pub fn warning_count(diagnostics: &[LayoutDiagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.is_warning())
        .count()
}
