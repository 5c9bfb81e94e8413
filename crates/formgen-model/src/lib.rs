//! Data model for block form layout generation.

pub mod area;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod layout;
pub mod link;
pub mod sources;
pub mod value;

pub use area::{Area, AreaPlacement, PlacementOrigin};
pub use diagnostics::{DiagnosticKind, LayoutDiagnostic, Severity, warning_count};
pub use error::FormgenError;
pub use field::{Control, FieldDefinition, Filter, Nature};
pub use layout::{
    ActivatedPanel, AreaLayout, GroupedLayout, LayoutField, ResolvedField, ResolvedLayout,
};
pub use link::{DEFAULT_LINK_NATURE, FieldLink, FilterDependency};
pub use sources::{
    AreaConfig, AreaConfigField, AreaMapEntry, DEFAULT_COLUMN_NUMBER, DEFAULT_CONFIG_SORT_NUMBER,
    LabelMapping, PlacementSources,
};
