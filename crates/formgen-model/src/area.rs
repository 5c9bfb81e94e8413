//! Layout areas and field placements.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormgenError;

/// One of the three fixed layout regions of a block form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Area1,
    Area2,
    Area3,
}

impl Area {
    pub const ALL: [Self; 3] = [Self::Area1, Self::Area2, Self::Area3];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Area1 => "area1",
            Self::Area2 => "area2",
            Self::Area3 => "area3",
        }
    }

    /// Title used by the upstream area configuration.
    pub fn title(self) -> &'static str {
        match self {
            Self::Area1 => "Critères de lancement",
            Self::Area2 => "Critères avancés",
            Self::Area3 => "Critères de consolidation",
        }
    }

    /// Position of the area within the rendered form.
    ///
    /// Consolidation criteria are displayed before the advanced ones.
    pub fn form_sort_number(self) -> u32 {
        match self {
            Self::Area1 => 1,
            Self::Area3 => 2,
            Self::Area2 => 3,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Area1 => 0,
            Self::Area2 => 1,
            Self::Area3 => 2,
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Area {
    type Err = FormgenError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "area1" => Ok(Self::Area1),
            "area2" => Ok(Self::Area2),
            "area3" => Ok(Self::Area3),
            _ => Err(FormgenError::UnknownArea(raw.to_string())),
        }
    }
}

/// Which rule produced a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementOrigin {
    /// Explicit entry of the field-id keyed area map.
    Explicit,
    /// Exact normalized label match against the area configuration.
    LabelConfig,
    /// Match through the old-label to new-label rename table.
    RenamedLabel,
    /// Substring match against the area configuration.
    LabelContainment,
    /// No rule matched; appended to area1.
    Default,
    /// Hardcoded static panel field.
    StaticPanel,
}

impl PlacementOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::LabelConfig => "label-config",
            Self::RenamedLabel => "renamed-label",
            Self::LabelContainment => "label-containment",
            Self::Default => "default",
            Self::StaticPanel => "static-panel",
        }
    }
}

impl fmt::Display for PlacementOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authoritative position of one field within the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaPlacement {
    pub field_id: String,
    pub area: Area,
    pub sort_number: i64,
    pub column_number: i64,
    pub origin: PlacementOrigin,
}

impl AreaPlacement {
    /// Ordering key inside an area bucket.
    pub fn order_key(&self) -> (i64, i64, &str) {
        (self.sort_number, self.column_number, self.field_id.as_str())
    }
}
