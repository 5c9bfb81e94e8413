#![deny(unsafe_code)]

//! Field layout resolution.
//!
//! Raw field definitions go through the [`AreaResolver`] (explicit area map,
//! label configuration, renames, containment, default numbering, static
//! panels), then through [`group_layout`] which produces one ordered
//! sequence per area. Field links and LOV filters are built independently
//! of placement.

pub mod context;
pub mod filters;
pub mod group;
pub mod links;
pub mod normalize;
pub mod panels;
pub mod resolver;
pub mod strategy;

pub use context::{ConfigEntry, ExplicitEntry, PlacementContext};
pub use filters::{FilterSet, apply_filters, build_filter_dependencies};
pub use group::group_layout;
pub use links::{LinkGraph, build_field_links};
pub use normalize::{area_or_default, normalize_label, parse_area_name};
pub use panels::{PanelField, StaticPanel, StaticPanelCatalog};
pub use resolver::{AreaResolver, DEFAULT_AREA1_ANCHOR, SORT_STEP, resolve_layout};
pub use strategy::{
    ExactLabel, ExplicitAreaMap, LabelContainment, Placement, PlacementStrategy, RenamedLabel,
    default_chain,
};
