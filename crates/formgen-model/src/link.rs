use serde::{Deserialize, Serialize};

/// Link nature used when the upstream record carries none.
pub const DEFAULT_LINK_NATURE: &str = "CONDITIONNALHIDDEN";

/// Conditional-visibility dependency of a child field on its father fields.
///
/// Father order is significant: the consuming framework evaluates them in
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLink {
    pub child_field_id: String,
    pub id: String,
    pub method_name: String,
    pub nature: String,
    pub disabled: bool,
    pub father_field_ids: Vec<String>,
    pub bean_id: Option<String>,
}

/// Ordered list of fields an LOV field is queried by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterDependency {
    pub field_id: String,
    pub depends_on: Vec<String>,
}
