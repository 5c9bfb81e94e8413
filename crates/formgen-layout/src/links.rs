//! Conditional-visibility links between fields.

use formgen_model::value::{lenient_bool, lenient_string};
use formgen_model::{DEFAULT_LINK_NATURE, FieldLink, LayoutDiagnostic};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Field links of a form, with the records that had to be skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkGraph {
    pub links: Vec<FieldLink>,
    pub diagnostics: Vec<LayoutDiagnostic>,
}

impl LinkGraph {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Builds field links from the raw link document.
///
/// Accepts `{"links": [...]}`, a bare array, or an object keyed by link id.
/// Cycles are passed through untouched.
pub fn build_field_links(document: &Value) -> LinkGraph {
    let mut graph = LinkGraph::default();
    let records: Vec<(String, Option<String>, &Value)> = match document {
        Value::Null => Vec::new(),
        Value::Array(items) => indexed(items),
        Value::Object(map) => match map.get("links") {
            Some(Value::Array(items)) => indexed(items),
            Some(_) => {
                graph.diagnostics.push(LayoutDiagnostic::malformed(
                    "fieldlink",
                    "`links` is not an array",
                ));
                Vec::new()
            }
            None => map
                .iter()
                .map(|(key, record)| (key.clone(), Some(key.clone()), record))
                .collect(),
        },
        _ => {
            graph.diagnostics.push(LayoutDiagnostic::malformed(
                "fieldlink",
                "document is neither an array nor an object",
            ));
            Vec::new()
        }
    };

    for (subject, default_id, record) in records {
        match parse_link(record, default_id) {
            Ok(link) => graph.links.push(link),
            Err(reason) => {
                warn!(record = %subject, reason, "field link skipped");
                graph
                    .diagnostics
                    .push(LayoutDiagnostic::malformed(format!("fieldlink {subject}"), reason));
            }
        }
    }

    info!(
        link_count = graph.links.len(),
        skipped = graph.diagnostics.len(),
        "field links built"
    );
    graph
}

fn indexed(items: &[Value]) -> Vec<(String, Option<String>, &Value)> {
    items
        .iter()
        .enumerate()
        .map(|(index, record)| (format!("[{index}]"), None, record))
        .collect()
}

fn parse_link(record: &Value, default_id: Option<String>) -> Result<FieldLink, &'static str> {
    let Value::Object(map) = record else {
        return Err("record is not an object");
    };
    let child = text(map, "childFieldId").ok_or("missing childFieldId")?;
    let fathers = map
        .get("fatherFieldIds")
        .or_else(|| map.get("fathers"))
        .ok_or("missing fatherFieldIds")?;
    let Value::Array(fathers) = fathers else {
        return Err("fatherFieldIds is not an array");
    };
    let father_field_ids = fathers
        .iter()
        .map(|father| match father {
            Value::String(id) if !id.trim().is_empty() => Ok(id.trim().to_string()),
            _ => Err("fatherFieldIds must hold non-empty strings"),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FieldLink {
        id: text(map, "id")
            .or(default_id)
            .unwrap_or_else(|| format!("link_{child}")),
        method_name: text(map, "methodName").unwrap_or_else(|| format!("is{child}Visible")),
        nature: text(map, "nature").unwrap_or_else(|| DEFAULT_LINK_NATURE.to_string()),
        disabled: map.get("disabled").and_then(lenient_bool).unwrap_or(false),
        bean_id: text(map, "beanId"),
        father_field_ids,
        child_field_id: child,
    })
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key)
        .and_then(lenient_string)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
