//! Label bundle (`<formId>BlockForm.block.properties`).

use formgen_model::GroupedLayout;

use crate::common::AreaTitles;

pub fn properties_file_name(form_id: &str) -> String {
    format!("{form_id}BlockForm.block.properties")
}

/// Renders the properties file: a `title=` header, then one section per
/// non-empty area with its field labels in grouped order.
pub fn render_properties(layout: &GroupedLayout, titles: &AreaTitles) -> String {
    let mut lines = vec!["title=\n".to_string()];
    for area in layout.non_empty_areas() {
        lines.push(format!(
            "{}.title={}",
            area.area,
            escape_value(titles.title(area.area))
        ));
        for field in &area.fields {
            lines.push(format!(
                "    {}.label={}",
                escape_key(field.id()),
                escape_value(&field.label)
            ));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

/// Escapes a property value: backslashes, control characters and anything
/// outside printable ASCII (as `\uXXXX`).
pub fn escape_value(raw: &str) -> String {
    escape(raw, false)
}

/// Escapes a property key; separators are backslash-escaped as well.
pub fn escape_key(raw: &str) -> String {
    escape(raw, true)
}

fn escape(raw: &str, key: bool) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '=' | ':' | ' ' | '#' | '!' if key => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    escaped.push_str(&format!("\\u{unit:04X}"));
                }
            }
        }
    }
    escaped
}
