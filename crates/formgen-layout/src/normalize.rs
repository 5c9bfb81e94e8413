//! Label normalization used by every label lookup.

use formgen_model::Area;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Normalizes a label into a comparison key.
///
/// Lowercases, strips diacritics through canonical decomposition, drops
/// characters that are neither printable ASCII nor word characters and
/// collapses whitespace runs. The result is stable under re-normalization.
pub fn normalize_label(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped: String = lowered
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .map(|ch| if ch.is_whitespace() { ' ' } else { ch })
        .filter(|ch| is_kept(*ch))
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_kept(ch: char) -> bool {
    (' '..='~').contains(&ch) || ch.is_alphanumeric() || ch == '_'
}

/// Maps an area name to its canonical area.
///
/// Accepts the three configuration titles (compared after normalization) and
/// the identifiers `area1`..`area3`. Returns `None` for anything else.
pub fn parse_area_name(raw: &str) -> Option<Area> {
    let key = normalize_label(raw);
    if key.is_empty() {
        return None;
    }
    key.parse::<Area>().ok().or_else(|| {
        Area::ALL
            .into_iter()
            .find(|area| key == normalize_label(area.title()))
    })
}

/// Like [`parse_area_name`], falling back to area1.
pub fn area_or_default(raw: Option<&str>) -> Area {
    raw.and_then(parse_area_name).unwrap_or(Area::Area1)
}
