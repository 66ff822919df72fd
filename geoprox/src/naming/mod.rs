//! Display names for features.
//!
//! WFS servers name things inconsistently: `GEN` for municipalities,
//! `NAME` for protected areas, nested INSPIRE `geographicalName` blocks for
//! transport nodes. [`resolve_name`] walks a fixed priority of well-known
//! fields, then progressively looser fallbacks, and always returns
//! something printable.

mod extract;
mod validity;

pub use extract::extract_first_valid_name;
pub use validity::{is_valid_name, MAX_NAME_CHARS, MAX_NAME_WORDS};

use crate::geometry::Properties;
use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

/// Returned when no property yields a usable name.
pub const UNKNOWN_NAME: &str = "Unknown";

/// Fields that hold the feature name on the known servers.
pub const PRIMARY_NAME_FIELDS: &[&str] = &[
    "SITE_NAME", "siteName", "site_name", "name", "Name", "NAME", "OBJNAME", "objname", "objName",
    "GEN", "gen", "title", "Title", "TITLE", "bezeichnung", "Bezeichnung", "BEZEICHNUNG",
];

/// Less specific fields that often carry a name.
pub const SECONDARY_NAME_FIELDS: &[&str] = &[
    "DESIGNATION",
    "designation",
    "GEBIET_NAME",
    "gebiet_name",
    "gebietName",
    "SCHUTZGEBIET_NAME",
    "schutzgebiet_name",
    "schutzgebietName",
    "NATURRAUM_NAME",
    "naturraum_name",
    "naturraumName",
    "OBJEKT_NAME",
    "objekt_name",
    "objektName",
    "label",
    "Label",
    "LABEL",
];

/// Key fragments that mark a property as technical rather than descriptive.
const TECHNICAL_KEY_FRAGMENTS: &[&str] = &["id", "code", "geom", "coord", "url", "link"];

fn geographical_text_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<(?:[\w.-]+:)?text>([^<]+)</(?:[\w.-]+:)?text>").expect("Valid regex")
    })
}

/// Resolves the display name of a feature from its properties.
///
/// Never fails; returns [`UNKNOWN_NAME`] when nothing plausible is found.
pub fn resolve_name(properties: &Properties) -> String {
    for field in PRIMARY_NAME_FIELDS.iter().chain(SECONDARY_NAME_FIELDS) {
        if let Some(name) = properties.get(field).and_then(name_from_value) {
            trace!(field = *field, name = %name, "Resolved name from known field");
            return name;
        }
    }

    if let Some(name) = geographical_name(properties) {
        trace!(name = %name, "Resolved name from geographicalName");
        return name;
    }

    for (key, value) in properties.iter() {
        let key = key.to_lowercase();
        if key.contains("name") || key.contains("bezeichnung") {
            if let Some(name) = name_from_value(value) {
                trace!(field = %key, name = %name, "Resolved name from name-like field");
                return name;
            }
        }
    }

    for (key, value) in properties.iter() {
        let key = key.to_lowercase();
        if TECHNICAL_KEY_FRAGMENTS.iter().any(|f| key.contains(f)) {
            continue;
        }
        if let Some(name) = name_from_value(value) {
            trace!(field = %key, name = %name, "Resolved name from fallback field");
            return name;
        }
    }

    UNKNOWN_NAME.to_string()
}

/// The trimmed value when it is a valid name, otherwise whatever can be
/// salvaged from its start.
fn name_from_value(value: &str) -> Option<String> {
    if is_valid_name(value) {
        Some(value.trim().to_string())
    } else if !value.is_empty() {
        extract_first_valid_name(value)
    } else {
        None
    }
}

/// Looks for an INSPIRE `<gn:text>` spelling inside serialized
/// `geographicalName` properties.
fn geographical_name(properties: &Properties) -> Option<String> {
    let has_geographical = properties
        .keys()
        .any(|k| k.contains("geographicalName") || k.contains("gn:text"));
    if !has_geographical {
        return None;
    }

    properties
        .iter()
        .filter(|(key, _)| *key == "geographicalName" || key.ends_with("_geographicalName"))
        .filter_map(|(_, value)| geographical_text_pattern().captures(value))
        .filter_map(|captures| captures.get(1))
        .map(|text| text.as_str())
        .find(|text| is_valid_name(text))
        .map(|text| text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_primary_field_wins() {
        let properties = props(&[("AGS", "14628110"), ("GEN", " Freital "), ("NAME", "Other")]);
        // NAME comes before GEN in the priority list
        assert_eq!(resolve_name(&properties), "Other");

        let properties = props(&[("AGS", "14628110"), ("GEN", " Freital ")]);
        assert_eq!(resolve_name(&properties), "Freital");
    }

    #[test]
    fn test_primary_field_extraction() {
        let properties = props(&[("NAME", "3Bruchhauser Steine2004http://x")]);
        assert_eq!(resolve_name(&properties), "Bruchhauser Steine");
    }

    #[test]
    fn test_invalid_primary_falls_through_to_secondary() {
        let properties = props(&[("NAME", "null"), ("DESIGNATION", "Naturschutzgebiet")]);
        assert_eq!(resolve_name(&properties), "Naturschutzgebiet");
    }

    #[test]
    fn test_inspire_geographical_name() {
        let markup = "<tn:geographicalName><gn:GeographicalName><gn:spelling><gn:SpellingOfName>\
                      <gn:text>Dresden-Neustadt</gn:text></gn:SpellingOfName></gn:spelling>\
                      </gn:GeographicalName></tn:geographicalName>";
        let properties = props(&[("inspireId", "DE.1"), ("geographicalName", markup)]);
        assert_eq!(resolve_name(&properties), "Dresden-Neustadt");
    }

    #[test]
    fn test_name_like_key() {
        let properties = props(&[("ID", "7"), ("Ortsname", "Pirna")]);
        assert_eq!(resolve_name(&properties), "Pirna");
    }

    #[test]
    fn test_fallback_skips_technical_keys() {
        let properties = props(&[
            ("objectid", "Kennung"),
            ("typecode", "Schutzgebiet"),
            ("kategorie", "Landschaftsschutzgebiet"),
        ]);
        assert_eq!(resolve_name(&properties), "Landschaftsschutzgebiet");
    }

    #[test]
    fn test_unknown_when_nothing_usable() {
        assert_eq!(resolve_name(&Properties::new()), UNKNOWN_NAME);
        let properties = props(&[("AREA", "1234.5"), ("url", "http://x")]);
        assert_eq!(resolve_name(&properties), UNKNOWN_NAME);
    }

    #[test]
    fn test_date_is_not_a_name() {
        let properties = props(&[("NAME", "2024-05-01")]);
        assert_eq!(resolve_name(&properties), UNKNOWN_NAME);
    }

    #[test]
    fn test_umlaut_name_kept_verbatim() {
        let properties = props(&[("name", "Müritz Nationalpark")]);
        assert_eq!(resolve_name(&properties), "Müritz Nationalpark");
    }
}
