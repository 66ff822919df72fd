//! Plausibility checks for candidate feature names.

use regex::Regex;
use std::sync::OnceLock;

/// Longest value still considered a name.
pub const MAX_NAME_CHARS: usize = 100;

/// Most whitespace separated words a name may have.
pub const MAX_NAME_WORDS: usize = 10;

const NULL_LIKE: &[&str] = &["null", "NULL", "undefined", "true", "false"];

/// Timestamp years that leak into descriptive attributes of German WFS data.
const YEAR_MARKERS: &[&str] = &["2017", "2018", "2019", "2020", "2021", "2022", "2023", "2024"];

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[\d\s.\-]+$").expect("Valid regex"))
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("Valid regex"))
}

/// Returns true if `value` reads like a human-readable name.
///
/// Rejects empty and null-like values, URLs, numbers, dates, timestamps,
/// coordinate-like text and anything too long to be a name.
pub fn is_valid_name(value: &str) -> bool {
    let value = value.trim();

    if value.is_empty() || NULL_LIKE.contains(&value) {
        return false;
    }
    if value.chars().count() > MAX_NAME_CHARS {
        return false;
    }
    if value.contains("http") || value.contains("www.") {
        return false;
    }
    // Covers pure digit strings as well
    if numeric_pattern().is_match(value) {
        return false;
    }
    if YEAR_MARKERS.iter().any(|year| value.contains(year)) || date_pattern().is_match(value) {
        return false;
    }
    if value.contains(".00000000") {
        return false;
    }

    value.split_whitespace().count() <= MAX_NAME_WORDS
}
