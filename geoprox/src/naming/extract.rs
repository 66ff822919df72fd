//! Salvaging a name from the start of a noisy attribute value.
//!
//! Some servers concatenate several attributes into one field, e.g.
//! `3Bruchhauser Steine2004http://...`. These helpers pull the leading
//! name run out of such values.

use regex::Regex;
use std::sync::OnceLock;

const MIN_CHARS: usize = 3;
const MAX_CHARS: usize = 50;
const MAX_FALLBACK_WORDS: usize = 5;

/// Leading patterns tried in order, with the capture group holding the name.
fn patterns() -> &'static [(Regex, usize)] {
    static PATTERNS: OnceLock<Vec<(Regex, usize)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // Sequence number glued to the name
            (r"^(\d+)([A-Za-zÄÖÜäöüß\s\-.]+?)(?:\d|$)", 2),
            // Name followed by a year, a long number or a URL
            (r"^([A-Za-zÄÖÜäöüß\s\-.]+?)(?:\d{4}|http|www\.)", 1),
            // Name followed by a decimal number
            (r"^([A-Za-zÄÖÜäöüß\s\-.]{3,50})\d+\.", 1),
        ]
        .into_iter()
        .map(|(pattern, group)| (Regex::new(pattern).expect("Valid regex"), group))
        .collect()
    })
}

fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d+\.\d+$").expect("Valid regex"))
}

fn starts_with_year(word: &str) -> bool {
    word.len() >= 4 && word.bytes().take(4).all(|b| b.is_ascii_digit())
}

fn acceptable_length(name: &str) -> bool {
    (MIN_CHARS..=MAX_CHARS).contains(&name.chars().count())
}

/// Extracts the first plausible name from `text`, if any.
pub fn extract_first_valid_name(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    for (pattern, group) in patterns() {
        let Some(name) = pattern.captures(text).and_then(|c| c.get(*group)) else {
            continue;
        };
        let name = name.as_str().trim();
        if acceptable_length(name)
            && !name.chars().all(|c| c.is_ascii_digit())
            && !name.contains(".00000")
        {
            return Some(name.to_string());
        }
    }

    let mut words = Vec::new();
    for word in text.split_whitespace() {
        if starts_with_year(word)
            || word.contains("http")
            || word.contains(".00000")
            || word.contains("www.")
            || decimal_pattern().is_match(word)
        {
            break;
        }
        words.push(word);
        if words.len() >= MAX_FALLBACK_WORDS {
            break;
        }
    }

    let joined = words.join(" ");
    acceptable_length(&joined).then_some(joined)
}
