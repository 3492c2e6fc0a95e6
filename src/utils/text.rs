//! Plain-text helpers for published content

use once_cell::sync::Lazy;
use regex::Regex;

/// Anything from a `<` to the next `>`, line breaks included
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag pattern"));

/// Remove every `<...>` span and trim the result
///
/// A `<` with no closing `>` after it is kept. Entities are not decoded.
pub fn strip_html(input: Option<&str>) -> String {
    let Some(input) = input.filter(|s| !s.trim().is_empty()) else {
        return String::new();
    };

    TAG_REGEX.replace_all(input, "").trim().to_string()
}

/// First `max_words` space-separated words, with `…` appended when cut
pub fn take_words(input: &str, max_words: usize) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let words: Vec<&str> = input.split(' ').filter(|w| !w.is_empty()).collect();
    if words.len() <= max_words {
        return input.to_string();
    }

    let mut out = words[..max_words].join(" ");
    out.push('…');
    out
}

/// Case-insensitive substring test
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Truncate to at most `max_chars` characters
pub fn clip(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((byte_index, _)) => value[..byte_index].to_string(),
        None => value.to_string(),
    }
}
