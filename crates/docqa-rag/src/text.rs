//! Text cleanup applied before chunking

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

// Keeps word characters, whitespace, and basic punctuation.
static SPECIAL_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,!?;:()\-]").expect("valid regex"));

/// Normalize extracted text: collapse whitespace runs to single spaces,
/// strip characters outside the basic punctuation set, and trim.
pub fn clean(text: &str) -> String {
    let collapsed = WHITESPACE.replace_all(text, " ");
    let filtered = SPECIAL_CHARS.replace_all(&collapsed, "");
    filtered.trim().to_string()
}
