use std::collections::HashSet;

pub type KeywordSet = HashSet<String>;

pub const MIN_KEYWORD_CHARS: usize = 3;

/// Lowercases `text`, splits on whitespace and keeps tokens longer than
/// [`MIN_KEYWORD_CHARS`]. No stemming, no stopword list.
pub fn extract_keywords(text: &str) -> KeywordSet {
    text.to_lowercase()
        .split_whitespace()
        .filter(|token| token.chars().count() > MIN_KEYWORD_CHARS)
        .map(str::to_string)
        .collect()
}

pub fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
