pub const ELLIPSIS: &str = "...";

/// Cuts `text` to at most `max_chars` characters, appending [`ELLIPSIS`] when
/// anything was removed. Counts `char`s, never splits a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], ELLIPSIS),
        None => text.to_string(),
    }
}
