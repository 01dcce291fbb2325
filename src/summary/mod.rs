pub const DEFAULT_SUMMARY_CHARS: usize = 500;
pub const TRUNCATION_MARKER: &str = "...";

/// Keeps the first `max_chars` characters of `text`, marking the cut with `...`.
///
/// Counts `char`s, not bytes, so multi-byte text is never split mid-character.
/// Text of exactly `max_chars` characters is returned as is.
pub fn summarize(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}
