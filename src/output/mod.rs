// Output formatting: terminal display of stories and text trimming.

pub mod terminal;

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Counts characters, not bytes, so titles with accents or emoji never split
/// mid-character.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_string(),
        Some((byte_end, _)) => format!("{}...", &text[..byte_end]),
    }
}

/// Keep the first `max_words` whitespace-separated words, appending "..." if
/// anything was cut. Runs of whitespace collapse to single spaces when cut.
pub fn truncate_words(text: &str, max_words: usize) -> String {
    let mut words = text.split_whitespace();
    let kept: Vec<&str> = words.by_ref().take(max_words).collect();
    if words.next().is_none() {
        text.to_string()
    } else {
        format!("{}...", kept.join(" "))
    }
}
