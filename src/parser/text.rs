/// Upper bound (in chars) on text returned by the capped extraction paths.
pub const MAX_TEXT_CHARS: usize = 2000;

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to `max` chars on a char boundary. Never leaves trailing whitespace.
pub fn cap(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max).collect();
        truncated.trim_end().to_string()
    }
}

/// Normalize then cap at [`MAX_TEXT_CHARS`]. Empty results become `None`.
pub fn clean(text: &str) -> Option<String> {
    non_empty(cap(&normalize(text), MAX_TEXT_CHARS))
}

pub fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
