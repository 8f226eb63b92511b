//! Newline escaping shared by keys and values.
//!
//! Translation files are line based, so a newline inside a key or value is
//! stored as the two-character sequence `\n`.

/// Replaces every literal newline with the `\n` escape.
#[must_use]
pub fn escape_newlines(text: &str) -> String {
    text.replace('\n', "\\n")
}

/// Replaces every `\n` escape with a literal newline.
#[must_use]
pub fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}
