//! CLI Utilities Module
//!
//! Small text helpers shared by the table renderer and the session.

/// Number of display cells a cell's text occupies
pub fn text_width(text: &str) -> usize {
    text.chars().count()
}

/// Pad text on the right with spaces up to `width`
///
/// Text already as wide as `width` is returned unchanged.
pub fn pad_right(text: &str, width: usize) -> String {
    let len = text_width(text);
    if len >= width {
        return text.to_string();
    }

    format!("{}{}", text, " ".repeat(width - len))
}

/// Number of decimal digits needed to print `n`
pub fn digit_count(n: usize) -> usize {
    n.to_string().len()
}
