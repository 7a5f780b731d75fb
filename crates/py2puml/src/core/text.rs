//! Shared text utilities for PlantUML output
//!
//! Wrapping for note bodies and the escaping rules applied to every name that
//! ends up inside the diagram text.

use unicode_width::UnicodeWidthStr;

/// Wrap text to fit within a maximum width, breaking on word boundaries.
///
/// Returns a vector of lines, each fitting within `max_width` display columns.
/// If `max_width` is 0, or the text fits on one line, returns a single-element vector.
///
/// # Example
/// ```
/// use py2puml::core::wrap_label;
///
/// let lines = wrap_label("This is a long label", 10);
/// assert_eq!(lines, vec!["This is a", "long label"]);
/// ```
pub fn wrap_label(label: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 || UnicodeWidthStr::width(label) <= max_width {
        return vec![label.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in label.split_whitespace() {
        let word_width = UnicodeWidthStr::width(word);

        if current_width == 0 {
            current_line = word.to_string();
            current_width = word_width;
        } else if current_width + 1 + word_width <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
            current_width += 1 + word_width;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
            current_width = word_width;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Collapse every run of whitespace (including newlines) to a single space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text safe to place between double quotes
pub fn escape_quoted(text: &str) -> String {
    collapse_whitespace(&text.replace('"', "'"))
}

/// Text safe to place on a single member line inside a class body
///
/// A trailing `{` or `}` would be read as a block delimiter, so braces are
/// swapped for parentheses.
pub fn escape_member_text(text: &str) -> String {
    collapse_whitespace(text)
        .replace('{', "(")
        .replace('}', ")")
}

/// A note body line that cannot terminate the note early
pub fn escape_note_line(line: &str) -> String {
    let trimmed = line.trim_start();
    if trimmed.starts_with("end note") || trimmed.starts_with("endnote") {
        format!("'{}", trimmed)
    } else {
        collapse_whitespace(line)
    }
}

/// True when `name` is usable as a bare PlantUML element reference
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
        && !name.ends_with('.')
        && !name.contains("..")
}

/// Reference to an element in a relationship or note binding
///
/// # Example
/// ```
/// use py2puml::core::element_ref;
///
/// assert_eq!(element_ref("Animal"), "Animal");
/// assert_eq!(element_ref("abc.ABC"), "abc.ABC");
/// assert_eq!(element_ref("Dog@register"), "\"Dog@register\"");
/// ```
pub fn element_ref(name: &str) -> String {
    if is_plain_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", escape_quoted(name))
    }
}

/// Stable alias for a synthetic element (global variables, function boxes)
pub fn element_id(package: &str, suffix: &str) -> String {
    let mut id = String::with_capacity(package.len() + suffix.len() + 1);
    for c in package.chars().chain(std::iter::once('_')).chain(suffix.chars()) {
        if c.is_ascii_alphanumeric() {
            id.push(c);
        } else {
            id.push('_');
        }
    }
    id
}
