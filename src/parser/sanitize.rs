//! Text sanitization for rendered fragments
//!
//! Text nodes pulled out of the page carry invisible characters and layout
//! whitespace that would defeat the exact-match patterns of the classifier.
//! This module reduces a raw text node to the visible string a browser would
//! show.

use regex::Regex;
use std::sync::LazyLock;

// Unicode-aware: also matches U+00A0 and the other space separators
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Sanitize a single text node
///
/// 1. Remove zero-width characters
/// 2. Remove control characters
/// 3. Collapse every whitespace run (including NBSP) to one space
/// 4. Trim
///
/// # Examples
///
/// ```
/// use pado::parser::sanitize::sanitize_fragment;
///
/// assert_eq!(sanitize_fragment("  9/27\u{a0}(토)\u{200B} "), "9/27 (토)");
/// ```
pub fn sanitize_fragment(text: &str) -> String {
    let result = remove_zero_width(text);
    let result = remove_control_chars(&result);
    normalize_whitespace(&result).trim().to_string()
}

/// Remove zero-width spaces and similar invisible characters
///
/// Removes:
/// - \u{200B} Zero-width space
/// - \u{200C} Zero-width non-joiner
/// - \u{200D} Zero-width joiner
/// - \u{200E} Left-to-right mark
/// - \u{200F} Right-to-left mark
/// - \u{2028} Line separator
/// - \u{2029} Paragraph separator
/// - \u{202A}-\u{202E} Bidi formatting characters
/// - \u{FEFF} Byte order mark (BOM)
///
/// # Examples
///
/// ```
/// use pado::parser::sanitize::remove_zero_width;
///
/// let text = "상\u{200B}급\u{FEFF}";
/// assert_eq!(remove_zero_width(text), "상급");
/// ```
pub fn remove_zero_width(text: &str) -> String {
    text.chars()
        .filter(|c| {
            !matches!(*c,
                '\u{200B}'..='\u{200F}' |
                '\u{2028}'..='\u{202E}' |
                '\u{FEFF}'
            )
        })
        .collect()
}

/// Remove control characters, keeping newline and tab for the whitespace pass
pub fn remove_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// Collapse whitespace runs to a single ASCII space
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, " ").to_string()
}
