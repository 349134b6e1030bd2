/*!
 * Text normalization for cue comparison.
 *
 * Produces the canonical lowercase form used for similarity scoring. The
 * original cue text is never modified; callers keep both forms.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Inline markup such as `<i>` or `<font color="red">`
static MARKUP_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").expect("Invalid markup tag regex")
});

/// Everything outside word characters, whitespace and basic sentence punctuation
static DISALLOWED_CHARS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\w\s.,!?-]").expect("Invalid character filter regex")
});

static WHITESPACE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Invalid whitespace regex")
});

/// Normalize subtitle text for comparison.
///
/// Steps run in a fixed order: markup tags, styling blocks, lowercase,
/// character filtering, whitespace collapsing. Running it on its own output
/// returns the same string.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let without_tags = MARKUP_TAG_REGEX.replace_all(text, "");
    let without_styles = strip_style_blocks(&without_tags);
    let lowered = without_styles.to_lowercase();
    let filtered = DISALLOWED_CHARS_REGEX.replace_all(&lowered, "");
    let collapsed = WHITESPACE_REGEX.replace_all(&filtered, " ");

    collapsed.trim().to_string()
}

/// Normalize text that may be absent. `None` yields an empty string.
pub fn clean_optional(text: Option<&str>) -> String {
    text.map(clean_text).unwrap_or_default()
}

/// Remove `{...}` blocks as whole units, nested braces included.
///
/// An unterminated block is kept as text; its braces fall to the character
/// filter later on.
fn strip_style_blocks(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut pending = String::new();
    let mut depth = 0usize;

    for c in text.chars() {
        match c {
            '{' => {
                depth += 1;
                pending.push(c);
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    pending.clear();
                } else {
                    pending.push(c);
                }
            }
            _ if depth > 0 => pending.push(c),
            _ => output.push(c),
        }
    }

    output.push_str(&pending);
    output
}
