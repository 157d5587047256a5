//! String utility functions.

use regex::Regex;
use std::sync::OnceLock;

/// Converts a string to a wire-safe slug.
///
/// Lower-cases the input, collapses every run of characters that are not
/// ASCII letters or digits into a single hyphen, and trims leading and
/// trailing hyphens.
///
/// # Examples
///
/// ```
/// use fieldwork_core::utils::text::slugify;
///
/// assert_eq!(slugify("Hello World!"), "hello-world");
/// assert_eq!(slugify("  Spaced  Out  "), "spaced-out");
/// assert_eq!(slugify("a?b%c"), "a-b-c");
/// assert_eq!(slugify("already-slugged"), "already-slugged");
/// ```
pub fn slugify(s: &str) -> String {
    static NON_ALNUM_RUN: OnceLock<Regex> = OnceLock::new();

    let non_alnum_run = NON_ALNUM_RUN
        .get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is a valid regex"));

    let s = s.to_lowercase();
    let s = non_alnum_run.replace_all(&s, "-");
    s.trim_matches('-').to_string()
}

/// Escapes `&`, `<`, `>`, `"`, and `'` for use in markup.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
