//! Filename pattern matching primitives.
//!
//! Pure functions shared by the classifier and the destination resolver:
//! named-group regex search, extension splitting and word-separator
//! normalization. All regex matching here is case-insensitive and uses
//! search semantics - a pattern does not need to anchor the whole string.

use regex::{Regex, RegexBuilder};
use std::collections::HashMap;

/// The word separators recognized in file and folder names.
const SEPARATORS: [char; 3] = [' ', '_', '.'];

/// Compile a filter pattern with case-insensitive matching.
pub fn compile_filter(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Search `text` with `regex` and return all non-empty named groups.
///
/// Returns `None` when the pattern does not match anywhere in the text.
/// Groups that did not participate in the match are simply absent from
/// the map - absence is expected, not an error.
pub fn match_named_groups(text: &str, regex: &Regex) -> Option<HashMap<String, String>> {
    let captures = regex.captures(text)?;

    let mut groups = HashMap::new();
    for name in regex.capture_names().flatten() {
        if let Some(value) = captures.name(name) {
            groups.insert(name.to_string(), value.as_str().to_string());
        }
    }

    Some(groups)
}

/// Split a file name into base name and extension.
///
/// The extension is the fragment after the last dot, but only when that
/// dot sits at an index greater than zero: a leading dot marks a hidden
/// file, not an extension, so `.bashrc` keeps its full name as the base.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(i) if i > 0 => (&file_name[..i], &file_name[i + 1..]),
        _ => (file_name, ""),
    }
}

/// Replace every recognized word separator (space, underscore, dot)
/// with `out_sep`.
///
/// All three replacements are applied unconditionally, so a name mixing
/// separator styles (`A_TV.Show`) normalizes consistently. Idempotent.
pub fn normalize_separators(text: &str, out_sep: &str) -> String {
    let mut result = text.to_string();
    for sep in SEPARATORS {
        result = result.replace(sep, out_sep);
    }
    result
}

/// Turn a captured filename fragment into plain words.
///
/// Underscores, dashes and dots become single spaces; surrounding
/// whitespace is trimmed.
pub fn capture_to_words(fragment: &str) -> String {
    fragment
        .replace(['_', '-', '.'], " ")
        .trim()
        .to_string()
}

/// Build the fuzzy pattern that matches a show name against on-disk
/// folder names.
///
/// Word separators in the show name are collapsed to single spaces,
/// each word is regex-escaped, and words are rejoined with the bracket
/// class `[ _.]` so any separator style matches at that position. The
/// result is searched case-insensitively as a substring.
///
/// Returns `None` for a blank show name.
pub fn show_name_pattern(show_name: &str) -> Option<Regex> {
    let words = capture_to_words(show_name);
    if words.is_empty() {
        return None;
    }

    let pattern = words
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join("[ _.]");

    RegexBuilder::new(&pattern).case_insensitive(true).build().ok()
}
