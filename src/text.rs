//! Text helpers shared by extractors and evaluators
//!
//! Upstream already lower-cases and trims the signal, but accent handling is
//! inconsistent, so lexicon matching always runs against a folded copy:
//! - Unicode NFD decomposition
//! - Combining marks stripped ("farmácia" → "farmacia")
//!
//! Display strings (titles, verbatim merchants) keep the original text.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lower-case connectors left as-is when title-casing a name.
const NAME_CONNECTORS: &[&str] = &["da", "das", "de", "do", "dos", "e"];

/// Strip diacritics via NFD decomposition.
///
/// # Examples
///
/// ```
/// use signal_dispatch::text::fold_diacritics;
///
/// assert_eq!(fold_diacritics("farmácia são joão"), "farmacia sao joao");
/// assert_eq!(fold_diacritics("amanhã às 10h"), "amanha as 10h");
/// ```
pub fn fold_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Fold diacritics, lower-case and collapse whitespace.
pub fn fold(s: &str) -> String {
    collapse_whitespace(&fold_diacritics(s).to_lowercase())
}

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max_chars` characters without splitting a char.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => s[..idx].trim_end().to_string(),
        None => s.to_string(),
    }
}

/// Capitalize each word of a place name, leaving connectors lower-case.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            if i > 0 && NAME_CONNECTORS.contains(&word) {
                return word.to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Count whitespace-separated words.
pub fn word_count(s: &str) -> usize {
    s.split_whitespace().count()
}
