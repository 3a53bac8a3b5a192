//! Todo title extraction
//!
//! The title is what is left once the command wrapper is gone:
//! "lembra-me de ligar ao seguro amanha" → "ligar ao seguro amanha".

use regex::Regex;
use std::sync::LazyLock;

use crate::text::{collapse_whitespace, fold, truncate_chars};

/// Longest title handed to the todo module.
pub const MAX_TITLE_CHARS: usize = 180;

/// One leading command phrase, with its trailing "de/que/para".
static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:por\s+favor\s+)?(?:lembra-me|lembrar-me|lembra|lembrar|lembrete|anota|anotar|regista|registar|cria|criar|adiciona|adicionar|agenda|agendar|tenho\s+(?:de|que)|preciso|quero|n[aã]o\s+(?:me\s+)?esquecer|nao\s+(?:me\s+)?esquecer)(?:\s+(?:de|que|para))?\s*[:,-]?(?:\s+|$)",
    )
    .unwrap()
});

static BARE_NOUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:(?:uma|um)\s+)?(?:(?:nova|novo)\s+)?(?:tarefas?|lembretes?)\b\s*:?").unwrap()
});

/// Words that carry no action of their own.
const FILLER: &[&str] = &[
    "a", "o", "as", "os", "um", "uma", "de", "da", "do", "das", "dos", "e", "que", "para", "me",
    "te", "se", "em", "no", "na", "ao", "por", "com", "isso", "isto", "coisa", "algo", "tarefa",
    "lembrete", "favor",
];

/// Minimum number of meaningful tokens for an actionable title.
const MIN_ACTION_TOKENS: usize = 2;

/// Strip command prefixes and bare "tarefa"/"lembrete" from the signal.
///
/// Returns `None` when nothing is left.
pub fn extract_todo_title(text: &str) -> Option<String> {
    let mut rest = text.trim();

    // Prefixes stack: "anota que tenho de ligar ..."
    while let Some(m) = PREFIX_RE.find(rest) {
        if m.end() == 0 {
            break;
        }
        rest = rest[m.end()..].trim_start();
    }

    let without_nouns = BARE_NOUN_RE.replace_all(rest, " ");
    let title = collapse_whitespace(&without_nouns);
    let title = title.trim_matches(|c: char| matches!(c, ':' | '-' | ',' | ' '));
    if title.is_empty() {
        return None;
    }

    Some(truncate_chars(title, MAX_TITLE_CHARS))
}

/// A title is actionable when at least two meaningful tokens survive the
/// filler filter.
pub fn is_actionable(title: &str) -> bool {
    fold(title)
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()))
        .filter(|w| w.chars().count() >= 2 && !FILLER.contains(w))
        .count()
        >= MIN_ACTION_TOKENS
}
