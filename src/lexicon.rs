//! Keyword lexicons
//!
//! A lexicon is a fixed list of terms compiled once into word-boundary
//! regexes. Terms are regex fragments (`despesas?`, `lembra(?:-me)?`) so
//! inflections stay on one line. Lexicons are matched against folded text
//! (see [`crate::text::fold`]), which is why every term is accent-free.

use regex::Regex;
use std::sync::LazyLock;

/// Imperative verbs that mark a signal as a command rather than chat.
///
/// Used by the conversational gatekeeper only; module scoring keeps its
/// own narrower verb lists.
pub static IMPERATIVE_VERBS: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        "imperative",
        &[
            "cria",
            "criar",
            "regista",
            "registar",
            "adiciona",
            "adicionar",
            "anota",
            "anotar",
            "lanca",
            "lancar",
            "insere",
            "inserir",
            "mete",
            "poe",
            "guarda",
            "guardar",
            "salva",
            "salvar",
            "marca",
            "agenda",
            "lembra",
            "apaga",
        ],
    )
});

/// A compiled term together with its source fragment.
struct Term {
    fragment: &'static str,
    regex: Regex,
}

/// Immutable, compiled keyword table.
pub struct Lexicon {
    name: &'static str,
    terms: Vec<Term>,
}

impl Lexicon {
    /// Compile a lexicon from static regex fragments.
    ///
    /// Panics on an invalid fragment; lexicons are compile-time data and a
    /// broken one is a programming error caught by the module tests.
    pub fn new(name: &'static str, fragments: &[&'static str]) -> Self {
        let terms = fragments
            .iter()
            .map(|&fragment| Term {
                fragment,
                regex: Regex::new(&format!(r"\b(?:{})\b", fragment))
                    .unwrap_or_else(|e| panic!("lexicon {name}: bad term {fragment:?}: {e}")),
            })
            .collect();

        Self { name, terms }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Matched text of every term present, in lexicon order.
    pub fn matches(&self, folded: &str) -> Vec<String> {
        self.terms
            .iter()
            .filter_map(|t| t.regex.find(folded).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Number of distinct terms present.
    pub fn count(&self, folded: &str) -> usize {
        self.terms.iter().filter(|t| t.regex.is_match(folded)).count()
    }

    pub fn any(&self, folded: &str) -> bool {
        self.terms.iter().any(|t| t.regex.is_match(folded))
    }

    /// Fragment of the first term (in lexicon order) present.
    pub fn first_term(&self, folded: &str) -> Option<&'static str> {
        self.terms
            .iter()
            .find(|t| t.regex.is_match(folded))
            .map(|t| t.fragment)
    }
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("name", &self.name)
            .field("terms", &self.terms.len())
            .finish()
    }
}

/// Saturating density score: `min(1, hits / saturation)`.
pub fn density(hits: usize, saturation: usize) -> f32 {
    if saturation == 0 {
        return 0.0;
    }
    (hits as f32 / saturation as f32).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Lexicon {
        Lexicon::new("sample", &["despesas?", "gastei", "lembra(?:-me)?"])
    }

    #[test]
    fn test_word_boundaries() {
        let lex = sample();
        assert!(lex.any("registar despesa"));
        assert!(lex.any("tres despesas hoje"));
        // No partial-word hits
        assert!(!lex.any("despesamento"));
        assert!(!lex.any("desgastei"));
    }

    #[test]
    fn test_matches_and_count() {
        let lex = sample();
        let hits = lex.matches("gastei numa despesa");
        assert_eq!(hits, vec!["despesa".to_string(), "gastei".to_string()]);
        assert_eq!(lex.count("gastei numa despesa"), 2);
        assert_eq!(lex.count("nada aqui"), 0);
    }

    #[test]
    fn test_hyphenated_term() {
        let lex = sample();
        assert_eq!(lex.matches("lembra-me amanha"), vec!["lembra-me".to_string()]);
        assert_eq!(lex.first_term("lembra-me amanha"), Some("lembra(?:-me)?"));
    }

    #[test]
    fn test_imperative_verbs_compile() {
        assert!(IMPERATIVE_VERBS.len() > 10);
        assert!(IMPERATIVE_VERBS.any("cria despesa"));
        assert!(!IMPERATIVE_VERBS.any("criancas"));
    }

    #[test]
    fn test_density() {
        assert_eq!(density(0, 2), 0.0);
        assert_eq!(density(1, 2), 0.5);
        assert_eq!(density(5, 2), 1.0);
        assert_eq!(density(3, 0), 0.0);
    }
}
