//! Fuzzy merchant matching
//!
//! Edit-distance lookup of a candidate string against the canonical
//! merchant dictionary. Used to re-canonicalize brand hits and to turn
//! typos ("pngo doce") into a "did you mean" signal.
//!
//! Tolerance scales with candidate length:
//! - fewer than 4 chars → at most 1 edit
//! - 4 chars or more → at most 2 edits
//!
//! Ties between equally distant keys are broken by shortest key, then
//! lexicographic key order, so results never depend on table layout.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::text::{collapse_whitespace, fold_diacritics};

/// Built-in merchant table: (lookup key, display name, spending category).
const BUILTIN_MERCHANTS: &[(&str, &str, &str)] = &[
    ("pingo doce", "Pingo Doce", "Supermercado"),
    ("continente", "Continente", "Supermercado"),
    ("lidl", "Lidl", "Supermercado"),
    ("aldi", "Aldi", "Supermercado"),
    ("mercadona", "Mercadona", "Supermercado"),
    ("auchan", "Auchan", "Supermercado"),
    ("intermarche", "Intermarché", "Supermercado"),
    ("minipreco", "Minipreço", "Supermercado"),
    ("edp", "EDP", "Serviços"),
    ("meo", "MEO", "Serviços"),
    ("vodafone", "Vodafone", "Serviços"),
    ("nos", "NOS", "Serviços"),
    ("galp", "Galp", "Transportes"),
    ("repsol", "Repsol", "Transportes"),
    ("uber", "Uber", "Transportes"),
    ("bolt", "Bolt", "Transportes"),
    ("worten", "Worten", "Tecnologia"),
    ("fnac", "FNAC", "Tecnologia"),
    ("zara", "Zara", "Vestuário"),
    ("primark", "Primark", "Vestuário"),
    ("mcdonalds", "McDonald's", "Restaurante"),
    ("burger king", "Burger King", "Restaurante"),
    ("telepizza", "Telepizza", "Restaurante"),
    ("starbucks", "Starbucks", "Restaurante"),
    ("glovo", "Glovo", "Restaurante"),
    ("wells", "Wells", "Saúde"),
    ("netflix", "Netflix", "Entretenimento"),
    ("spotify", "Spotify", "Entretenimento"),
    ("ikea", "IKEA", "Outros"),
    ("decathlon", "Decathlon", "Outros"),
    ("leroy merlin", "Leroy Merlin", "Outros"),
    ("el corte ingles", "El Corte Inglés", "Outros"),
    ("amazon", "Amazon", "Outros"),
];

/// Process-wide merchant dictionary, built once.
pub static MERCHANT_DICTIONARY: LazyLock<MerchantDictionary> =
    LazyLock::new(|| MerchantDictionary::new(BUILTIN_MERCHANTS.iter().copied()));

/// A canonical merchant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantEntry {
    pub display: String,
    pub category: String,
}

/// Result of a dictionary lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzyMatch {
    /// Display form of the matched merchant.
    pub canonical: String,
    pub category: String,
    /// 0 for an exact hit.
    pub distance: usize,
}

/// Canonical merchant names keyed by folded lookup key.
#[derive(Debug, Clone, Default)]
pub struct MerchantDictionary {
    entries: BTreeMap<String, MerchantEntry>,
}

impl MerchantDictionary {
    /// Build from `(key, display, category)` triples. Keys are normalized
    /// the same way candidates are.
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(key, display, category)| {
                (
                    normalize_candidate(key),
                    MerchantEntry {
                        display: display.to_string(),
                        category: category.to_string(),
                    },
                )
            })
            .collect();

        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by (normalized) key.
    pub fn get(&self, key: &str) -> Option<&MerchantEntry> {
        self.entries.get(&normalize_candidate(key))
    }

    /// Find the closest merchant within tolerance.
    pub fn lookup(&self, candidate: &str) -> Option<FuzzyMatch> {
        let candidate = normalize_candidate(candidate);
        if candidate.is_empty() {
            return None;
        }

        if let Some(entry) = self.entries.get(&candidate) {
            return Some(FuzzyMatch {
                canonical: entry.display.clone(),
                category: entry.category.clone(),
                distance: 0,
            });
        }

        let len = candidate.chars().count();
        let max = max_distance(len);

        // (distance, key length, key) orders candidates by the tie-break rule
        let mut best: Option<(usize, usize, &String, &MerchantEntry)> = None;
        for (key, entry) in &self.entries {
            let key_len = key.chars().count();
            if key_len.abs_diff(len) > max {
                continue;
            }

            let distance = edit_distance(&candidate, key);
            if distance > max {
                continue;
            }

            let better = match best {
                None => true,
                Some((d, l, k, _)) => (distance, key_len, key) < (d, l, k),
            };
            if better {
                best = Some((distance, key_len, key, entry));
            }
        }

        best.map(|(distance, _, _, entry)| FuzzyMatch {
            canonical: entry.display.clone(),
            category: entry.category.clone(),
            distance,
        })
    }
}

/// Maximum edit distance tolerated for a candidate of `len` chars.
pub fn max_distance(len: usize) -> usize {
    if len >= 4 {
        2
    } else {
        1
    }
}

/// Levenshtein edit distance with unit costs, counted in chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Fold a candidate into lookup-key form: no accents, no apostrophes or
/// dots, single spaces.
pub fn normalize_candidate(s: &str) -> String {
    let folded = fold_diacritics(s).to_lowercase();
    let stripped: String = folded
        .chars()
        .filter(|c| !matches!(c, '\'' | '’' | '.'))
        .collect();
    collapse_whitespace(&stripped)
}
