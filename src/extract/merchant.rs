//! Merchant extraction
//!
//! An ordered pipeline; the first stage that produces a merchant wins:
//!
//! 1. **Exact brand**: known brand regex, re-canonicalized via the dictionary
//! 2. **Generic place**: "restaurante", "farmácia", … optionally "do <name>"
//! 3. **Preposition**: object of "no/na/ao/à/em/para o/a", fuzzy-checked
//! 4. **Last token**: trailing word(s) fuzzy-matched against the dictionary
//! 5. **OCR trace**: merchant read off the receipt
//!
//! Stage order is load-bearing: a brand anywhere in the text beats a
//! generic noun, which beats whatever follows a preposition.

use regex::Regex;
use std::sync::LazyLock;

use crate::fuzzy::{MerchantDictionary, MERCHANT_DICTIONARY};
use crate::text::{fold, title_case};
use crate::types::{MatchType, MerchantMatch};

static BRAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(pingo\s*doce|continente|lidl|aldi|mercadona|auchan|intermarche|minipreco|edp|meo|vodafone|galp|repsol|uber|bolt|worten|fnac|zara|primark|mc\s*donald'?s?|burger\s*king|telepizza|starbucks|glovo|wells|netflix|spotify|ikea|decathlon|leroy\s*merlin|el\s+corte\s+ingles|amazon)\b",
    )
    .unwrap()
});

/// Brands whose name is also a common word, accepted only after a noun
/// that names a bill or a service plan ("fatura da nos").
static CONTEXT_BRAND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:fatura|factura|tarifario|pacote|fibra|box|operadora)\s+(?:da\s+|de\s+)?(nos)\b")
        .unwrap()
});

static GENERIC_PLACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(restaurante|churrasqueira|pizzaria|cervejaria|tasca|snack-bar|bar|cafe|pastelaria|padaria|farmacia|supermercado|mercado|talho|peixaria|frutaria|quiosque|papelaria|livraria|cabeleireiro|barbearia|ginasio|lavandaria|bomba de gasolina|posto de combustivel|loja)\b(?:\s+(da|do|das|dos|de)\s+([a-z0-9][a-z0-9'-]*(?:\s+[a-z0-9][a-z0-9'-]*){0,3}))?",
    )
    .unwrap()
});

static PREPOSITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\s)(?:no|na|ao|à|em|para\s+o|para\s+a)\s+([^\s.,;:!?]+(?:[ \t]+[^\s.,;:!?]+)*)")
        .unwrap()
});

/// Words that end a merchant phrase: time particles, conjunctions and
/// the start of another prepositional phrase.
const BOUNDARY_WORDS: &[&str] = &[
    "hoje", "ontem", "amanha", "amanhã", "agora", "logo", "depois", "antes", "ja", "já", "com",
    "por", "pelo", "pela", "pelos", "pelas", "que", "e", "mas", "porque", "quando", "para", "a",
    "as", "às", "ao", "aos", "no", "na", "nos", "nas", "em", "eur", "euro", "euros", "€",
];

/// Objects of a preposition that are never merchants.
const STOP_WORDS: &[&str] = &[
    "isso", "isto", "aquilo", "esse", "essa", "este", "esta", "aquele", "aquela", "ele", "ela",
    "eles", "elas", "mim", "ti", "si", "nos", "nós", "vos", "voces", "vocês", "tudo", "nada",
    "algo", "alguem", "alguém", "ninguem", "ninguém", "todos", "todas", "muito", "muitos",
    "pouco", "mais", "menos", "aqui", "ali", "la", "lá", "ca", "cá", "qual", "quanto", "mesmo",
    "outro", "outra", "casa", "sitio", "sítio", "lado", "total", "conta", "meu", "meus", "minha",
    "minhas", "teu", "teus", "tua", "tuas", "seu", "seus", "sua", "suas", "nosso", "nossos",
    "nossa", "nossas", "vosso", "vossa",
];

/// Longest merchant phrase taken after a preposition.
const MAX_PHRASE_WORDS: usize = 4;

/// Minimum length of a trailing word considered by the last-token stage.
const MIN_LAST_TOKEN_CHARS: usize = 3;

/// A merchant together with the pipeline stage that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct MerchantFinding {
    pub merchant: MerchantMatch,
    /// Spending category when the merchant or place type is known.
    pub category: Option<String>,
    pub stage: &'static str,
}

/// Everything a stage may look at.
struct StageInput<'a> {
    text: &'a str,
    folded: &'a str,
    ocr_merchant: Option<&'a str>,
    dictionary: &'a MerchantDictionary,
}

type Stage = fn(&StageInput<'_>) -> Option<MerchantFinding>;

/// Pipeline stages in priority order.
const STAGES: &[Stage] = &[
    exact_brand,
    generic_place,
    preposition,
    last_token,
    ocr_trace,
];

/// Extract the merchant using the built-in dictionary.
pub fn extract_merchant(text: &str, ocr_merchant: Option<&str>) -> Option<MerchantFinding> {
    extract_merchant_with(&MERCHANT_DICTIONARY, text, ocr_merchant)
}

/// Extract the merchant against a caller-supplied dictionary.
pub fn extract_merchant_with(
    dictionary: &MerchantDictionary,
    text: &str,
    ocr_merchant: Option<&str>,
) -> Option<MerchantFinding> {
    let folded = fold(text);
    let input = StageInput {
        text,
        folded: &folded,
        ocr_merchant,
        dictionary,
    };

    STAGES.iter().find_map(|stage| stage(&input))
}

/// True when a known brand name appears anywhere in the (folded) text.
pub fn has_known_brand(folded: &str) -> bool {
    brand_mention(folded).is_some()
}

fn brand_mention(folded: &str) -> Option<&str> {
    BRAND_RE
        .find(folded)
        .or_else(|| CONTEXT_BRAND_RE.captures(folded).and_then(|c| c.get(1)))
        .map(|m| m.as_str())
}

// ----------------------------------------------------------------------------
// Stages
// ----------------------------------------------------------------------------

fn exact_brand(input: &StageInput<'_>) -> Option<MerchantFinding> {
    let matched = brand_mention(input.folded)?;

    let (name, category) = match input.dictionary.lookup(matched) {
        Some(m) => (m.canonical, Some(m.category)),
        None => (title_case(matched), None),
    };

    Some(MerchantFinding {
        merchant: MerchantMatch {
            name,
            match_type: MatchType::ExactBrand,
            fuzzy_canonical: None,
            fuzzy_distance: None,
        },
        category,
        stage: "exact_brand",
    })
}

fn generic_place(input: &StageInput<'_>) -> Option<MerchantFinding> {
    let caps = GENERIC_PLACE_RE.captures(input.folded)?;
    let noun = caps.get(1)?.as_str();

    let owner = caps
        .get(3)
        .map(|m| trim_phrase(m.as_str()))
        .filter(|words| !words.is_empty());

    let name = match (caps.get(2), owner) {
        (Some(connector), Some(owner)) => {
            title_case(&format!("{} {} {}", noun, connector.as_str(), owner))
        }
        _ => title_case(noun),
    };

    Some(MerchantFinding {
        merchant: MerchantMatch {
            name,
            match_type: MatchType::GenericPlace,
            fuzzy_canonical: None,
            fuzzy_distance: None,
        },
        category: Some(place_category(noun).to_string()),
        stage: "generic_place",
    })
}

fn preposition(input: &StageInput<'_>) -> Option<MerchantFinding> {
    for caps in PREPOSITION_RE.captures_iter(input.text) {
        let Some(object) = caps.get(1) else {
            continue;
        };
        let candidate = trim_phrase(object.as_str());
        // Stop words go first: "em casa" is two edits from "zara"
        if candidate.is_empty() || is_stop_phrase(&candidate) {
            continue;
        }

        if let Some(finding) = dictionary_finding(input.dictionary, &candidate, "preposition") {
            return Some(finding);
        }

        return Some(MerchantFinding {
            merchant: MerchantMatch {
                name: candidate,
                match_type: MatchType::Preposition,
                fuzzy_canonical: None,
                fuzzy_distance: None,
            },
            category: None,
            stage: "preposition",
        });
    }

    None
}

fn last_token(input: &StageInput<'_>) -> Option<MerchantFinding> {
    let mut words: Vec<&str> = input
        .text
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation() && c != '\''))
        .filter(|w| !w.is_empty())
        .collect();

    // Amounts and currency markers usually trail a receipt line
    while words.last().is_some_and(|w| is_amount_token(w)) {
        words.pop();
    }

    let last = *words.last()?;

    if words.len() >= 2 {
        let pair = format!("{} {}", words[words.len() - 2], last);
        if let Some(finding) = dictionary_finding(input.dictionary, &pair, "last_token") {
            return Some(finding);
        }
    }

    if last.chars().count() < MIN_LAST_TOKEN_CHARS || is_stop_phrase(last) {
        return None;
    }
    dictionary_finding(input.dictionary, last, "last_token")
}

fn ocr_trace(input: &StageInput<'_>) -> Option<MerchantFinding> {
    let merchant = input.ocr_merchant?.trim();
    if merchant.is_empty() {
        return None;
    }

    let category = input
        .dictionary
        .lookup(merchant)
        .filter(|m| m.distance == 0)
        .map(|m| m.category);

    Some(MerchantFinding {
        merchant: MerchantMatch {
            name: merchant.to_string(),
            match_type: MatchType::OcrTrace,
            fuzzy_canonical: None,
            fuzzy_distance: None,
        },
        category,
        stage: "ocr_trace",
    })
}

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

/// Dictionary lookup: distance 0 is a brand, anything else is a
/// "did you mean" carrying the canonical name.
fn dictionary_finding(
    dictionary: &MerchantDictionary,
    candidate: &str,
    stage: &'static str,
) -> Option<MerchantFinding> {
    let m = dictionary.lookup(candidate)?;

    let merchant = if m.distance == 0 {
        MerchantMatch {
            name: m.canonical,
            match_type: MatchType::ExactBrand,
            fuzzy_canonical: None,
            fuzzy_distance: None,
        }
    } else {
        MerchantMatch {
            name: candidate.to_string(),
            match_type: MatchType::Fuzzy,
            fuzzy_canonical: Some(m.canonical),
            fuzzy_distance: Some(m.distance),
        }
    };

    Some(MerchantFinding {
        merchant,
        category: Some(m.category),
        stage,
    })
}

/// Keep leading words up to the first boundary word or numeric token.
fn trim_phrase(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .take_while(|w| !BOUNDARY_WORDS.contains(w) && !is_amount_token(w))
        .take(MAX_PHRASE_WORDS)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_amount_token(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        || matches!(word, "eur" | "euro" | "euros" | "€")
}

fn is_stop_phrase(candidate: &str) -> bool {
    let first = candidate.split_whitespace().next().unwrap_or_default();
    STOP_WORDS.contains(&candidate) || STOP_WORDS.contains(&first)
}

/// Spending category for a generic place noun.
fn place_category(noun: &str) -> &'static str {
    match noun {
        "restaurante" | "churrasqueira" | "pizzaria" | "cervejaria" | "tasca" | "snack-bar"
        | "bar" | "cafe" | "pastelaria" | "padaria" => "Restaurante",
        "farmacia" | "ginasio" => "Saúde",
        "supermercado" | "mercado" | "talho" | "peixaria" | "frutaria" | "quiosque" => {
            "Supermercado"
        }
        "bomba de gasolina" | "posto de combustivel" => "Transportes",
        "papelaria" | "livraria" => "Educação",
        _ => "Outros",
    }
}
