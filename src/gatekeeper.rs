//! Conversational gatekeeper
//!
//! Runs before any module is scored and decides whether the signal is just
//! chat that belongs to the conversational assistant. Checks, in order:
//!
//! 1. Imperative verb, or any module keyword / action verb → command
//! 2. URL, amount, crypto asset or known brand → command
//! 3. Conversational patterns (greeting, meta talk, probing, thanks,
//!    identity questions, banter), each adding a signal
//! 4. Short message without a time reference; question without context
//!
//! The signal is conversational iff step 3 or 4 produced any signal. Steps
//! 1 and 2 always win, so a command is never deflected.

use regex::Regex;
use std::sync::LazyLock;

use crate::evaluate::todo::TEMPORAL;
use crate::evaluate::{ModuleEvaluator, PreparedSignal};
use crate::extract::crypto::mentions_asset;
use crate::extract::{has_amount, has_known_brand, has_url};
use crate::lexicon::IMPERATIVE_VERBS;
use crate::text::word_count;

/// Word count at or below which an unanchored message counts as chat.
pub const SHORT_MESSAGE_MAX_WORDS: usize = 4;

/// Conversational patterns in evaluation order, matched on folded text.
static CONVERSATIONAL_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        (
            "greeting",
            r"^(?:ola|oi|ole|hey|hello|hi|bom dia|boa tarde|boa noite|boas|e ai|tudo bem|tudo bom|como estas|como vai)\b",
        ),
        (
            "meta_system",
            r"\b(?:quem es tu|o que es|o que sabes fazer|o que consegues fazer|como funcionas|que modelo|es um bot|es uma ia|inteligencia artificial|chatgpt|assistente)\b",
        ),
        (
            "testing_probe",
            r"^(?:teste|testing|test|ping|asdf|123|ola mundo|hello world)\b|\b(?:isto funciona|estas ai|esta a funcionar)\b",
        ),
        (
            "gratitude_praise",
            r"\b(?:obrigad[oa]s?|obg|valeu|thanks|thank you|bom trabalho|excelente|genial|espetacular|adoro-te)\b",
        ),
        (
            "existential_identity",
            r"\b(?:sentido da vida|estas vivo|tens sentimentos|es consciente|tens consciencia|quem te criou|es real|qual e o teu nome|como te chamas)\b",
        ),
        (
            "banter",
            r"\b(?:ha(?:ha)+|ah(?:ah)+|k{3,}|lol|piada|aborrecido|que tedio)\b|^(?:ok|okay|fixe|boa|pois|sim|nao|yup|nope|hmm+)$",
        ),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, Regex::new(pattern).unwrap()))
    .collect()
});

/// Why a signal was judged conversational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationalVerdict {
    /// e.g. `pattern:greeting`, `short_message`
    pub signals: Vec<String>,
}

/// Screen a signal. `Some` means deflect to the conversational assistant.
pub fn screen(
    signal: &PreparedSignal<'_>,
    evaluators: &[Box<dyn ModuleEvaluator>],
) -> Option<ConversationalVerdict> {
    let folded = signal.folded.as_str();

    if IMPERATIVE_VERBS.any(folded) || evaluators.iter().any(|e| e.mentions_intent(folded)) {
        return None;
    }

    if has_url(&signal.text)
        || has_amount(&signal.text)
        || mentions_asset(folded)
        || has_known_brand(folded)
    {
        return None;
    }

    let mut signals: Vec<String> = CONVERSATIONAL_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(folded))
        .map(|(name, _)| format!("pattern:{}", name))
        .collect();

    if word_count(folded) <= SHORT_MESSAGE_MAX_WORDS && !TEMPORAL.any(folded) {
        signals.push("short_message".to_string());
    }

    if folded.ends_with('?') {
        signals.push("question_without_context".to_string());
    }

    if signals.is_empty() {
        None
    } else {
        Some(ConversationalVerdict { signals })
    }
}
