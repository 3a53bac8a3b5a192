//! Links evaluator (read-later bookmarks)
//!
//! | Component | Weight |
//! |---|---|
//! | keyword density | 0.34 |
//! | save intent | 0.18 |
//! | valid URL | 0.38 |
//! | title | 0.10 |
//! | voice origin | +0.03 |
//!
//! Strict when a valid URL comes with an explicit intent to save it.

use std::sync::LazyLock;

use super::{clamp_unit, flag, ModuleEvaluator, PreparedSignal, Trail, KEYWORD_SATURATION};
use crate::extract::{extract_link_title, extract_url};
use crate::lexicon::{density, Lexicon};
use crate::types::{ExtractedFields, LinksFields, ModuleEvaluation, ModuleId};

pub const W_KEYWORDS: f32 = 0.34;
pub const W_INTENT: f32 = 0.18;
pub const W_URL: f32 = 0.38;
pub const W_TITLE: f32 = 0.10;
pub const W_VOICE: f32 = 0.03;

pub static LINK_KEYWORDS: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        "links",
        &[
            "links?",
            "url",
            "site",
            "pagina",
            "artigo",
            "video",
            "podcast",
            "bookmark",
            "favoritos",
            "marcador",
        ],
    )
});

/// Phrases that ask for the link to be kept.
pub static LINK_INTENT: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        "links_intent",
        &[
            "guarda",
            "guardar",
            "salva",
            "salvar",
            "save",
            "bookmark",
            "(?:ler|ver) (?:depois|mais tarde)",
            "para (?:ler|ver)",
        ],
    )
});

#[derive(Debug, Clone, Copy, Default)]
pub struct LinksEvaluator;

impl ModuleEvaluator for LinksEvaluator {
    fn module(&self) -> ModuleId {
        ModuleId::Links
    }

    fn mentions_intent(&self, folded: &str) -> bool {
        LINK_KEYWORDS.any(folded) || LINK_INTENT.any(folded)
    }

    fn evaluate(&self, signal: &PreparedSignal<'_>) -> ModuleEvaluation {
        let mut trail = Trail::new(ModuleId::Links);

        let keywords = LINK_KEYWORDS.matches(&signal.folded);
        let intent = LINK_INTENT.any(&signal.folded);
        let link = extract_url(&signal.text);
        let title = extract_link_title(&signal.text, link.as_ref());

        trail.note("keyword_hits", keywords.len());
        trail.note("intent", intent);
        if let Some(l) = &link {
            trail.note("url", &l.url);
        }

        let keyword_score = W_KEYWORDS * density(keywords.len(), KEYWORD_SATURATION);
        let intent_score = W_INTENT * flag(intent);
        let url_score = W_URL * flag(link.is_some());
        let title_score = W_TITLE * flag(title.is_some());
        let voice_score = W_VOICE * flag(signal.is_voice());

        trail.score("keyword_score", keyword_score);
        trail.score("intent_score", intent_score);
        trail.score("url_score", url_score);
        trail.score("title_score", title_score);
        if signal.is_voice() {
            trail.score("voice_score", voice_score);
        }

        let confidence =
            clamp_unit(keyword_score + intent_score + url_score + title_score + voice_score);
        let strict = link.is_some() && intent;
        trail.score("confidence", confidence);
        trail.note("strict", strict);

        ModuleEvaluation {
            module: ModuleId::Links,
            confidence,
            strict_parameters_met: strict,
            reason: trail.into_entries(),
            extracted: ExtractedFields::Links(LinksFields {
                url: link.map(|l| l.url),
                title,
                keywords,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DispatcherInput;

    fn evaluate(input: &DispatcherInput) -> ModuleEvaluation {
        LinksEvaluator.evaluate(&PreparedSignal::new(input))
    }

    #[test]
    fn test_save_article() {
        let eval = evaluate(&DispatcherInput::text(
            "guarda este artigo sobre rust https://example.com/rust para ler depois",
        ));
        // .17 keyword + .18 intent + .38 url + .10 title
        assert!((eval.confidence - 0.83).abs() < 1e-4);
        assert!(eval.strict_parameters_met);

        let fields = eval.extracted.as_links().unwrap();
        assert_eq!(fields.url.as_deref(), Some("https://example.com/rust"));
        assert_eq!(fields.title.as_deref(), Some("artigo sobre rust"));
    }

    #[test]
    fn test_url_without_intent_is_not_strict() {
        let eval = evaluate(&DispatcherInput::text("example.com"));
        assert!(!eval.strict_parameters_met);
        assert_eq!(
            eval.extracted.as_links().unwrap().url.as_deref(),
            Some("https://example.com")
        );
    }

    #[test]
    fn test_intent_without_url_is_not_strict() {
        let eval = evaluate(&DispatcherInput::text("guarda isto para ler depois"));
        assert!(!eval.strict_parameters_met);
        assert_eq!(eval.extracted.as_links().unwrap().url, None);
    }

    #[test]
    fn test_mentions_intent() {
        assert!(LinksEvaluator.mentions_intent("ver mais tarde"));
        assert!(LinksEvaluator.mentions_intent("um video giro"));
        assert!(!LinksEvaluator.mentions_intent("o gato dorme"));
    }
}
