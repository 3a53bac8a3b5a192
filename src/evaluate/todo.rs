//! Todo evaluator (task creation)
//!
//! | Component | Weight |
//! |---|---|
//! | keyword density | 0.46 |
//! | action verb | 0.24 |
//! | temporal word | 0.20 |
//! | actionable title | 0.10 |
//! | voice origin | +0.06 |
//!
//! Strict when the title is actionable and the signal either names a todo
//! keyword or pairs an action verb with a time reference.

use std::sync::LazyLock;

use super::{clamp_unit, flag, ModuleEvaluator, PreparedSignal, Trail, KEYWORD_SATURATION};
use crate::extract::{extract_todo_title, is_actionable};
use crate::lexicon::{density, Lexicon};
use crate::types::{ExtractedFields, ModuleEvaluation, ModuleId, TodoFields};

pub const W_KEYWORDS: f32 = 0.46;
pub const W_ACTION: f32 = 0.24;
pub const W_TEMPORAL: f32 = 0.20;
pub const W_ACTIONABLE: f32 = 0.10;
pub const W_VOICE: f32 = 0.06;

pub static TODO_KEYWORDS: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        "todo",
        &[
            "tarefas?",
            "lembretes?",
            "lembra(?:-me|r)?",
            "lembrar-me",
            "to-?do",
            "afazeres",
            "nao esquecer",
            "nao me esquecer",
            "reuniao",
            "prazo",
            "agendar",
        ],
    )
});

/// Verbs that describe something to be done.
pub static TODO_ACTIONS: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        "todo_action",
        &[
            "ligar",
            "telefonar",
            "marcar",
            "enviar",
            "mandar",
            "comprar",
            "pagar",
            "levar",
            "buscar",
            "fazer",
            "tratar",
            "renovar",
            "responder",
            "falar",
            "limpar",
            "estudar",
            "entregar",
            "preparar",
            "reservar",
            "escrever",
            "rever",
            "cancelar",
        ],
    )
});

/// Time references; shared with the gatekeeper's short-message rule.
pub static TEMPORAL: LazyLock<Lexicon> = LazyLock::new(|| {
    Lexicon::new(
        "temporal",
        &[
            "hoje",
            "amanha",
            "logo",
            "segunda",
            "terca",
            "quarta",
            "quinta",
            "sexta",
            "sabado",
            "domingo",
            "semana",
            "mes",
            "proxim[oa]s?",
            "manha",
            "tarde",
            "noite",
            r"\d{1,2}h(?:\d{2})?",
            r"\d{1,2}:\d{2}",
            r"as \d{1,2}",
            r"dia \d{1,2}",
            "fim de semana",
        ],
    )
});

#[derive(Debug, Clone, Copy, Default)]
pub struct TodoEvaluator;

impl ModuleEvaluator for TodoEvaluator {
    fn module(&self) -> ModuleId {
        ModuleId::Todo
    }

    fn mentions_intent(&self, folded: &str) -> bool {
        TODO_KEYWORDS.any(folded) || TODO_ACTIONS.any(folded)
    }

    fn evaluate(&self, signal: &PreparedSignal<'_>) -> ModuleEvaluation {
        let mut trail = Trail::new(ModuleId::Todo);

        let keywords = TODO_KEYWORDS.matches(&signal.folded);
        let action = TODO_ACTIONS.first_term(&signal.folded);
        let temporal = TEMPORAL.any(&signal.folded);
        let title = extract_todo_title(&signal.text);
        let actionable = title.as_deref().is_some_and(is_actionable);

        trail.note("keyword_hits", keywords.len());
        if let Some(verb) = action {
            trail.note("action_verb", verb);
        }
        trail.note("temporal", temporal);
        trail.note("actionable", actionable);

        let keyword_score = W_KEYWORDS * density(keywords.len(), KEYWORD_SATURATION);
        let action_score = W_ACTION * flag(action.is_some());
        let temporal_score = W_TEMPORAL * flag(temporal);
        let actionable_score = W_ACTIONABLE * flag(actionable);
        let voice_score = W_VOICE * flag(signal.is_voice());

        trail.score("keyword_score", keyword_score);
        trail.score("action_score", action_score);
        trail.score("temporal_score", temporal_score);
        trail.score("actionable_score", actionable_score);
        if signal.is_voice() {
            trail.score("voice_score", voice_score);
        }

        let confidence = clamp_unit(
            keyword_score + action_score + temporal_score + actionable_score + voice_score,
        );
        let strict =
            actionable && (!keywords.is_empty() || (action.is_some() && temporal));
        trail.score("confidence", confidence);
        trail.note("strict", strict);

        ModuleEvaluation {
            module: ModuleId::Todo,
            confidence,
            strict_parameters_met: strict,
            reason: trail.into_entries(),
            extracted: ExtractedFields::Todo(TodoFields { title, keywords }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DispatcherInput;

    fn evaluate(input: &DispatcherInput) -> ModuleEvaluation {
        TodoEvaluator.evaluate(&PreparedSignal::new(input))
    }

    #[test]
    fn test_reminder_is_strict() {
        let eval = evaluate(&DispatcherInput::text("lembra-me ligar ao seguro amanha"));
        // .23 keyword + .24 action + .20 temporal + .10 actionable
        assert!((eval.confidence - 0.77).abs() < 1e-4);
        assert!(eval.strict_parameters_met);

        let fields = eval.extracted.as_todo().unwrap();
        assert_eq!(fields.title.as_deref(), Some("ligar ao seguro amanha"));
        assert_eq!(fields.keywords, vec!["lembra-me"]);
    }

    #[test]
    fn test_voice_boost() {
        let text = "lembra-me ligar ao seguro amanha";
        let typed = evaluate(&DispatcherInput::text(text));
        let spoken = evaluate(&DispatcherInput::voice(text));
        assert!((spoken.confidence - typed.confidence - W_VOICE).abs() < 1e-4);
    }

    #[test]
    fn test_action_and_time_without_keyword_is_strict() {
        let eval = evaluate(&DispatcherInput::text("pagar a renda amanha"));
        assert!(eval.strict_parameters_met);
        assert!((eval.confidence - 0.54).abs() < 1e-4);
    }

    #[test]
    fn test_action_without_time_is_not_strict() {
        let eval = evaluate(&DispatcherInput::text("ligar ao joao"));
        assert!(!eval.strict_parameters_met);
    }

    #[test]
    fn test_non_actionable_title_is_not_strict() {
        let eval = evaluate(&DispatcherInput::text("lembrete"));
        assert!(!eval.strict_parameters_met);
        assert_eq!(eval.extracted.as_todo().unwrap().title, None);
    }

    #[test]
    fn test_temporal_lexicon() {
        assert!(TEMPORAL.any("reuniao as 10"));
        assert!(TEMPORAL.any("sexta 18h30"));
        assert!(TEMPORAL.any("no fim de semana"));
        assert!(!TEMPORAL.any("o gato dorme"));
    }

    #[test]
    fn test_mentions_intent() {
        assert!(TodoEvaluator.mentions_intent("tenho de ligar ao banco"));
        assert!(TodoEvaluator.mentions_intent("nova tarefa"));
        assert!(!TodoEvaluator.mentions_intent("ola"));
    }
}
