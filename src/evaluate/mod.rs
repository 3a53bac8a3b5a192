//! Module evaluators
//!
//! Each evaluator turns a prepared signal into a [`ModuleEvaluation`]: a
//! confidence in `[0, 1]`, a strict-parameters flag, and an append-only
//! reason trail recording every component it scored.
//!
//! Evaluators are independent of each other and of call order; the
//! dispatcher runs all of them and lets the chooser decide.

pub mod crypto;
pub mod finance;
pub mod links;
pub mod todo;

use std::fmt::Display;

use crate::text::fold;
use crate::types::{DispatcherInput, ModuleEvaluation, ModuleId, OcrTraceInput, SignalType};

pub use crypto::CryptoEvaluator;
pub use finance::FinanceEvaluator;
pub use links::LinksEvaluator;
pub use todo::TodoEvaluator;

/// Keyword hits at which keyword density saturates.
pub const KEYWORD_SATURATION: usize = 2;

/// Scores one downstream module.
pub trait ModuleEvaluator: Send + Sync {
    fn module(&self) -> ModuleId;

    fn evaluate(&self, signal: &PreparedSignal<'_>) -> ModuleEvaluation;

    /// True when the folded text carries one of this module's keywords or
    /// action verbs. The gatekeeper never deflects such a signal.
    fn mentions_intent(&self, folded: &str) -> bool;
}

/// The four built-in evaluators, in chooser tie-break order.
pub fn default_evaluators() -> Vec<Box<dyn ModuleEvaluator>> {
    vec![
        Box::new(FinanceEvaluator),
        Box::new(TodoEvaluator),
        Box::new(CryptoEvaluator),
        Box::new(LinksEvaluator),
    ]
}

/// A signal with its derived text forms computed once per call.
#[derive(Debug, Clone)]
pub struct PreparedSignal<'a> {
    pub input: &'a DispatcherInput,
    /// Trimmed, lower-cased text; keeps accents for display fields.
    pub text: String,
    /// Accent-folded text that lexicons and patterns match against.
    pub folded: String,
}

impl<'a> PreparedSignal<'a> {
    pub fn new(input: &'a DispatcherInput) -> Self {
        let text = input.normalized_text.trim().to_lowercase();
        let folded = fold(&text);
        Self {
            input,
            text,
            folded,
        }
    }

    pub fn signal_type(&self) -> SignalType {
        self.input.signal_type
    }

    pub fn is_voice(&self) -> bool {
        self.input.signal_type == SignalType::Voice
    }

    pub fn ocr_trace(&self) -> Option<&OcrTraceInput> {
        self.input.ocr_trace.as_ref()
    }
}

/// Reason trail for one module, keyed `<module>.<component>=<value>`.
#[derive(Debug)]
pub(crate) struct Trail {
    module: ModuleId,
    entries: Vec<String>,
}

impl Trail {
    pub(crate) fn new(module: ModuleId) -> Self {
        Self {
            module,
            entries: Vec::new(),
        }
    }

    pub(crate) fn note(&mut self, key: &str, value: impl Display) {
        self.entries.push(format!("{}.{}={}", self.module, key, value));
    }

    /// Record a weighted component score.
    pub(crate) fn score(&mut self, key: &str, value: f32) {
        self.note(key, format_args!("{:.2}", value));
    }

    pub(crate) fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

/// Clamp into `[0, 1]`; NaN counts as zero.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// 1.0 when the condition holds, else 0.0.
pub(crate) fn flag(condition: bool) -> f32 {
    if condition {
        1.0
    } else {
        0.0
    }
}
