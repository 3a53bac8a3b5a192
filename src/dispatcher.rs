//! Intent dispatcher
//!
//! Public entry point. One call runs the whole pipeline:
//!
//! ```text
//! input → gatekeeper ──(chat)──────────────────────────→ deep_dive
//!            │
//!            └→ finance / todo / crypto / links → chooser
//!                                                   │
//!                          below MIN_CONFIDENCE ────┴──→ deep_dive
//!                                                   │
//!                                                strategy → result
//! ```
//!
//! The dispatcher holds nothing but the reflex threshold and the evaluator
//! list, both fixed at construction, so one instance can be shared across
//! threads.

use tracing::debug;

use crate::chooser::choose;
use crate::config::{clamp_threshold, DispatcherConfig, DEFAULT_REFLEX_THRESHOLD};
use crate::error::Result;
use crate::evaluate::{default_evaluators, ModuleEvaluator, PreparedSignal};
use crate::gatekeeper::screen;
use crate::strategy::{passes_min_confidence, select_strategy};
use crate::types::{DispatcherInput, DispatcherResult};

/// Routes a signal to a module and an execution strategy.
pub struct IntentDispatcher {
    reflex_threshold: f32,
    evaluators: Vec<Box<dyn ModuleEvaluator>>,
}

impl Default for IntentDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_REFLEX_THRESHOLD)
    }
}

impl std::fmt::Debug for IntentDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let modules: Vec<_> = self.evaluators.iter().map(|e| e.module()).collect();
        f.debug_struct("IntentDispatcher")
            .field("reflex_threshold", &self.reflex_threshold)
            .field("evaluators", &modules)
            .finish()
    }
}

impl IntentDispatcher {
    /// Build with the built-in evaluators. The threshold is clamped into
    /// `[0, 1]`.
    pub fn new(reflex_threshold: f32) -> Self {
        Self::with_evaluators(reflex_threshold, default_evaluators())
    }

    /// Build from configuration, honoring its threshold policy.
    pub fn from_config(config: &DispatcherConfig) -> Result<Self> {
        Ok(Self::new(config.effective_threshold()?))
    }

    /// Build with a custom evaluator list. List order is the chooser's
    /// tie-break order.
    pub fn with_evaluators(reflex_threshold: f32, evaluators: Vec<Box<dyn ModuleEvaluator>>) -> Self {
        Self {
            reflex_threshold: clamp_threshold(reflex_threshold),
            evaluators,
        }
    }

    pub fn reflex_threshold(&self) -> f32 {
        self.reflex_threshold
    }

    /// Decide which module handles `input` and how.
    pub fn evaluate(&self, input: &DispatcherInput) -> DispatcherResult {
        let signal = PreparedSignal::new(input);
        let threshold_note = format!("reflex_threshold={:.2}", self.reflex_threshold);
        let mut reason = vec![format!("signal_type={}", input.signal_type)];

        // ---- Gatekeeper ----------------------------------------------------
        if let Some(verdict) = screen(&signal, &self.evaluators) {
            debug!(signals = ?verdict.signals, "Signal deflected as conversational");
            reason.push("gatekeeper=conversational".to_string());
            reason.extend(
                verdict
                    .signals
                    .iter()
                    .map(|s| format!("gatekeeper.signal={}", s)),
            );
            reason.push(threshold_note);
            return DispatcherResult::deflected(reason);
        }
        reason.push("gatekeeper=pass".to_string());

        // ---- Evaluators ----------------------------------------------------
        let mut evaluations: Vec<_> = self
            .evaluators
            .iter()
            .map(|e| e.evaluate(&signal))
            .collect();

        for eval in &evaluations {
            debug!(
                module = %eval.module,
                confidence = eval.confidence,
                strict = eval.strict_parameters_met,
                "Module scored"
            );
            reason.push(format!("score.{}={:.2}", eval.module, eval.confidence));
        }
        reason.push(threshold_note);

        // ---- Chooser -------------------------------------------------------
        let Some(idx) = choose(&evaluations) else {
            reason.push("no_evaluators".to_string());
            return DispatcherResult::deflected(reason);
        };
        let winner = evaluations.swap_remove(idx);

        if !passes_min_confidence(&winner) {
            debug!(
                module = %winner.module,
                confidence = winner.confidence,
                "Winner below minimum confidence"
            );
            reason.push("low_confidence_fallback".to_string());
            reason.push(format!("rejected_module={}", winner.module));
            reason.push(format!("rejected_confidence={:.2}", winner.confidence));
            return DispatcherResult::deflected(reason);
        }

        // ---- Strategy ------------------------------------------------------
        let strategy = select_strategy(&winner, self.reflex_threshold);
        debug!(module = %winner.module, strategy = %strategy, "Dispatch decided");

        reason.push(format!("winner={}", winner.module));
        reason.extend(winner.reason);
        reason.push(format!("strategy={}", strategy));

        DispatcherResult {
            module: winner.module,
            strategy,
            confidence: winner.confidence,
            reason,
            strict_parameters_met: winner.strict_parameters_met,
            extracted: winner.extracted,
        }
    }
}
