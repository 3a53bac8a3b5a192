//! Strategy selection
//!
//! - below [`MIN_CONFIDENCE`] the winner is rejected outright
//! - `tactical_reflex` needs both confidence at or above the reflex
//!   threshold and every strict parameter present
//! - anything else is `semantic_deep_dive`

use crate::types::{ModuleEvaluation, Strategy};

/// Winners scoring below this are handed to the conversational fallback.
pub const MIN_CONFIDENCE: f32 = 0.12;

/// True when the winner scored high enough to be routed at all.
pub fn passes_min_confidence(winner: &ModuleEvaluation) -> bool {
    winner.confidence >= MIN_CONFIDENCE
}

/// Execution mode for an accepted winner.
pub fn select_strategy(winner: &ModuleEvaluation, reflex_threshold: f32) -> Strategy {
    if winner.confidence >= reflex_threshold && winner.strict_parameters_met {
        Strategy::TacticalReflex
    } else {
        Strategy::SemanticDeepDive
    }
}
