//! Module chooser
//!
//! Highest confidence wins. On an exact tie a strict evaluation beats a
//! non-strict one; otherwise the earlier evaluation (Finance, Todo, Crypto,
//! Links) keeps its place.

use crate::types::ModuleEvaluation;

/// Index of the winning evaluation, `None` for an empty slice.
pub fn choose(evaluations: &[ModuleEvaluation]) -> Option<usize> {
    let mut best: Option<usize> = None;

    for (idx, candidate) in evaluations.iter().enumerate() {
        let replace = match best {
            None => true,
            Some(b) => beats(candidate, &evaluations[b]),
        };
        if replace {
            best = Some(idx);
        }
    }

    best
}

/// True when `candidate` should displace the current best.
fn beats(candidate: &ModuleEvaluation, current: &ModuleEvaluation) -> bool {
    if candidate.confidence > current.confidence {
        return true;
    }
    candidate.confidence == current.confidence
        && candidate.strict_parameters_met
        && !current.strict_parameters_met
}
