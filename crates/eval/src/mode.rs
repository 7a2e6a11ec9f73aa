use kpm_model::{Label, Labels, PairId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Scores at or above this are treated as a match
pub const MATCH_THRESHOLD: Label = 0.5;

/// How candidate pairs without an annotation count as ground truth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMode {
    /// Unannotated pairs do not match
    Strict,
    /// Unannotated pairs match
    Relaxed,
}

impl EvaluationMode {
    pub const ALL: [Self; 2] = [Self::Strict, Self::Relaxed];

    /// Ground truth assumed for a pair nobody annotated
    #[must_use]
    pub const fn unannotated(self) -> bool {
        matches!(self, Self::Relaxed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Relaxed => "relaxed",
        }
    }
}

impl fmt::Display for EvaluationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[must_use]
pub fn is_match(label: Label) -> bool {
    label >= MATCH_THRESHOLD
}

/// Discrete prediction and truth of one pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub predicted: bool,
    pub actual: bool,
}

/// Binary outcomes over the union of predicted and annotated pairs.
///
/// Missing predictions count as no match; missing annotations follow `mode`.
pub fn discretize(predicted: &Labels, truth: &Labels, mode: EvaluationMode) -> Vec<Outcome> {
    let pairs: BTreeSet<&PairId> = predicted.pairs().chain(truth.pairs()).collect();
    pairs
        .into_iter()
        .map(|pair| Outcome {
            predicted: predicted.get(pair).is_some_and(is_match),
            actual: truth.get(pair).map_or(mode.unannotated(), is_match),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn union_of_pairs_with_mode_defaults() {
        let predicted: Labels = [(PairId::new("a1", "k1"), 0.7), (PairId::new("a1", "k2"), 0.2)]
            .into_iter()
            .collect();
        let truth: Labels = [(PairId::new("a1", "k1"), 1.0), (PairId::new("a2", "k1"), 0.0)]
            .into_iter()
            .collect();

        let strict = discretize(&predicted, &truth, EvaluationMode::Strict);
        assert_eq!(
            strict,
            vec![
                Outcome { predicted: true, actual: true },
                Outcome { predicted: false, actual: false },
                Outcome { predicted: false, actual: false },
            ]
        );

        let relaxed = discretize(&predicted, &truth, EvaluationMode::Relaxed);
        assert_eq!(relaxed[1], Outcome { predicted: false, actual: true });
    }

    #[test]
    fn threshold_is_inclusive() {
        assert!(is_match(0.5));
        assert!(!is_match(0.4999));
    }
}
