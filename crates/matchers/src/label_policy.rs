use kpm_model::{Argument, KeyPoint, Label, LabelledDataset, PairId};
use serde::{Deserialize, Serialize};

/// How candidate pairs without an annotation are used for training
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Leave unannotated pairs out
    #[default]
    Skip,
    /// Unannotated pairs do not match
    Strict,
    /// Unannotated pairs match
    Relaxed,
}

impl LabelPolicy {
    /// Suffix appended to matcher slugs; empty for the default policy
    #[must_use]
    pub const fn slug_suffix(self) -> &'static str {
        match self {
            Self::Skip => "",
            Self::Strict => "-strict",
            Self::Relaxed => "-relaxed",
        }
    }

    #[must_use]
    pub const fn fill_value(self) -> Option<Label> {
        match self {
            Self::Skip => None,
            Self::Strict => Some(0.0),
            Self::Relaxed => Some(1.0),
        }
    }
}

/// A candidate pair with its training target
#[derive(Debug, Clone, Copy)]
pub struct TrainingPair<'a> {
    pub argument: &'a Argument,
    pub key_point: &'a KeyPoint,
    pub label: Label,
}

/// Candidate pairs of `data` with training targets under `policy`
pub fn training_pairs(data: &LabelledDataset, policy: LabelPolicy) -> Vec<TrainingPair<'_>> {
    data.candidate_pairs()
        .filter_map(|(argument, key_point)| {
            let label = data
                .labels
                .get(&PairId::of(argument, key_point))
                .or_else(|| policy.fill_value())?;
            Some(TrainingPair {
                argument,
                key_point,
                label,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_data;

    #[test]
    fn skip_keeps_only_annotated_pairs() {
        let data = sample_data();
        let pairs = training_pairs(&data, LabelPolicy::Skip);
        assert_eq!(pairs.len(), data.labels.len());
    }

    #[test]
    fn strict_and_relaxed_fill_unannotated_pairs() {
        let data = sample_data();
        let total = data.candidate_pairs().count();

        let strict = training_pairs(&data, LabelPolicy::Strict);
        assert_eq!(strict.len(), total);
        let relaxed = training_pairs(&data, LabelPolicy::Relaxed);
        assert_eq!(relaxed.len(), total);

        let unannotated = |pair: &TrainingPair<'_>| {
            !data
                .labels
                .contains(&PairId::of(pair.argument, pair.key_point))
        };
        assert!(strict
            .iter()
            .filter(|p| unannotated(p))
            .all(|p| p.label == 0.0));
        assert!(relaxed
            .iter()
            .filter(|p| unannotated(p))
            .all(|p| p.label == 1.0));
    }
}
