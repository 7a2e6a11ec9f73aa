use crate::metric::Metric;
use crate::mode::{discretize, EvaluationMode, Outcome};
use kpm_model::{Labels, LabelledDataset};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
    pub true_negatives: usize,
}

impl ConfusionMatrix {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let mut matrix = Self::default();
        for outcome in outcomes {
            match (outcome.predicted, outcome.actual) {
                (true, true) => matrix.true_positives += 1,
                (true, false) => matrix.false_positives += 1,
                (false, true) => matrix.false_negatives += 1,
                (false, false) => matrix.true_negatives += 1,
            }
        }
        matrix
    }

    /// Counts with positive and negative class swapped
    #[must_use]
    pub fn inverted(self) -> Self {
        Self {
            true_positives: self.true_negatives,
            false_positives: self.false_negatives,
            false_negatives: self.false_positives,
            true_negatives: self.true_positives,
        }
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_positives)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positives, self.true_positives + self.false_negatives)
    }

    pub fn f1(&self) -> f64 {
        let precision = self.precision();
        let recall = self.recall();
        if precision + recall == 0.0 {
            return 0.0;
        }
        2.0 * precision * recall / (precision + recall)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Score {
    Precision,
    Recall,
    F1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Averaging {
    /// Positive class only
    Binary,
    /// Unweighted mean over the match and no-match classes
    Macro,
}

/// Precision, recall or F1 over pairs discretised at the match threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassificationMetric {
    score: Score,
    averaging: Averaging,
}

impl ClassificationMetric {
    pub const fn new(score: Score, averaging: Averaging) -> Self {
        Self { score, averaging }
    }

    pub const fn precision() -> Self {
        Self::new(Score::Precision, Averaging::Binary)
    }

    pub const fn macro_precision() -> Self {
        Self::new(Score::Precision, Averaging::Macro)
    }

    pub const fn recall() -> Self {
        Self::new(Score::Recall, Averaging::Binary)
    }

    pub const fn macro_recall() -> Self {
        Self::new(Score::Recall, Averaging::Macro)
    }

    pub const fn f1() -> Self {
        Self::new(Score::F1, Averaging::Binary)
    }

    pub const fn macro_f1() -> Self {
        Self::new(Score::F1, Averaging::Macro)
    }

    fn score_of(&self, matrix: &ConfusionMatrix) -> f64 {
        match self.score {
            Score::Precision => matrix.precision(),
            Score::Recall => matrix.recall(),
            Score::F1 => matrix.f1(),
        }
    }
}

impl Metric for ClassificationMetric {
    fn slug(&self) -> &'static str {
        match (self.averaging, self.score) {
            (Averaging::Binary, Score::Precision) => "precision",
            (Averaging::Binary, Score::Recall) => "recall",
            (Averaging::Binary, Score::F1) => "f1",
            (Averaging::Macro, Score::Precision) => "macro-precision",
            (Averaging::Macro, Score::Recall) => "macro-recall",
            (Averaging::Macro, Score::F1) => "macro-f1",
        }
    }

    fn name(&self) -> &'static str {
        match (self.averaging, self.score) {
            (Averaging::Binary, Score::Precision) => "Precision",
            (Averaging::Binary, Score::Recall) => "Recall",
            (Averaging::Binary, Score::F1) => "F1 score",
            (Averaging::Macro, Score::Precision) => "Macro precision",
            (Averaging::Macro, Score::Recall) => "Macro recall",
            (Averaging::Macro, Score::F1) => "Macro F1 score",
        }
    }

    fn evaluate(&self, predicted: &Labels, data: &LabelledDataset, mode: EvaluationMode) -> f64 {
        let outcomes = discretize(predicted, &data.labels, mode);
        let matrix = ConfusionMatrix::from_outcomes(&outcomes);
        match self.averaging {
            Averaging::Binary => self.score_of(&matrix),
            Averaging::Macro => {
                (self.score_of(&matrix) + self.score_of(&matrix.inverted())) / 2.0
            }
        }
    }
}
