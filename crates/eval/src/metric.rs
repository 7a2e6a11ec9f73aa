use crate::average_precision::MeanAveragePrecision;
use crate::classification::ClassificationMetric;
use crate::mode::EvaluationMode;
use kpm_model::{Labels, LabelledDataset};
use serde::{Deserialize, Serialize};

/// Scores predicted labels against the annotations of a labelled dataset
pub trait Metric: Send + Sync {
    /// Stable identifier used on the command line and in reports
    fn slug(&self) -> &'static str;

    fn name(&self) -> &'static str;

    /// Score in `[0, 1]`, higher is better
    fn evaluate(&self, predicted: &Labels, data: &LabelledDataset, mode: EvaluationMode) -> f64;
}

/// Every available metric, the shared task's main metric first
pub fn all_metrics() -> Vec<Box<dyn Metric>> {
    vec![
        Box::new(MeanAveragePrecision),
        Box::new(ClassificationMetric::precision()),
        Box::new(ClassificationMetric::macro_precision()),
        Box::new(ClassificationMetric::recall()),
        Box::new(ClassificationMetric::macro_recall()),
        Box::new(ClassificationMetric::f1()),
        Box::new(ClassificationMetric::macro_f1()),
    ]
}

pub fn metric_by_slug(slug: &str) -> Option<Box<dyn Metric>> {
    all_metrics().into_iter().find(|metric| metric.slug() == slug)
}

pub fn metric_slugs() -> Vec<&'static str> {
    all_metrics().iter().map(|metric| metric.slug()).collect()
}

/// Result of one metric in both evaluation modes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub metric: String,
    pub strict: f64,
    pub relaxed: f64,
}

impl Evaluation {
    pub fn run(metric: &dyn Metric, predicted: &Labels, data: &LabelledDataset) -> Self {
        if !data.is_labelled() {
            log::warn!("Evaluating against a dataset without annotations");
        }
        let strict = metric.evaluate(predicted, data, EvaluationMode::Strict);
        let relaxed = metric.evaluate(predicted, data, EvaluationMode::Relaxed);
        log::debug!(
            "{}: strict {strict:.4}, relaxed {relaxed:.4}",
            metric.slug()
        );
        Self {
            metric: metric.slug().to_string(),
            strict,
            relaxed,
        }
    }

    pub fn get(&self, mode: EvaluationMode) -> f64 {
        match mode {
            EvaluationMode::Strict => self.strict,
            EvaluationMode::Relaxed => self.relaxed,
        }
    }

    /// Mean of strict and relaxed, the shared task's ranking score
    pub fn mean(&self) -> f64 {
        (self.strict + self.relaxed) / 2.0
    }
}
