//! # KPM Eval
//!
//! Metrics of the key point matching shared task.
//!
//! Every metric is computed twice: in [`EvaluationMode::Strict`] candidate
//! pairs without annotation count as no match, in
//! [`EvaluationMode::Relaxed`] they count as match.
//!
//! | Slug | Metric |
//! |------|--------|
//! | `map` | [`MeanAveragePrecision`] (main shared task metric) |
//! | `precision`, `recall`, `f1` | [`ClassificationMetric`], positive class |
//! | `macro-precision`, `macro-recall`, `macro-f1` | [`ClassificationMetric`], both classes |

mod average_precision;
mod classification;
mod metric;
mod mode;

#[cfg(test)]
mod test_support;

pub use average_precision::{average_precision, MeanAveragePrecision};
pub use classification::{Averaging, ClassificationMetric, ConfusionMatrix, Score};
pub use metric::{all_metrics, metric_by_slug, metric_slugs, Evaluation, Metric};
pub use mode::{discretize, is_match, EvaluationMode, Outcome, MATCH_THRESHOLD};
