use crate::error::{MatcherError, Result};
use crate::label_policy::LabelPolicy;
use crate::linear::{
    labelled_documents, log_loss, pair_document, read_model, sigmoid, write_model, LinearModel,
};
use crate::matcher::Matcher;
use kpm_model::{Dataset, Label, Labels, LabelledDataset, PairId};
use kpm_text::{Analyzer, AnalyzerConfig, Encoding, SparseVector, Vectorizer};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::Path;

const LOG_EVERY: usize = 50;
const PLATT_MAX_ITER: usize = 100;
const PLATT_MIN_STEP: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SvcConfig {
    pub encoding: Encoding,
    /// Inverse L2 regularisation strength
    pub c: f64,
    pub max_iter: usize,
    /// Initial step size; decays with the square root of the iteration
    pub learning_rate: f64,
    pub label_policy: LabelPolicy,
}

impl Default for SvcConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::BagOfWords,
            c: 1.0,
            max_iter: 1000,
            learning_rate: 0.5,
            label_policy: LabelPolicy::Skip,
        }
    }
}

impl SvcConfig {
    pub fn validate(&self) -> Result<()> {
        if self.c.is_nan() || self.c <= 0.0 {
            return Err(MatcherError::invalid_config("svc c must be positive"));
        }
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(MatcherError::invalid_config(
                "svc learning_rate must be positive",
            ));
        }
        if self.max_iter == 0 {
            return Err(MatcherError::invalid_config("svc max_iter must be at least 1"));
        }
        Ok(())
    }
}

/// Platt scaling: `p = sigmoid(a * decision + b)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Calibration {
    a: f64,
    b: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SvcModel {
    linear: LinearModel,
    calibration: Calibration,
}

impl SvcModel {
    fn probability(&self, document: &[String]) -> f64 {
        let decision = self.linear.decide(document);
        sigmoid(self.calibration.a * decision + self.calibration.b)
    }
}

/// Linear support vector classifier over the vectorized terms of argument
/// and key point, with Platt-scaled probabilities as scores.
///
/// Pairs with a target of at least `0.5` are the positive class. The margin
/// is trained by subgradient descent on the L2-regularised hinge loss, then a
/// sigmoid is fitted to the training decisions.
pub struct SvcMatcher {
    config: SvcConfig,
    analyzer: Analyzer,
    model: Option<SvcModel>,
}

impl SvcMatcher {
    pub fn new(config: SvcConfig) -> Self {
        Self {
            config,
            analyzer: Analyzer::new(AnalyzerConfig::stemmed()),
            model: None,
        }
    }

    fn fit(&self, documents: &[Vec<String>], positives: &[bool]) -> SvcModel {
        let vectorizer = Vectorizer::fit(self.config.encoding, documents);
        let rows: Vec<SparseVector> = documents
            .iter()
            .map(|doc| vectorizer.transform(doc))
            .collect();
        let signs: Vec<f64> = positives
            .iter()
            .map(|positive| if *positive { 1.0 } else { -1.0 })
            .collect();
        let dim = vectorizer.vocabulary_size();
        let n = rows.len() as f64;
        let reg = 1.0 / (self.config.c * n);

        let mut linear = LinearModel::zeros(vectorizer);
        for iteration in 0..self.config.max_iter {
            let mut grad_w = Array1::<f64>::zeros(dim);
            let mut grad_b = 0.0;
            let mut hinge = 0.0;
            for (row, sign) in rows.iter().zip(&signs) {
                let margin = sign * linear.decision(row);
                if margin < 1.0 {
                    hinge += 1.0 - margin;
                    for (idx, value) in row.entries() {
                        grad_w[*idx] -= sign * value;
                    }
                    grad_b -= sign;
                }
            }
            grad_w /= n;
            grad_w.scaled_add(reg, &linear.weights);
            grad_b /= n;

            let step = self.config.learning_rate / ((iteration + 1) as f64).sqrt();
            linear.weights.scaled_add(-step, &grad_w);
            linear.bias -= step * grad_b;

            if iteration % LOG_EVERY == 0 {
                let objective = hinge / n + 0.5 * reg * linear.weights.dot(&linear.weights);
                log::debug!("iteration {iteration}: objective {objective:.6}");
            }
        }

        let decisions: Vec<f64> = rows.iter().map(|row| linear.decision(row)).collect();
        let calibration = fit_platt(&decisions, positives);
        log::debug!(
            "Platt calibration a={:.4} b={:.4}",
            calibration.a,
            calibration.b
        );
        SvcModel {
            linear,
            calibration,
        }
    }

    fn mean_log_loss(
        &self,
        model: &SvcModel,
        documents: &[Vec<String>],
        targets: &[Label],
    ) -> f64 {
        if documents.is_empty() {
            return 0.0;
        }
        let total: f64 = documents
            .iter()
            .zip(targets)
            .map(|(doc, target)| log_loss(model.probability(doc), *target))
            .sum();
        total / documents.len() as f64
    }
}

impl Matcher for SvcMatcher {
    fn slug(&self) -> String {
        let defaults = SvcConfig::default();
        let mut slug = format!("svc-{}", self.config.encoding.slug());
        if self.config.c != defaults.c {
            slug.push_str(&format!("-c-{}", self.config.c));
        }
        if self.config.max_iter != defaults.max_iter {
            slug.push_str(&format!("-iter-{}", self.config.max_iter));
        }
        if self.config.learning_rate != defaults.learning_rate {
            slug.push_str(&format!("-learn-{}", self.config.learning_rate));
        }
        slug.push_str(self.config.label_policy.slug_suffix());
        slug
    }

    fn name(&self) -> String {
        format!("Linear SVC ({})", self.config.encoding.slug())
    }

    fn prepare(&mut self) -> Result<()> {
        self.config.validate()
    }

    fn needs_training(&self) -> bool {
        true
    }

    fn load_model(&mut self, path: &Path) -> Result<bool> {
        if self.model.is_some() {
            return Ok(true);
        }
        let Some(model) = read_model::<SvcModel>(path)? else {
            return Ok(false);
        };
        let calibrated = model.calibration.a.is_finite() && model.calibration.b.is_finite();
        if !model.linear.is_consistent() || !calibrated {
            log::warn!(
                "Cached model in {} is inconsistent; retraining",
                path.display()
            );
            return Ok(false);
        }
        self.model = Some(model);
        Ok(true)
    }

    fn save_model(&self, path: &Path) -> Result<()> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| MatcherError::NotTrained(self.slug()))?;
        write_model(path, model)
    }

    fn train(
        &mut self,
        train_data: &LabelledDataset,
        dev_data: &LabelledDataset,
        _cache_path: &Path,
    ) -> Result<()> {
        let (documents, targets) =
            labelled_documents(&self.analyzer, train_data, self.config.label_policy);
        if documents.is_empty() {
            return Err(MatcherError::Training(
                "no labelled candidate pairs in training data".to_string(),
            ));
        }
        let positives: Vec<bool> = targets.iter().map(|target| *target >= 0.5).collect();
        log::info!(
            "Training {} on {} pairs ({} positive)",
            self.slug(),
            documents.len(),
            positives.iter().filter(|positive| **positive).count()
        );

        let model = self.fit(&documents, &positives);
        log::info!(
            "Train log-loss {:.4}",
            self.mean_log_loss(&model, &documents, &targets)
        );

        let (dev_documents, dev_targets) =
            labelled_documents(&self.analyzer, dev_data, self.config.label_policy);
        if !dev_documents.is_empty() {
            log::info!(
                "Dev log-loss {:.4} on {} pairs",
                self.mean_log_loss(&model, &dev_documents, &dev_targets),
                dev_documents.len()
            );
        }

        self.model = Some(model);
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> Result<Labels> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| MatcherError::NotTrained(self.slug()))?;
        Ok(data
            .candidate_pairs()
            .map(|(argument, key_point)| {
                let document = pair_document(&self.analyzer, &argument.text, &key_point.text);
                (PairId::of(argument, key_point), model.probability(&document))
            })
            .collect())
    }
}

/// Fit `sigmoid(a * f + b)` to the classes of the decision values `f` by
/// Newton's method with step halving, on Platt's smoothed targets.
fn fit_platt(decisions: &[f64], positives: &[bool]) -> Calibration {
    let n_pos = positives.iter().filter(|positive| **positive).count() as f64;
    let n_neg = positives.len() as f64 - n_pos;
    let high = (n_pos + 1.0) / (n_pos + 2.0);
    let low = 1.0 / (n_neg + 2.0);
    let targets: Vec<f64> = positives
        .iter()
        .map(|positive| if *positive { high } else { low })
        .collect();

    let loss = |a: f64, b: f64| -> f64 {
        decisions
            .iter()
            .zip(&targets)
            .map(|(f, t)| log_loss(sigmoid(a * f + b), *t))
            .sum()
    };

    let mut a = 0.0;
    let mut b = ((n_pos + 1.0) / (n_neg + 1.0)).ln();
    let mut current = loss(a, b);
    for _ in 0..PLATT_MAX_ITER {
        let (mut g_a, mut g_b) = (0.0, 0.0);
        let (mut h_aa, mut h_ab, mut h_bb) = (1e-12, 0.0, 1e-12);
        for (f, t) in decisions.iter().zip(&targets) {
            let p = sigmoid(a * f + b);
            let d = p - t;
            let w = p * (1.0 - p);
            g_a += d * f;
            g_b += d;
            h_aa += w * f * f;
            h_ab += w * f;
            h_bb += w;
        }
        if g_a.abs() < 1e-9 && g_b.abs() < 1e-9 {
            break;
        }
        let det = h_aa * h_bb - h_ab * h_ab;
        if det <= 0.0 {
            break;
        }
        let step_a = (h_bb * g_a - h_ab * g_b) / det;
        let step_b = (h_aa * g_b - h_ab * g_a) / det;

        let mut scale = 1.0;
        let mut improved = false;
        while scale >= PLATT_MIN_STEP {
            let (next_a, next_b) = (a - scale * step_a, b - scale * step_b);
            let next = loss(next_a, next_b);
            if next < current {
                a = next_a;
                b = next_b;
                current = next;
                improved = true;
                break;
            }
            scale /= 2.0;
        }
        if !improved {
            break;
        }
    }
    Calibration { a, b }
}
