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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionConfig {
    pub encoding: Encoding,
    /// Inverse L2 regularisation strength
    pub c: f64,
    pub max_iter: usize,
    pub learning_rate: f64,
    /// Stop when the objective improves by less than this
    pub tolerance: f64,
    pub label_policy: LabelPolicy,
}

impl Default for RegressionConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::BagOfWords,
            c: 16.0,
            max_iter: 500,
            learning_rate: 0.5,
            tolerance: 1e-7,
            label_policy: LabelPolicy::Skip,
        }
    }
}

impl RegressionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.c.is_nan() || self.c <= 0.0 {
            return Err(MatcherError::invalid_config("regression c must be positive"));
        }
        if self.learning_rate.is_nan() || self.learning_rate <= 0.0 {
            return Err(MatcherError::invalid_config(
                "regression learning_rate must be positive",
            ));
        }
        if self.max_iter == 0 {
            return Err(MatcherError::invalid_config(
                "regression max_iter must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Logistic regression over the vectorized terms of argument and key point.
///
/// Both texts are analyzed with stemming, concatenated into one document and
/// encoded as bag of words or tf-idf. Training is full-batch gradient descent
/// on sparse features with L2 regularisation.
pub struct RegressionMatcher {
    config: RegressionConfig,
    analyzer: Analyzer,
    model: Option<LinearModel>,
}

impl RegressionMatcher {
    pub fn new(config: RegressionConfig) -> Self {
        Self {
            config,
            analyzer: Analyzer::new(AnalyzerConfig::stemmed()),
            model: None,
        }
    }

    fn documents(&self, data: &LabelledDataset) -> (Vec<Vec<String>>, Vec<Label>) {
        labelled_documents(&self.analyzer, data, self.config.label_policy)
    }

    fn fit(&self, documents: &[Vec<String>], targets: &[Label]) -> LinearModel {
        let vectorizer = Vectorizer::fit(self.config.encoding, documents);
        let rows: Vec<SparseVector> = documents
            .iter()
            .map(|doc| vectorizer.transform(doc))
            .collect();
        let dim = vectorizer.vocabulary_size();
        let n = rows.len() as f64;
        let reg = 1.0 / (self.config.c * n);

        let mut model = LinearModel::zeros(vectorizer);

        let mut previous = f64::INFINITY;
        for iteration in 0..self.config.max_iter {
            let mut grad_w = Array1::<f64>::zeros(dim);
            let mut grad_b = 0.0;
            let mut loss = 0.0;
            for (row, target) in rows.iter().zip(targets) {
                let p = sigmoid(model.decision(row));
                let err = p - target;
                for (idx, value) in row.entries() {
                    grad_w[*idx] += err * value;
                }
                grad_b += err;
                loss += log_loss(p, *target);
            }
            grad_w /= n;
            grad_w.scaled_add(reg, &model.weights);
            grad_b /= n;
            let objective = loss / n + 0.5 * reg * model.weights.dot(&model.weights);

            model
                .weights
                .scaled_add(-self.config.learning_rate, &grad_w);
            model.bias -= self.config.learning_rate * grad_b;

            if iteration % LOG_EVERY == 0 {
                log::debug!("iteration {iteration}: objective {objective:.6}");
            }
            if (previous - objective).abs() < self.config.tolerance {
                log::debug!("Converged after {} iterations", iteration + 1);
                break;
            }
            previous = objective;
        }
        model
    }

    fn mean_log_loss(
        &self,
        model: &LinearModel,
        documents: &[Vec<String>],
        targets: &[Label],
    ) -> f64 {
        if documents.is_empty() {
            return 0.0;
        }
        let total: f64 = documents
            .iter()
            .zip(targets)
            .map(|(doc, target)| {
                log_loss(sigmoid(model.decide(doc)), *target)
            })
            .sum();
        total / documents.len() as f64
    }
}

impl Matcher for RegressionMatcher {
    fn slug(&self) -> String {
        let defaults = RegressionConfig::default();
        let mut slug = format!("regression-{}", self.config.encoding.slug());
        if self.config.c != defaults.c {
            slug.push_str(&format!("-c-{}", self.config.c));
        }
        if self.config.max_iter != defaults.max_iter {
            slug.push_str(&format!("-iter-{}", self.config.max_iter));
        }
        if self.config.learning_rate != defaults.learning_rate {
            slug.push_str(&format!("-learn-{}", self.config.learning_rate));
        }
        if self.config.tolerance != defaults.tolerance {
            slug.push_str(&format!("-tol-{}", self.config.tolerance));
        }
        slug.push_str(self.config.label_policy.slug_suffix());
        slug
    }

    fn name(&self) -> String {
        format!("Logistic regression ({})", self.config.encoding.slug())
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
        let Some(model) = read_model::<LinearModel>(path)? else {
            return Ok(false);
        };
        if !model.is_consistent() {
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
        let (documents, targets) = self.documents(train_data);
        if documents.is_empty() {
            return Err(MatcherError::Training(
                "no labelled candidate pairs in training data".to_string(),
            ));
        }
        log::info!(
            "Training {} on {} pairs ({} positive)",
            self.slug(),
            documents.len(),
            targets.iter().filter(|t| **t >= 0.5).count()
        );

        let model = self.fit(&documents, &targets);
        log::info!(
            "Train log-loss {:.4}",
            self.mean_log_loss(&model, &documents, &targets)
        );

        let (dev_documents, dev_targets) = self.documents(dev_data);
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
                (PairId::of(argument, key_point), sigmoid(model.decide(&document)))
            })
            .collect())
    }
}
