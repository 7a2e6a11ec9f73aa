//! Pieces shared by the linear matchers: pair documents, the sparse linear
//! model and its JSON cache file.

use crate::error::Result;
use crate::label_policy::{training_pairs, LabelPolicy};
use kpm_model::{Label, LabelledDataset};
use kpm_text::{Analyzer, SparseVector, Vectorizer};
use ndarray::Array1;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub(crate) const MODEL_FILE: &str = "model.json";

/// Analyzed terms of the argument followed by those of the key point
pub(crate) fn pair_document(
    analyzer: &Analyzer,
    argument_text: &str,
    key_point_text: &str,
) -> Vec<String> {
    let mut terms = analyzer.analyze(argument_text);
    terms.extend(analyzer.analyze(key_point_text));
    terms
}

/// Pair documents of `data` with their training targets under `policy`
pub(crate) fn labelled_documents(
    analyzer: &Analyzer,
    data: &LabelledDataset,
    policy: LabelPolicy,
) -> (Vec<Vec<String>>, Vec<Label>) {
    training_pairs(data, policy)
        .into_iter()
        .map(|pair| {
            (
                pair_document(analyzer, &pair.argument.text, &pair.key_point.text),
                pair.label,
            )
        })
        .unzip()
}

/// `w · x + b` over the vectorizer's feature space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LinearModel {
    pub vectorizer: Vectorizer,
    pub weights: Array1<f64>,
    pub bias: f64,
}

impl LinearModel {
    pub fn zeros(vectorizer: Vectorizer) -> Self {
        let dim = vectorizer.vocabulary_size();
        Self {
            vectorizer,
            weights: Array1::zeros(dim),
            bias: 0.0,
        }
    }

    pub fn decision(&self, features: &SparseVector) -> f64 {
        features
            .entries()
            .iter()
            .filter(|(idx, _)| *idx < self.weights.len())
            .map(|(idx, value)| self.weights[*idx] * value)
            .sum::<f64>()
            + self.bias
    }

    pub fn decide(&self, document: &[String]) -> f64 {
        self.decision(&self.vectorizer.transform(document))
    }

    pub fn is_consistent(&self) -> bool {
        self.weights.len() == self.vectorizer.vocabulary_size()
            && self.vectorizer.is_consistent()
            && self.bias.is_finite()
    }
}

/// Read `<dir>/model.json`; `None` when no model is cached there
pub(crate) fn read_model<T: DeserializeOwned>(dir: &Path) -> Result<Option<T>> {
    let file = dir.join(MODEL_FILE);
    if !file.is_file() {
        return Ok(None);
    }
    let bytes = std::fs::read(&file)?;
    Ok(Some(serde_json::from_slice(&bytes)?))
}

pub(crate) fn write_model<T: Serialize>(dir: &Path, model: &T) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(MODEL_FILE), serde_json::to_vec(model)?)?;
    Ok(())
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

pub(crate) fn log_loss(p: f64, target: f64) -> f64 {
    const EPS: f64 = 1e-12;
    let p = p.clamp(EPS, 1.0 - EPS);
    -(target * p.ln() + (1.0 - target) * (1.0 - p).ln())
}
