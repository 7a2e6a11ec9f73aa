use crate::error::Result;
use crate::labels::{BestMatch, Labels};
use crate::types::{ArgumentId, KeyPointId, Label, PairId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Predictions in the shared task submission format:
/// `{ "<arg_id>": { "<key_point_id>": <score>, ... }, ... }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Submission {
    scores: BTreeMap<ArgumentId, BTreeMap<KeyPointId, Label>>,
}

impl Submission {
    pub fn from_labels(labels: &Labels) -> Self {
        let mut scores: BTreeMap<ArgumentId, BTreeMap<KeyPointId, Label>> = BTreeMap::new();
        for (pair, label) in labels {
            scores
                .entry(pair.argument_id.clone())
                .or_default()
                .insert(pair.key_point_id.clone(), *label);
        }
        Self { scores }
    }

    #[must_use]
    pub fn to_labels(&self) -> Labels {
        self.scores
            .iter()
            .flat_map(|(argument_id, key_points)| {
                key_points.iter().map(move |(key_point_id, score)| {
                    (PairId::new(argument_id.clone(), key_point_id.clone()), *score)
                })
            })
            .collect()
    }

    /// Per argument, the key point with the highest score.
    ///
    /// Ties go to the smallest key point id. Arguments with no scored key
    /// point are left out.
    #[must_use]
    pub fn best_matches(&self) -> Vec<BestMatch> {
        self.to_labels().best_matches()
    }

    #[must_use]
    pub fn arguments(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
