use crate::error::{MatcherError, Result};
use crate::matcher::Matcher;
use kpm_model::{Dataset, Labels, LabelledDataset};
use std::path::Path;

pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// Combines two matchers: the first one decides whenever it is confident.
///
/// For each pair the score of `first` is kept when it reaches the threshold,
/// otherwise the score of `second` is used. If `second` has no score for the
/// pair, the score of `first` is kept regardless.
pub struct CascadeMatcher {
    first: Box<dyn Matcher>,
    second: Box<dyn Matcher>,
    threshold: f64,
}

impl CascadeMatcher {
    pub fn new(first: Box<dyn Matcher>, second: Box<dyn Matcher>, threshold: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(MatcherError::invalid_config(format!(
                "cascade threshold {threshold} is outside [0, 1]"
            )));
        }
        Ok(Self {
            first,
            second,
            threshold,
        })
    }
}

impl Matcher for CascadeMatcher {
    fn slug(&self) -> String {
        format!(
            "cascade-{}-{}-{}",
            self.threshold,
            self.first.slug(),
            self.second.slug()
        )
    }

    fn name(&self) -> String {
        format!(
            "Cascade of {} and {}",
            self.first.name(),
            self.second.name()
        )
    }

    fn prepare(&mut self) -> Result<()> {
        self.first.prepare()?;
        self.second.prepare()
    }

    fn needs_training(&self) -> bool {
        self.first.needs_training() || self.second.needs_training()
    }

    /// Loaded once every child that needs training is loaded
    fn load_model(&mut self, path: &Path) -> Result<bool> {
        let mut loaded = true;
        for child in [&mut self.first, &mut self.second] {
            if child.needs_training() {
                let child_path = path.join(child.slug());
                loaded &= child.load_model(&child_path)?;
            }
        }
        Ok(loaded)
    }

    fn save_model(&self, path: &Path) -> Result<()> {
        self.first.save_model(&path.join(self.first.slug()))?;
        self.second.save_model(&path.join(self.second.slug()))
    }

    fn train(
        &mut self,
        train_data: &LabelledDataset,
        dev_data: &LabelledDataset,
        cache_path: &Path,
    ) -> Result<()> {
        self.first
            .train(train_data, dev_data, &cache_path.join(self.first.slug()))?;
        self.second
            .train(train_data, dev_data, &cache_path.join(self.second.slug()))
    }

    fn predict(&self, data: &Dataset) -> Result<Labels> {
        let first = self.first.predict(data)?;
        let second = self.second.predict(data)?;

        let mut labels = Labels::new();
        for pair in data.candidate_pair_ids() {
            let label = match (first.get(&pair), second.get(&pair)) {
                (Some(a), _) if a >= self.threshold => Some(a),
                (_, Some(b)) => Some(b),
                (a, None) => a,
            };
            if let Some(label) = label {
                labels.insert(pair, label);
            }
        }
        Ok(labels)
    }
}
