use crate::error::{MatcherError, Result};
use crate::matcher::Matcher;
use kpm_model::{Dataset, Labels, LabelledDataset};
use std::path::Path;

/// Weight of the logistic regression member in the default ensemble
pub const DEFAULT_REGRESSION_WEIGHT: f64 = 0.55;
/// Weight of the SVC member in the default ensemble
pub const DEFAULT_SVC_WEIGHT: f64 = 0.45;

/// Soft voting: the weighted mean of the members' scores.
///
/// A member without a score for a pair abstains, and the remaining weights
/// are renormalised. Pairs no member scores stay unlabelled.
pub struct EnsembleMatcher {
    members: Vec<(Box<dyn Matcher>, f64)>,
}

impl EnsembleMatcher {
    pub fn new(members: Vec<(Box<dyn Matcher>, f64)>) -> Result<Self> {
        if members.is_empty() {
            return Err(MatcherError::invalid_config(
                "ensemble needs at least one member",
            ));
        }
        if let Some((_, weight)) = members
            .iter()
            .find(|(_, weight)| !weight.is_finite() || *weight <= 0.0)
        {
            return Err(MatcherError::invalid_config(format!(
                "ensemble weight {weight} must be positive"
            )));
        }
        Ok(Self { members })
    }
}

impl Matcher for EnsembleMatcher {
    fn slug(&self) -> String {
        let mut slug = String::from("ensemble");
        for (member, weight) in &self.members {
            slug.push_str(&format!("-{weight}-{}", member.slug()));
        }
        slug
    }

    fn name(&self) -> String {
        let names: Vec<String> = self
            .members
            .iter()
            .map(|(member, weight)| format!("{} ({weight})", member.name()))
            .collect();
        format!("Soft voting of {}", names.join(", "))
    }

    fn prepare(&mut self) -> Result<()> {
        for (member, _) in &mut self.members {
            member.prepare()?;
        }
        Ok(())
    }

    fn needs_training(&self) -> bool {
        self.members.iter().any(|(member, _)| member.needs_training())
    }

    /// Loaded once every member that needs training is loaded
    fn load_model(&mut self, path: &Path) -> Result<bool> {
        let mut loaded = true;
        for (member, _) in &mut self.members {
            if member.needs_training() {
                let member_path = path.join(member.slug());
                loaded &= member.load_model(&member_path)?;
            }
        }
        Ok(loaded)
    }

    fn save_model(&self, path: &Path) -> Result<()> {
        for (member, _) in &self.members {
            member.save_model(&path.join(member.slug()))?;
        }
        Ok(())
    }

    fn train(
        &mut self,
        train_data: &LabelledDataset,
        dev_data: &LabelledDataset,
        cache_path: &Path,
    ) -> Result<()> {
        for (member, _) in &mut self.members {
            let member_path = cache_path.join(member.slug());
            member.train(train_data, dev_data, &member_path)?;
        }
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> Result<Labels> {
        let predictions = self
            .members
            .iter()
            .map(|(member, weight)| Ok((member.predict(data)?, *weight)))
            .collect::<Result<Vec<_>>>()?;

        let mut labels = Labels::new();
        for pair in data.candidate_pair_ids() {
            let (sum, total) = predictions
                .iter()
                .filter_map(|(scores, weight)| scores.get(&pair).map(|score| (score, *weight)))
                .fold((0.0, 0.0), |(sum, total), (score, weight)| {
                    (sum + score * weight, total + weight)
                });
            if total > 0.0 {
                labels.insert(pair, sum / total);
            }
        }
        Ok(labels)
    }
}
