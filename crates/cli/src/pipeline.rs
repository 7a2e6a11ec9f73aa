use anyhow::{Context as AnyhowContext, Result};
use kpm_eval::{Evaluation, Metric};
use kpm_matchers::{is_valid_slug, MatcherConfig};
use kpm_model::{load_split, split_exists, LabelledDataset, Split, Submission};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub struct RunOptions {
    pub data_dir: PathBuf,
    pub split: Split,
    pub metric: Box<dyn Metric>,
    pub matcher: MatcherConfig,
}

#[derive(Debug, Serialize)]
pub struct RunReport {
    pub matcher: String,
    pub matcher_name: String,
    pub split: Split,
    pub cached_model: bool,
    pub arguments: usize,
    pub key_points: usize,
    pub predicted_pairs: usize,
    pub predictions: String,
    pub evaluation: Option<Evaluation>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateReport {
    pub predictions: String,
    pub split: Split,
    pub predicted_pairs: usize,
    pub evaluation: Evaluation,
}

pub fn cache_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("cache")
}

pub fn output_path(data_dir: &Path, slug: &str, split: Split) -> PathBuf {
    data_dir.join("out").join(format!("{slug}-{split}.json"))
}

/// Prepare, load or train, predict, save and evaluate one matcher
pub fn run(options: &RunOptions) -> Result<RunReport> {
    let data_dir = options.data_dir.as_path();
    let mut matcher = options.matcher.build().context("Invalid matcher")?;
    let slug = matcher.slug();
    if !is_valid_slug(&slug) {
        anyhow::bail!("Matcher slug '{slug}' cannot be used as a file name");
    }
    log::info!("Matcher {slug} ({})", matcher.name());

    let eval_data = load(data_dir, options.split)?;

    matcher
        .prepare()
        .with_context(|| format!("Failed to prepare {slug}"))?;

    let model_dir = cache_dir(data_dir).join(&slug);
    let cached_model = matcher.needs_training()
        && matcher
            .load_model(&model_dir)
            .with_context(|| format!("Failed to load cached model {}", model_dir.display()))?;
    if cached_model {
        log::info!("Loaded cached model from {}", model_dir.display());
    } else if matcher.needs_training() {
        let train_data = load(data_dir, Split::Train)?;
        let dev_data = if options.split == Split::Dev {
            eval_data.clone()
        } else {
            load(data_dir, Split::Dev)?
        };
        matcher
            .train(&train_data, &dev_data, &model_dir)
            .with_context(|| format!("Failed to train {slug}"))?;
        matcher
            .save_model(&model_dir)
            .with_context(|| format!("Failed to save model to {}", model_dir.display()))?;
    }

    let predicted = matcher
        .predict(&eval_data)
        .with_context(|| format!("Failed to predict {} split", options.split))?;
    log::info!(
        "Predicted {} pairs ({} matches)",
        predicted.len(),
        predicted.positives()
    );

    let predictions = output_path(data_dir, &slug, options.split);
    Submission::from_labels(&predicted)
        .save(&predictions)
        .with_context(|| format!("Failed to write {}", predictions.display()))?;
    log::info!("Wrote predictions to {}", predictions.display());

    let evaluation = if eval_data.is_labelled() {
        Some(Evaluation::run(options.metric.as_ref(), &predicted, &eval_data))
    } else {
        log::warn!("No labels for {} split; skipping evaluation", options.split);
        None
    };

    Ok(RunReport {
        matcher: slug,
        matcher_name: matcher.name(),
        split: options.split,
        cached_model,
        arguments: eval_data.arguments.len(),
        key_points: eval_data.key_points.len(),
        predicted_pairs: predicted.len(),
        predictions: predictions.display().to_string(),
        evaluation,
    })
}

/// Score an existing submission file
pub fn evaluate(
    data_dir: &Path,
    split: Split,
    metric: &dyn Metric,
    predictions: &Path,
) -> Result<EvaluateReport> {
    let data = load(data_dir, split)?;
    if !data.is_labelled() {
        anyhow::bail!("The {split} split in {} has no labels", data_dir.display());
    }
    let submission = Submission::load(predictions)
        .with_context(|| format!("Failed to read predictions {}", predictions.display()))?;
    let predicted = submission.to_labels();
    let known = predicted
        .pairs()
        .filter(|pair| {
            data.argument(&pair.argument_id).is_some()
                && data.key_point(&pair.key_point_id).is_some()
        })
        .count();
    if known < predicted.len() {
        log::warn!(
            "{} predicted pairs refer to arguments or key points outside the {split} split",
            predicted.len() - known
        );
    }

    Ok(EvaluateReport {
        predictions: predictions.display().to_string(),
        split,
        predicted_pairs: predicted.len(),
        evaluation: Evaluation::run(metric, &predicted, &data),
    })
}

fn load(data_dir: &Path, split: Split) -> Result<LabelledDataset> {
    if !split_exists(data_dir, split) {
        anyhow::bail!(
            "The {split} split is missing from {} (run `kpm download` first)",
            data_dir.display()
        );
    }
    load_split(data_dir, split)
        .with_context(|| format!("Failed to load {split} split from {}", data_dir.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_layout() {
        let data = Path::new("data");
        assert_eq!(
            output_path(data, "term-overlap", Split::Test),
            Path::new("data/out/term-overlap-test.json")
        );
        assert_eq!(cache_dir(data), Path::new("data/cache"));
    }
}
