use crate::error::Result;
use kpm_model::{Dataset, Labels, LabelledDataset};
use std::path::Path;

/// Argument / key point matcher.
///
/// A matcher is optionally trained on a training split (with a development
/// split available for reporting and tuning). Afterwards it scores candidate
/// pairs of arbitrary datasets.
///
/// # Contract
///
/// - `slug` is stable for a given configuration and only contains lowercase
///   letters, digits, dots and dashes; it names cache directories and output
///   files.
/// - `predict` only labels candidate pairs (same topic and stance). Missing
///   pairs are interpreted by the evaluation metric.
/// - Matchers with `needs_training() == true` are loaded from `path` when a
///   model is cached there. `load_model` returns `Ok(false)` otherwise, which
///   makes the caller train and then `save_model`.
pub trait Matcher: Send {
    fn slug(&self) -> String;

    /// Human readable name for reports
    fn name(&self) -> String {
        self.slug()
    }

    /// One-time setup before loading or training
    fn prepare(&mut self) -> Result<()> {
        Ok(())
    }

    /// Whether `train` learns anything that `save_model` persists
    fn needs_training(&self) -> bool {
        false
    }

    fn load_model(&mut self, _path: &Path) -> Result<bool> {
        Ok(false)
    }

    fn save_model(&self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn train(
        &mut self,
        _train_data: &LabelledDataset,
        _dev_data: &LabelledDataset,
        _cache_path: &Path,
    ) -> Result<()> {
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> Result<Labels>;
}

/// Whether `slug` is safe to use as a file name
#[must_use]
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
}

/// Lowercase `text`, replacing every run of characters not allowed in a slug
/// with a single dash
pub(crate) fn slug_fragment(text: &str) -> String {
    let mut fragment = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            fragment.push(c);
        } else if !fragment.is_empty() && !fragment.ends_with('-') {
            fragment.push('-');
        }
    }
    fragment.trim_end_matches('-').to_string()
}
