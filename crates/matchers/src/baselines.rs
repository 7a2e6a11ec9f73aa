//! Trivial matchers used as lower and upper reference points.

use crate::error::Result;
use crate::matcher::Matcher;
use kpm_model::{Dataset, Labels, PairId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Labels every candidate pair as a match
#[derive(Debug, Clone, Copy, Default)]
pub struct AllMatcher;

impl Matcher for AllMatcher {
    fn slug(&self) -> String {
        "all".to_string()
    }

    fn predict(&self, data: &Dataset) -> Result<Labels> {
        Ok(constant_labels(data, 1.0))
    }
}

/// Labels every candidate pair as no match
#[derive(Debug, Clone, Copy, Default)]
pub struct NoneMatcher;

impl Matcher for NoneMatcher {
    fn slug(&self) -> String {
        "none".to_string()
    }

    fn predict(&self, data: &Dataset) -> Result<Labels> {
        Ok(constant_labels(data, 0.0))
    }
}

/// Uniform random scores in `[0, 1)`. Reproducible when seeded.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomMatcher {
    seed: Option<u64>,
}

impl RandomMatcher {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }
}

impl Matcher for RandomMatcher {
    fn slug(&self) -> String {
        match self.seed {
            Some(seed) => format!("random-seed-{seed}"),
            None => "random".to_string(),
        }
    }

    fn predict(&self, data: &Dataset) -> Result<Labels> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(data
            .candidate_pair_ids()
            .map(|pair| (pair, rng.gen::<f64>()))
            .collect())
    }
}

fn constant_labels(data: &Dataset, label: f64) -> Labels {
    data.candidate_pair_ids()
        .map(|pair: PairId| (pair, label))
        .collect()
}
