use crate::types::{ArgumentId, KeyPointId, Label, PairId};
use std::collections::btree_map::{self, BTreeMap};

/// Highest scoring key point of one argument
#[derive(Debug, Clone, PartialEq)]
pub struct BestMatch {
    pub argument_id: ArgumentId,
    pub key_point_id: KeyPointId,
    pub score: Label,
}

/// Match labels keyed by argument / key point pair.
///
/// Ordered so that predictions, submissions and reports are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Labels {
    inner: BTreeMap<PairId, Label>,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pair: PairId, label: Label) -> Option<Label> {
        self.inner.insert(pair, label)
    }

    #[must_use]
    pub fn get(&self, pair: &PairId) -> Option<Label> {
        self.inner.get(pair).copied()
    }

    #[must_use]
    pub fn contains(&self, pair: &PairId) -> bool {
        self.inner.contains_key(pair)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, PairId, Label> {
        self.inner.iter()
    }

    pub fn pairs(&self) -> btree_map::Keys<'_, PairId, Label> {
        self.inner.keys()
    }

    /// Number of labels at or above the match threshold of 0.5
    #[must_use]
    pub fn positives(&self) -> usize {
        self.inner.values().filter(|label| **label >= 0.5).count()
    }

    /// Per argument, the key point with the highest score, in argument order.
    ///
    /// Ties go to the smallest key point id.
    #[must_use]
    pub fn best_matches(&self) -> Vec<BestMatch> {
        let mut best: Vec<BestMatch> = Vec::new();
        for (pair, score) in &self.inner {
            match best.last_mut() {
                Some(current) if current.argument_id == pair.argument_id => {
                    if *score > current.score {
                        current.key_point_id.clone_from(&pair.key_point_id);
                        current.score = *score;
                    }
                }
                _ => best.push(BestMatch {
                    argument_id: pair.argument_id.clone(),
                    key_point_id: pair.key_point_id.clone(),
                    score: *score,
                }),
            }
        }
        best
    }
}

impl FromIterator<(PairId, Label)> for Labels {
    fn from_iter<I: IntoIterator<Item = (PairId, Label)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl Extend<(PairId, Label)> for Labels {
    fn extend<I: IntoIterator<Item = (PairId, Label)>>(&mut self, iter: I) {
        self.inner.extend(iter);
    }
}

impl IntoIterator for Labels {
    type Item = (PairId, Label);
    type IntoIter = btree_map::IntoIter<PairId, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a Labels {
    type Item = (&'a PairId, &'a Label);
    type IntoIter = btree_map::Iter<'a, PairId, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
