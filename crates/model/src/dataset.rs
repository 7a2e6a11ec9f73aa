use crate::labels::Labels;
use crate::types::{Argument, KeyPoint, PairId, Stance};
use std::collections::HashSet;

/// Arguments and key points, without annotations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub arguments: Vec<Argument>,
    pub key_points: Vec<KeyPoint>,
}

/// Dataset with match labels for (some of) its candidate pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelledDataset {
    pub dataset: Dataset,
    pub labels: Labels,
}

impl Dataset {
    pub fn new(arguments: Vec<Argument>, key_points: Vec<KeyPoint>) -> Self {
        Self {
            arguments,
            key_points,
        }
    }

    /// Every argument / key point pair sharing topic and stance.
    ///
    /// Ordered by argument, then key point, as they appear in the dataset.
    pub fn candidate_pairs(&self) -> impl Iterator<Item = (&Argument, &KeyPoint)> + '_ {
        self.arguments.iter().flat_map(move |argument| {
            self.key_points_for(&argument.topic, argument.stance)
                .map(move |key_point| (argument, key_point))
        })
    }

    pub fn candidate_pair_ids(&self) -> impl Iterator<Item = PairId> + '_ {
        self.candidate_pairs()
            .map(|(argument, key_point)| PairId::of(argument, key_point))
    }

    #[must_use]
    pub fn argument(&self, id: &str) -> Option<&Argument> {
        self.arguments.iter().find(|argument| argument.id == id)
    }

    #[must_use]
    pub fn key_point(&self, id: &str) -> Option<&KeyPoint> {
        self.key_points.iter().find(|key_point| key_point.id == id)
    }

    /// Distinct topics in first-seen order (arguments first, then key points)
    #[must_use]
    pub fn topics(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.arguments
            .iter()
            .map(|argument| argument.topic.as_str())
            .chain(self.key_points.iter().map(|kp| kp.topic.as_str()))
            .filter(|topic| seen.insert(*topic))
            .collect()
    }

    /// Key points for a given topic and stance
    pub fn key_points_for<'a>(
        &'a self,
        topic: &'a str,
        stance: Stance,
    ) -> impl Iterator<Item = &'a KeyPoint> + 'a {
        self.key_points
            .iter()
            .filter(move |kp| kp.topic == topic && kp.stance == stance)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty() && self.key_points.is_empty()
    }
}

impl LabelledDataset {
    pub fn new(dataset: Dataset, labels: Labels) -> Self {
        Self { dataset, labels }
    }

    #[must_use]
    pub fn is_labelled(&self) -> bool {
        !self.labels.is_empty()
    }
}

impl AsRef<Dataset> for LabelledDataset {
    fn as_ref(&self) -> &Dataset {
        &self.dataset
    }
}

impl std::ops::Deref for LabelledDataset {
    type Target = Dataset;

    fn deref(&self) -> &Self::Target {
        &self.dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argument(id: &str, topic: &str, stance: Stance) -> Argument {
        Argument {
            id: id.into(),
            text: format!("argument {id}"),
            topic: topic.into(),
            stance,
        }
    }

    fn key_point(id: &str, topic: &str, stance: Stance) -> KeyPoint {
        KeyPoint {
            id: id.into(),
            text: format!("key point {id}"),
            topic: topic.into(),
            stance,
        }
    }

    #[test]
    fn candidate_pairs_follow_topic_and_stance() {
        let data = Dataset::new(
            vec![
                argument("a1", "t1", Stance::Pro),
                argument("a2", "t1", Stance::Con),
                argument("a3", "t2", Stance::Pro),
            ],
            vec![
                key_point("k1", "t1", Stance::Pro),
                key_point("k2", "t1", Stance::Pro),
                key_point("k3", "t1", Stance::Con),
            ],
        );

        let pairs: Vec<String> = data.candidate_pair_ids().map(|p| p.to_string()).collect();
        assert_eq!(pairs, vec!["a1/k1", "a1/k2", "a2/k3"]);
    }

    #[test]
    fn topics_are_distinct_in_first_seen_order() {
        let data = Dataset::new(
            vec![
                argument("a1", "b", Stance::Pro),
                argument("a2", "a", Stance::Pro),
                argument("a3", "b", Stance::Con),
            ],
            vec![key_point("k1", "c", Stance::Pro)],
        );
        assert_eq!(data.topics(), vec!["b", "a", "c"]);
    }

    #[test]
    fn lookup_by_id() {
        let data = Dataset::new(
            vec![argument("a1", "t", Stance::Pro)],
            vec![key_point("k1", "t", Stance::Pro)],
        );
        assert!(data.argument("a1").is_some());
        assert!(data.argument("a2").is_none());
        assert_eq!(data.key_points_for("t", Stance::Pro).count(), 1);
        assert_eq!(data.key_points_for("t", Stance::Con).count(), 0);
    }
}
