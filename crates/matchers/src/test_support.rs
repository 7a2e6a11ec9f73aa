use kpm_model::{Argument, Dataset, KeyPoint, LabelledDataset, Labels, PairId, Stance};

const TOPIC: &str = "We should ban homeschooling";

fn argument(id: &str, text: &str, stance: Stance) -> Argument {
    Argument {
        id: id.into(),
        text: text.into(),
        topic: TOPIC.into(),
        stance,
    }
}

fn key_point(id: &str, text: &str, stance: Stance) -> KeyPoint {
    KeyPoint {
        id: id.into(),
        text: text.into(),
        topic: TOPIC.into(),
        stance,
    }
}

/// Seven candidate pairs, six of them annotated (`a3/k2` is not).
pub(crate) fn sample_data() -> LabelledDataset {
    let dataset = Dataset::new(
        vec![
            argument(
                "a1",
                "Homeschooled children miss out on the social skills they learn at school",
                Stance::Pro,
            ),
            argument(
                "a2",
                "Parents are not qualified teachers, so their children get a worse education",
                Stance::Pro,
            ),
            argument(
                "a3",
                "Children kept at home lack contact with other kids and social skills suffer",
                Stance::Pro,
            ),
            argument(
                "a4",
                "Parents have the right to choose how their children are educated",
                Stance::Con,
            ),
        ],
        vec![
            key_point("k1", "Homeschooling harms the social skills of children", Stance::Pro),
            key_point("k2", "Parents are not qualified to teach", Stance::Pro),
            key_point("k3", "Parents should have the freedom to choose education", Stance::Con),
        ],
    );
    let labels: Labels = [
        (PairId::new("a1", "k1"), 1.0),
        (PairId::new("a1", "k2"), 0.0),
        (PairId::new("a2", "k1"), 0.0),
        (PairId::new("a2", "k2"), 1.0),
        (PairId::new("a3", "k1"), 1.0),
        (PairId::new("a4", "k3"), 1.0),
    ]
    .into_iter()
    .collect();
    LabelledDataset::new(dataset, labels)
}
