use kpm_model::{Argument, Dataset, KeyPoint, Label, LabelledDataset, Labels, PairId, Stance};

const TOPIC: &str = "We should ban homeschooling";

fn argument(id: &str, stance: Stance) -> Argument {
    Argument {
        id: id.into(),
        text: format!("argument {id}"),
        topic: TOPIC.into(),
        stance,
    }
}

fn key_point(id: &str, stance: Stance) -> KeyPoint {
    KeyPoint {
        id: id.into(),
        text: format!("key point {id}"),
        topic: TOPIC.into(),
        stance,
    }
}

pub(crate) fn labels(entries: &[(&str, &str, Label)]) -> Labels {
    entries
        .iter()
        .map(|(argument, key_point, label)| (PairId::new(*argument, *key_point), *label))
        .collect()
}

/// Pro arguments `a1..a3` and key points `k1, k2`; con argument `a4` and key point `k3`.
///
/// Annotated: `a1/k1 = 1`, `a1/k2 = 0`, `a2/k1 = 0`, `a2/k2 = 1`, `a3/k1 = 1`,
/// `a4/k3 = 1`. The candidate pair `a3/k2` is unannotated.
pub(crate) fn sample_data() -> LabelledDataset {
    let dataset = Dataset::new(
        vec![
            argument("a1", Stance::Pro),
            argument("a2", Stance::Pro),
            argument("a3", Stance::Pro),
            argument("a4", Stance::Con),
        ],
        vec![
            key_point("k1", Stance::Pro),
            key_point("k2", Stance::Pro),
            key_point("k3", Stance::Con),
        ],
    );
    let labels = labels(&[
        ("a1", "k1", 1.0),
        ("a1", "k2", 0.0),
        ("a2", "k1", 0.0),
        ("a2", "k2", 1.0),
        ("a3", "k1", 1.0),
        ("a4", "k3", 1.0),
    ]);
    LabelledDataset::new(dataset, labels)
}

/// `n` pro arguments `a1..an` and the single pro key point `k1`, with the
/// given `(argument, label)` annotations for `k1`.
pub(crate) fn labelled(n: usize, annotations: &[(&str, Label)]) -> LabelledDataset {
    let arguments = (1..=n)
        .map(|i| argument(&format!("a{i}"), Stance::Pro))
        .collect();
    let dataset = Dataset::new(arguments, vec![key_point("k1", Stance::Pro)]);
    let labels = annotations
        .iter()
        .map(|(argument, label)| (PairId::new(*argument, "k1"), *label))
        .collect();
    LabelledDataset::new(dataset, labels)
}
