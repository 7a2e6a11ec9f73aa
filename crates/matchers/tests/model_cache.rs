use kpm_matchers::{Matcher, MatcherConfig, MatcherError};
use kpm_model::{Argument, Dataset, KeyPoint, LabelledDataset, Labels, PairId, Stance};
use tempfile::tempdir;

const TOPIC: &str = "Social media platforms should be regulated";

fn data() -> LabelledDataset {
    let argument = |id: &str, text: &str| Argument {
        id: id.into(),
        text: text.into(),
        topic: TOPIC.into(),
        stance: Stance::Pro,
    };
    let key_point = |id: &str, text: &str| KeyPoint {
        id: id.into(),
        text: text.into(),
        topic: TOPIC.into(),
        stance: Stance::Pro,
    };
    let dataset = Dataset::new(
        vec![
            argument("arg_1", "Fake news spreads quickly on social media"),
            argument("arg_2", "Platforms collect private data without consent"),
            argument("arg_3", "Misinformation on platforms misleads voters"),
        ],
        vec![
            key_point("kp_1", "Social media spreads misinformation"),
            key_point("kp_2", "Platforms violate user privacy"),
        ],
    );
    let labels: Labels = [
        (PairId::new("arg_1", "kp_1"), 1.0),
        (PairId::new("arg_1", "kp_2"), 0.0),
        (PairId::new("arg_2", "kp_1"), 0.0),
        (PairId::new("arg_2", "kp_2"), 1.0),
        (PairId::new("arg_3", "kp_1"), 1.0),
        (PairId::new("arg_3", "kp_2"), 0.0),
    ]
    .into_iter()
    .collect();
    LabelledDataset::new(dataset, labels)
}

fn cascade() -> MatcherConfig {
    MatcherConfig::from_toml(
        r#"
type = "cascade"
threshold = 0.9

[first]
type = "term-overlap"
stemming = true
stop_words = true

[second]
type = "regression"
encoding = "tfidf"
"#,
    )
    .unwrap()
}

#[test]
fn trained_cascade_round_trips_through_cache() {
    let data = data();
    let cache = tempdir().unwrap();

    let mut matcher = cascade().build().unwrap();
    matcher.prepare().unwrap();
    let model_dir = cache.path().join(matcher.slug());
    assert!(!matcher.load_model(&model_dir).unwrap());
    matcher.train(&data, &data, &model_dir).unwrap();
    matcher.save_model(&model_dir).unwrap();
    let predicted = matcher.predict(&data).unwrap();
    assert_eq!(predicted.len(), 6);

    let mut restored = cascade().build().unwrap();
    restored.prepare().unwrap();
    assert!(restored.load_model(&model_dir).unwrap());
    assert!(model_dir.join("regression-tfidf").join("model.json").is_file());
    assert_eq!(restored.predict(&data).unwrap(), predicted);
}

#[test]
fn untrained_regression_cannot_predict() {
    let matcher = MatcherConfig::from_json(r#"{"type": "regression"}"#)
        .unwrap()
        .build()
        .unwrap();
    let err = matcher.predict(&data()).unwrap_err();
    assert!(matches!(err, MatcherError::NotTrained(slug) if slug == "regression-bow"));
}
