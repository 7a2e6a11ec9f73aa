use crate::baselines::{AllMatcher, NoneMatcher, RandomMatcher};
use crate::cascade::{CascadeMatcher, DEFAULT_THRESHOLD};
use crate::ensemble::{EnsembleMatcher, DEFAULT_REGRESSION_WEIGHT, DEFAULT_SVC_WEIGHT};
use crate::error::Result;
use crate::matcher::Matcher;
use crate::regression::{RegressionConfig, RegressionMatcher};
use crate::svc::{SvcConfig, SvcMatcher};
use crate::term_overlap::{TermOverlapConfig, TermOverlapMatcher};
use kpm_text::Encoding;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Declarative matcher description, loadable from TOML or JSON.
///
/// ```toml
/// type = "cascade"
/// threshold = 0.6
///
/// [first]
/// type = "term-overlap"
/// stemming = true
/// synonyms = true
///
/// [second]
/// type = "regression"
/// encoding = "tfidf"
/// ```
///
/// Ensembles list weighted members; without `members` they vote with
/// logistic regression (0.55) and SVC (0.45) over bag of words:
///
/// ```toml
/// type = "ensemble"
///
/// [[members]]
/// weight = 2.0
/// matcher = { type = "svc", encoding = "tfidf" }
///
/// [[members]]
/// weight = 1.0
/// matcher = { type = "term-overlap", stemming = true }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MatcherConfig {
    All,
    None,
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
    TermOverlap(TermOverlapConfig),
    Regression(RegressionConfig),
    Svc(SvcConfig),
    Ensemble {
        #[serde(default = "default_ensemble_members")]
        members: Vec<EnsembleMember>,
    },
    Cascade {
        first: Box<MatcherConfig>,
        second: Box<MatcherConfig>,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

/// One weighted voter of an ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleMember {
    pub weight: f64,
    pub matcher: MatcherConfig,
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_ensemble_members() -> Vec<EnsembleMember> {
    MatcherConfig::voting_members(Encoding::BagOfWords)
}

impl MatcherConfig {
    /// Logistic regression and SVC over the same encoding, soft voting
    #[must_use]
    pub fn voting_ensemble(encoding: Encoding) -> Self {
        Self::Ensemble {
            members: Self::voting_members(encoding),
        }
    }

    fn voting_members(encoding: Encoding) -> Vec<EnsembleMember> {
        vec![
            EnsembleMember {
                weight: DEFAULT_REGRESSION_WEIGHT,
                matcher: Self::Regression(RegressionConfig {
                    encoding,
                    ..RegressionConfig::default()
                }),
            },
            EnsembleMember {
                weight: DEFAULT_SVC_WEIGHT,
                matcher: Self::Svc(SvcConfig {
                    encoding,
                    ..SvcConfig::default()
                }),
            },
        ]
    }

    pub fn build(&self) -> Result<Box<dyn Matcher>> {
        Ok(match self {
            Self::All => Box::new(AllMatcher),
            Self::None => Box::new(NoneMatcher),
            Self::Random { seed } => Box::new(RandomMatcher::new(*seed)),
            Self::TermOverlap(config) => Box::new(TermOverlapMatcher::new(config.clone())),
            Self::Regression(config) => {
                config.validate()?;
                Box::new(RegressionMatcher::new(config.clone()))
            }
            Self::Svc(config) => {
                config.validate()?;
                Box::new(SvcMatcher::new(config.clone()))
            }
            Self::Ensemble { members } => {
                let members = members
                    .iter()
                    .map(|member| Ok((member.matcher.build()?, member.weight)))
                    .collect::<Result<Vec<_>>>()?;
                Box::new(EnsembleMatcher::new(members)?)
            }
            Self::Cascade {
                first,
                second,
                threshold,
            } => Box::new(CascadeMatcher::new(
                first.build()?,
                second.build()?,
                *threshold,
            )?),
        })
    }

    /// Load from a file; `.json` files are parsed as JSON, anything else as TOML
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_toml(&text)
        }
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatcherError;
    use kpm_text::Language;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn parses_nested_toml() {
        let config = MatcherConfig::from_toml(
            r#"
type = "cascade"
threshold = 0.6

[first]
type = "term-overlap"
stemming = true
language = "german"

[second]
type = "regression"
encoding = "tfidf"
label_policy = "relaxed"
"#,
        )
        .unwrap();

        let MatcherConfig::Cascade {
            first,
            second,
            threshold,
        } = &config
        else {
            panic!("expected cascade, got {config:?}");
        };
        assert_eq!(*threshold, 0.6);
        assert_eq!(
            **first,
            MatcherConfig::TermOverlap(TermOverlapConfig {
                stemming: true,
                language: Language::German,
                ..TermOverlapConfig::default()
            })
        );
        let MatcherConfig::Regression(regression) = second.as_ref() else {
            panic!("expected regression, got {second:?}");
        };
        assert_eq!(regression.encoding, Encoding::Tfidf);
        assert_eq!(regression.c, RegressionConfig::default().c);

        let matcher = config.build().unwrap();
        assert_eq!(
            matcher.slug(),
            "cascade-0.6-term-overlap-stemming-german-regression-tfidf-relaxed"
        );
    }

    #[test]
    fn json_files_are_detected_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("matcher.json");
        std::fs::write(&path, r#"{"type": "random", "seed": 7}"#).unwrap();
        let config = MatcherConfig::from_path(&path).unwrap();
        assert_eq!(config, MatcherConfig::Random { seed: Some(7) });
        assert_eq!(config.build().unwrap().slug(), "random-seed-7");
    }

    #[test]
    fn language_accepts_codes() {
        let config = MatcherConfig::from_toml(
            r#"
type = "term-overlap"
stemming = true
language = "de"
"#,
        )
        .unwrap();
        let MatcherConfig::TermOverlap(term_overlap) = &config else {
            panic!("expected term overlap, got {config:?}");
        };
        assert_eq!(term_overlap.language, Language::German);
        assert_eq!(
            config.build().unwrap().slug(),
            "term-overlap-stemming-german"
        );
    }

    #[test]
    fn cascade_threshold_defaults() {
        let config = MatcherConfig::from_json(
            r#"{"type": "cascade", "first": {"type": "all"}, "second": {"type": "none"}}"#,
        )
        .unwrap();
        assert_eq!(config.build().unwrap().slug(), "cascade-0.5-all-none");
    }

    #[test]
    fn ensemble_defaults_to_regression_and_svc() {
        let config = MatcherConfig::from_toml("type = \"ensemble\"").unwrap();
        assert_eq!(config, MatcherConfig::voting_ensemble(Encoding::BagOfWords));
        assert_eq!(
            config.build().unwrap().slug(),
            "ensemble-0.55-regression-bow-0.45-svc-bow"
        );
    }

    #[test]
    fn ensemble_members_from_toml() {
        let config = MatcherConfig::from_toml(
            r#"
type = "ensemble"

[[members]]
weight = 2.0
matcher = { type = "svc", encoding = "tfidf", c = 4.0 }

[[members]]
weight = 1.0
matcher = { type = "term-overlap", stemming = true }
"#,
        )
        .unwrap();
        let matcher = config.build().unwrap();
        assert_eq!(
            matcher.slug(),
            "ensemble-2-svc-tfidf-c-4-1-term-overlap-stemming"
        );
        assert!(matcher.needs_training());

        let zero_weight = MatcherConfig::from_toml(
            r#"
type = "ensemble"
members = [{ weight = 0.0, matcher = { type = "all" } }]
"#,
        )
        .unwrap();
        assert!(matches!(
            zero_weight.build(),
            Err(MatcherError::InvalidConfig(_))
        ));
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(matches!(
            MatcherConfig::from_toml("type = \"bilstm\""),
            Err(MatcherError::TomlError(_))
        ));
    }

    #[test]
    fn invalid_regression_settings_fail_to_build() {
        let config = MatcherConfig::Regression(RegressionConfig {
            max_iter: 0,
            ..RegressionConfig::default()
        });
        assert!(matches!(
            config.build(),
            Err(MatcherError::InvalidConfig(_))
        ));
    }
}
