use crate::language::Language;
use crate::stopwords::{StopwordFilter, CUSTOM_STOP_WORDS};
use crate::tokenizer::tokenize;
use rust_stemmers::Stemmer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Settings for turning raw text into terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub language: Language,
    pub stemming: bool,
    pub stop_words: bool,
    pub custom_stop_words: bool,
}

impl AnalyzerConfig {
    /// Config with stemming on and everything else default
    #[must_use]
    pub fn stemmed() -> Self {
        Self {
            stemming: true,
            ..Self::default()
        }
    }
}

/// Tokenize, drop stop words, stem.
pub struct Analyzer {
    config: AnalyzerConfig,
    stopwords: StopwordFilter,
    stemmer: Option<Stemmer>,
}

impl Analyzer {
    pub fn new(config: AnalyzerConfig) -> Self {
        let mut stopwords = if config.stop_words {
            StopwordFilter::new(config.language)
        } else {
            StopwordFilter::empty()
        };
        if config.custom_stop_words {
            stopwords.add_stopwords(CUSTOM_STOP_WORDS);
        }
        let stemmer = config
            .stemming
            .then(|| Stemmer::create(config.language.stemmer_algorithm()));
        Self {
            config,
            stopwords,
            stemmer,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Normalize a single token. `None` when it is a stop word.
    #[must_use]
    pub fn normalize_term(&self, token: &str) -> Option<String> {
        let lower = token.to_lowercase();
        if self.stopwords.is_stopword(&lower) {
            return None;
        }
        Some(match &self.stemmer {
            Some(stemmer) => stemmer.stem(&lower).into_owned(),
            None => lower,
        })
    }

    pub fn analyze(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .iter()
            .filter_map(|token| self.normalize_term(token))
            .collect()
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config)
            .field("stopwords", &self.stopwords.len())
            .finish()
    }
}
