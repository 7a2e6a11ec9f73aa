//! Stop word filtering
//!
//! Language stop word lists come from the `stop-words` crate. On top of that,
//! a small custom list covers filler words common in debate arguments that
//! carry no signal for matching ("people", "argue", ...).

use crate::language::Language;
use std::collections::HashSet;
use stop_words::get;

/// Debate-domain filler words, applied when custom stop words are enabled
pub const CUSTOM_STOP_WORDS: &[&str] = &[
    "also", "argue", "argument", "believe", "can", "could", "think", "feel", "fact", "get",
    "many", "may", "might", "much", "must", "one", "people", "person", "really", "say",
    "should", "thing", "things", "way", "would",
];

/// A filter for removing stop words from token streams
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    /// Lower-cased stop words
    stopwords: HashSet<String>,
}

impl StopwordFilter {
    /// Stop words of a language
    pub fn new(language: Language) -> Self {
        let stopwords = get(language.stop_words_language())
            .iter()
            .map(|s| s.to_string().to_lowercase())
            .collect();
        Self { stopwords }
    }

    /// Filter that removes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn add_stopwords(&mut self, words: &[&str]) {
        for word in words {
            self.stopwords.insert(word.to_lowercase());
        }
    }

    #[must_use]
    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
