use crate::error::TextError;
use rust_stemmers::Algorithm;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stop_words::LANGUAGE;

/// Languages with both a Snowball stemmer and a stop word list.
///
/// Parsed and deserialized from lowercase names or ISO 639-1 codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    #[serde(alias = "en")]
    English,
    #[serde(alias = "de")]
    German,
    #[serde(alias = "fr")]
    French,
    #[serde(alias = "es")]
    Spanish,
    #[serde(alias = "it")]
    Italian,
    #[serde(alias = "nl")]
    Dutch,
    #[serde(alias = "pt")]
    Portuguese,
    #[serde(alias = "ru")]
    Russian,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::German => "german",
            Self::French => "french",
            Self::Spanish => "spanish",
            Self::Italian => "italian",
            Self::Dutch => "dutch",
            Self::Portuguese => "portuguese",
            Self::Russian => "russian",
        }
    }

    pub(crate) const fn stemmer_algorithm(self) -> Algorithm {
        match self {
            Self::English => Algorithm::English,
            Self::German => Algorithm::German,
            Self::French => Algorithm::French,
            Self::Spanish => Algorithm::Spanish,
            Self::Italian => Algorithm::Italian,
            Self::Dutch => Algorithm::Dutch,
            Self::Portuguese => Algorithm::Portuguese,
            Self::Russian => Algorithm::Russian,
        }
    }

    pub(crate) const fn stop_words_language(self) -> LANGUAGE {
        match self {
            Self::English => LANGUAGE::English,
            Self::German => LANGUAGE::German,
            Self::French => LANGUAGE::French,
            Self::Spanish => LANGUAGE::Spanish,
            Self::Italian => LANGUAGE::Italian,
            Self::Dutch => LANGUAGE::Dutch,
            Self::Portuguese => LANGUAGE::Portuguese,
            Self::Russian => LANGUAGE::Russian,
        }
    }
}

impl FromStr for Language {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "de" | "german" => Ok(Self::German),
            "fr" | "french" => Ok(Self::French),
            "es" | "spanish" => Ok(Self::Spanish),
            "it" | "italian" => Ok(Self::Italian),
            "nl" | "dutch" => Ok(Self::Dutch),
            "pt" | "portuguese" => Ok(Self::Portuguese),
            "ru" | "russian" => Ok(Self::Russian),
            other => Err(TextError::UnsupportedLanguage(other.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
