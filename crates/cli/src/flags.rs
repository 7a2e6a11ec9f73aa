use clap::ValueEnum;
use kpm_matchers::LabelPolicy;
use kpm_model::Split;
use kpm_text::{Encoding, Language};

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum SplitFlag {
    Dev,
    Test,
}

impl SplitFlag {
    pub(crate) const fn as_domain(self) -> Split {
        match self {
            SplitFlag::Dev => Split::Dev,
            SplitFlag::Test => Split::Test,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum LabelPolicyFlag {
    Skip,
    Strict,
    Relaxed,
}

impl LabelPolicyFlag {
    pub(crate) const fn as_domain(self) -> LabelPolicy {
        match self {
            LabelPolicyFlag::Skip => LabelPolicy::Skip,
            LabelPolicyFlag::Strict => LabelPolicy::Strict,
            LabelPolicyFlag::Relaxed => LabelPolicy::Relaxed,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum EncodingFlag {
    Bow,
    Tfidf,
}

impl EncodingFlag {
    pub(crate) const fn as_domain(self) -> Encoding {
        match self {
            EncodingFlag::Bow => Encoding::BagOfWords,
            EncodingFlag::Tfidf => Encoding::Tfidf,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
pub(crate) enum LanguageFlag {
    #[value(alias = "en")]
    English,
    #[value(alias = "de")]
    German,
    #[value(alias = "fr")]
    French,
    #[value(alias = "es")]
    Spanish,
    #[value(alias = "it")]
    Italian,
    #[value(alias = "nl")]
    Dutch,
    #[value(alias = "pt")]
    Portuguese,
    #[value(alias = "ru")]
    Russian,
}

impl LanguageFlag {
    pub(crate) const fn as_domain(self) -> Language {
        match self {
            LanguageFlag::English => Language::English,
            LanguageFlag::German => Language::German,
            LanguageFlag::French => Language::French,
            LanguageFlag::Spanish => Language::Spanish,
            LanguageFlag::Italian => Language::Italian,
            LanguageFlag::Dutch => Language::Dutch,
            LanguageFlag::Portuguese => Language::Portuguese,
            LanguageFlag::Russian => Language::Russian,
        }
    }
}
