use crate::error::Result;
use crate::matcher::{slug_fragment, Matcher};
use kpm_model::{Dataset, Labels, PairId};
use kpm_text::{Analyzer, AnalyzerConfig, Language, Lexicon};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TermOverlapConfig {
    pub stemming: bool,
    pub stop_words: bool,
    pub custom_stop_words: bool,
    pub synonyms: bool,
    pub antonyms: bool,
    pub language: Language,
    /// Extra synonym / antonym relations merged into the built-in lexicon
    pub lexicon: Option<PathBuf>,
}

impl TermOverlapConfig {
    fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            language: self.language,
            stemming: self.stemming,
            stop_words: self.stop_words,
            custom_stop_words: self.custom_stop_words,
        }
    }
}

/// Scores a pair by the share of key point terms found in the argument.
///
/// With synonyms, a key point term also counts as found when one of its
/// synonyms occurs in the argument. With antonyms, each key point term that
/// is not found but whose antonym occurs in the argument cancels one found
/// term.
pub struct TermOverlapMatcher {
    config: TermOverlapConfig,
    analyzer: Analyzer,
    lexicon: Lexicon,
}

impl TermOverlapMatcher {
    pub fn new(config: TermOverlapConfig) -> Self {
        let analyzer = Analyzer::new(config.analyzer_config());
        Self {
            config,
            analyzer,
            lexicon: Lexicon::empty(),
        }
    }

    fn needs_lexicon(&self) -> bool {
        self.config.synonyms || self.config.antonyms
    }

    /// Overlap score of two already analyzed term sets
    fn score(&self, argument_terms: &HashSet<String>, key_point_terms: &HashSet<String>) -> f64 {
        if key_point_terms.is_empty() {
            return 0.0;
        }

        let mut matched = 0usize;
        let mut contradicted = 0usize;
        for term in key_point_terms {
            let found = argument_terms.contains(term)
                || (self.config.synonyms
                    && self
                        .lexicon
                        .synonyms(term)
                        .any(|synonym| argument_terms.contains(synonym)));
            if found {
                matched += 1;
            } else if self.config.antonyms
                && self
                    .lexicon
                    .antonyms(term)
                    .any(|antonym| argument_terms.contains(antonym))
            {
                contradicted += 1;
            }
        }

        let score = matched.saturating_sub(contradicted) as f64 / key_point_terms.len() as f64;
        score.clamp(0.0, 1.0)
    }

    fn terms(&self, text: &str) -> HashSet<String> {
        self.analyzer.analyze(text).into_iter().collect()
    }
}

impl Matcher for TermOverlapMatcher {
    fn slug(&self) -> String {
        let mut slug = String::from("term-overlap");
        for (enabled, suffix) in [
            (self.config.stemming, "-stemming"),
            (self.config.stop_words, "-stop-words"),
            (self.config.custom_stop_words, "-custom-stop-words"),
            (self.config.synonyms, "-synonyms"),
            (self.config.antonyms, "-antonyms"),
        ] {
            if enabled {
                slug.push_str(suffix);
            }
        }
        if self.config.language != Language::English {
            slug.push('-');
            slug.push_str(self.config.language.as_str());
        }
        if let Some(path) = self.config.lexicon.as_ref().filter(|_| self.needs_lexicon()) {
            let stem = path
                .file_stem()
                .map(|stem| slug_fragment(&stem.to_string_lossy()))
                .filter(|stem| !stem.is_empty())
                .unwrap_or_else(|| "custom".to_string());
            slug.push_str("-lexicon-");
            slug.push_str(&stem);
        }
        slug
    }

    fn name(&self) -> String {
        "Term overlap".to_string()
    }

    fn prepare(&mut self) -> Result<()> {
        if !self.needs_lexicon() {
            return Ok(());
        }
        let mut lexicon = Lexicon::builtin();
        if let Some(path) = &self.config.lexicon {
            log::info!("Loading lexicon {}", path.display());
            lexicon.merge(Lexicon::from_json_file(path)?);
        }
        self.lexicon = lexicon.normalized(&self.analyzer);
        Ok(())
    }

    fn predict(&self, data: &Dataset) -> Result<Labels> {
        if self.needs_lexicon() && self.lexicon.is_empty() {
            log::warn!("Term overlap lexicon is empty; was prepare() called?");
        }

        let key_point_terms: Vec<HashSet<String>> = data
            .key_points
            .iter()
            .map(|kp| self.terms(&kp.text))
            .collect();

        let mut labels = Labels::new();
        for argument in &data.arguments {
            let argument_terms = self.terms(&argument.text);
            for (key_point, kp_terms) in data.key_points.iter().zip(&key_point_terms) {
                if !argument.is_candidate_for(key_point) {
                    continue;
                }
                labels.insert(
                    PairId::of(argument, key_point),
                    self.score(&argument_terms, kp_terms),
                );
            }
        }
        Ok(labels)
    }
}
