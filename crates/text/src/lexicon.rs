use crate::analyzer::Analyzer;
use crate::error::Result;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Synonym and antonym relations between single terms.
///
/// Relations are symmetric: adding `a ~ b` also adds `b ~ a`.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    synonyms: HashMap<String, HashSet<String>>,
    antonyms: HashMap<String, HashSet<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LexiconFile {
    synonyms: HashMap<String, Vec<String>>,
    antonyms: HashMap<String, Vec<String>>,
}

impl Lexicon {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Lexicon with built-in relations for common debate vocabulary
    pub fn builtin() -> Self {
        let mut lexicon = Self::default();

        // Harm and benefit
        lexicon.add_synonyms("harm", &["damage", "hurt", "injure", "harmful", "dangerous"]);
        lexicon.add_synonyms("benefit", &["advantage", "help", "gain", "beneficial", "good"]);
        lexicon.add_synonyms("danger", &["risk", "threat", "hazard", "unsafe"]);
        lexicon.add_antonyms("harm", &["benefit", "help", "protect"]);
        lexicon.add_antonyms("safe", &["dangerous", "unsafe", "risky"]);

        // Rights and freedom
        lexicon.add_synonyms("freedom", &["liberty", "right", "choice", "autonomy"]);
        lexicon.add_synonyms("ban", &["prohibit", "forbid", "outlaw", "restrict"]);
        lexicon.add_antonyms("ban", &["allow", "permit", "legalize", "legalise"]);
        lexicon.add_antonyms("freedom", &["restriction", "oppression", "control"]);

        // Money
        lexicon.add_synonyms("money", &["cost", "funds", "funding", "budget", "expense"]);
        lexicon.add_synonyms("expensive", &["costly", "pricey"]);
        lexicon.add_antonyms("expensive", &["cheap", "affordable", "inexpensive"]);

        // People
        lexicon.add_synonyms("children", &["kids", "youth", "minors", "child"]);
        lexicon.add_synonyms("parents", &["families", "guardians", "parent"]);
        lexicon.add_synonyms("government", &["state", "authorities", "administration"]);
        lexicon.add_synonyms("society", &["community", "public", "citizens"]);

        // Change
        lexicon.add_synonyms("increase", &["raise", "grow", "rise", "boost", "more"]);
        lexicon.add_synonyms("decrease", &["reduce", "lower", "decline", "cut", "less"]);
        lexicon.add_antonyms("increase", &["decrease", "reduce", "lower"]);

        // Judgement
        lexicon.add_synonyms("important", &["essential", "crucial", "vital", "necessary"]);
        lexicon.add_synonyms("unfair", &["unjust", "discriminatory", "inequitable"]);
        lexicon.add_antonyms("fair", &["unfair", "unjust"]);
        lexicon.add_antonyms("good", &["bad", "harmful"]);
        lexicon.add_antonyms("effective", &["ineffective", "useless"]);

        lexicon
    }

    /// Load additional relations from a JSON file:
    /// `{ "synonyms": { "term": ["other", ...] }, "antonyms": { ... } }`
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_json(&bytes)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let file: LexiconFile = serde_json::from_slice(bytes)?;
        let mut lexicon = Self::default();
        for (term, others) in &file.synonyms {
            let others: Vec<&str> = others.iter().map(String::as_str).collect();
            lexicon.add_synonyms(term, &others);
        }
        for (term, others) in &file.antonyms {
            let others: Vec<&str> = others.iter().map(String::as_str).collect();
            lexicon.add_antonyms(term, &others);
        }
        Ok(lexicon)
    }

    pub fn add_synonyms(&mut self, term: &str, others: &[&str]) {
        add_symmetric(&mut self.synonyms, term, others);
    }

    pub fn add_antonyms(&mut self, term: &str, others: &[&str]) {
        add_symmetric(&mut self.antonyms, term, others);
    }

    /// Merge another lexicon into this one
    pub fn merge(&mut self, other: Lexicon) {
        for (term, others) in other.synonyms {
            self.synonyms.entry(term).or_default().extend(others);
        }
        for (term, others) in other.antonyms {
            self.antonyms.entry(term).or_default().extend(others);
        }
    }

    pub fn synonyms(&self, term: &str) -> impl Iterator<Item = &str> {
        related(&self.synonyms, term)
    }

    pub fn antonyms(&self, term: &str) -> impl Iterator<Item = &str> {
        related(&self.antonyms, term)
    }

    #[must_use]
    pub fn are_synonyms(&self, a: &str, b: &str) -> bool {
        self.synonyms.get(a).is_some_and(|set| set.contains(b))
    }

    #[must_use]
    pub fn are_antonyms(&self, a: &str, b: &str) -> bool {
        self.antonyms.get(a).is_some_and(|set| set.contains(b))
    }

    /// Rewrite every term into the analyzer's normal form (lower-cased,
    /// possibly stemmed). Terms the analyzer drops as stop words are removed.
    #[must_use]
    pub fn normalized(&self, analyzer: &Analyzer) -> Self {
        Self {
            synonyms: normalize_relation(&self.synonyms, analyzer),
            antonyms: normalize_relation(&self.antonyms, analyzer),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty() && self.antonyms.is_empty()
    }
}

fn add_symmetric(relation: &mut HashMap<String, HashSet<String>>, term: &str, others: &[&str]) {
    let term = term.to_lowercase();
    for other in others {
        let other = other.to_lowercase();
        if other == term {
            continue;
        }
        relation
            .entry(term.clone())
            .or_default()
            .insert(other.clone());
        relation.entry(other).or_default().insert(term.clone());
    }
}

fn related<'a>(
    relation: &'a HashMap<String, HashSet<String>>,
    term: &str,
) -> impl Iterator<Item = &'a str> {
    relation
        .get(term)
        .into_iter()
        .flat_map(|set| set.iter().map(String::as_str))
}

fn normalize_relation(
    relation: &HashMap<String, HashSet<String>>,
    analyzer: &Analyzer,
) -> HashMap<String, HashSet<String>> {
    let mut out: HashMap<String, HashSet<String>> = HashMap::new();
    for (term, others) in relation {
        let Some(term) = analyzer.normalize_term(term) else {
            continue;
        };
        for other in others {
            let Some(other) = analyzer.normalize_term(other) else {
                continue;
            };
            if other != term {
                out.entry(term.clone()).or_default().insert(other);
            }
        }
    }
    out
}
