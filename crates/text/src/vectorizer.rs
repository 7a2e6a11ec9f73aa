use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// How term occurrences become feature values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// Raw term counts
    #[default]
    BagOfWords,
    /// Term counts weighted by smoothed inverse document frequency, L2 normalised
    Tfidf,
}

impl Encoding {
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::BagOfWords => "bow",
            Self::Tfidf => "tfidf",
        }
    }
}

/// Sparse feature vector; indices are strictly increasing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    #[must_use]
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(idx, value)| dense.get(*idx).map(|w| w * value))
            .sum()
    }

    #[must_use]
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Maps analyzed documents onto a fixed vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vectorizer {
    encoding: Encoding,
    vocabulary: HashMap<String, usize>,
    /// Per-term idf weights; empty for bag of words
    idf: Vec<f64>,
}

impl Vectorizer {
    /// Build the vocabulary (sorted by term) and idf weights from documents
    pub fn fit<D: AsRef<[String]>>(encoding: Encoding, documents: &[D]) -> Self {
        let terms: BTreeSet<&str> = documents
            .iter()
            .flat_map(|doc| doc.as_ref().iter().map(String::as_str))
            .collect();
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        let idf = match encoding {
            Encoding::BagOfWords => Vec::new(),
            Encoding::Tfidf => {
                let mut df = vec![0usize; vocabulary.len()];
                for doc in documents {
                    let unique: BTreeSet<usize> = doc
                        .as_ref()
                        .iter()
                        .filter_map(|term| vocabulary.get(term).copied())
                        .collect();
                    for idx in unique {
                        df[idx] += 1;
                    }
                }
                let n = documents.len() as f64;
                df.into_iter()
                    .map(|count| ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0)
                    .collect()
            }
        };

        log::debug!(
            "Fitted {} vectorizer on {} documents ({} terms)",
            encoding.slug(),
            documents.len(),
            vocabulary.len()
        );

        Self {
            encoding,
            vocabulary,
            idf,
        }
    }

    /// Vectorize one analyzed document. Unknown terms are ignored.
    pub fn transform(&self, document: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in document {
            if let Some(idx) = self.vocabulary.get(term) {
                *counts.entry(*idx).or_insert(0.0) += 1.0;
            }
        }
        let mut entries: Vec<(usize, f64)> = counts.into_iter().collect();
        entries.sort_unstable_by_key(|(idx, _)| *idx);

        if self.encoding == Encoding::Tfidf {
            for (idx, value) in &mut entries {
                *value *= self.idf[*idx];
            }
            let norm = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, value) in &mut entries {
                    *value /= norm;
                }
            }
        }

        SparseVector { entries }
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[must_use]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Whether every vocabulary index is distinct and in range, and tf-idf
    /// weights cover the whole vocabulary. Deserialized vectorizers must be
    /// checked before `transform`.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let size = self.vocabulary.len();
        let idf_matches = match self.encoding {
            Encoding::BagOfWords => self.idf.is_empty(),
            Encoding::Tfidf => self.idf.len() == size,
        };
        let mut seen = vec![false; size];
        idf_matches
            && self
                .vocabulary
                .values()
                .all(|&idx| idx < size && !std::mem::replace(&mut seen[idx], true))
    }
}
