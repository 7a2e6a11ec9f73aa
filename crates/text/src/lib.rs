//! # KPM Text
//!
//! Text processing shared by the matchers.
//!
//! ```text
//! raw text
//!     │
//!     ├──> tokenize (Unicode word boundaries, lower-case)
//!     ├──> stop word filter (language list + optional debate list)
//!     ├──> Snowball stemmer (optional)
//!     │
//!     ├──> Lexicon (synonyms / antonyms in normalized form)
//!     └──> Vectorizer (bag of words or tf-idf, sparse)
//! ```

mod analyzer;
mod error;
mod language;
mod lexicon;
mod stopwords;
mod tokenizer;
mod vectorizer;

pub use analyzer::{Analyzer, AnalyzerConfig};
pub use error::{Result, TextError};
pub use language::Language;
pub use lexicon::Lexicon;
pub use stopwords::{StopwordFilter, CUSTOM_STOP_WORDS};
pub use tokenizer::tokenize;
pub use vectorizer::{Encoding, SparseVector, Vectorizer};
