use thiserror::Error;

/// Result type for text processing
pub type Result<T> = std::result::Result<T, TextError>;

#[derive(Error, Debug)]
pub enum TextError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid lexicon: {0}")]
    InvalidLexicon(#[from] serde_json::Error),
}
