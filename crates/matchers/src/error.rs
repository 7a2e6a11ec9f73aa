use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatcherError>;

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("Matcher '{0}' must be trained or loaded before predicting")]
    NotTrained(String),

    #[error("Invalid matcher configuration: {0}")]
    InvalidConfig(String),

    #[error("Training failed: {0}")]
    Training(String),

    #[error("Data error: {0}")]
    Data(#[from] kpm_model::DataError),

    #[error("Text processing error: {0}")]
    Text(#[from] kpm_text::TextError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl MatcherError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
