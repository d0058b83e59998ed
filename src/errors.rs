use thiserror::Error;

#[derive(Error, Debug)]
pub enum VocabularyError {
    #[error("io error: {0:?}")]
    IO(#[from] std::io::Error),

    #[error("not a fastText model (magic {0:#x})")]
    BadMagic(i32),

    #[error("unsupported fastText model version {0}")]
    UnsupportedVersion(i32),

    #[error("model file ends inside the {0}")]
    Truncated(&'static str),

    #[error("word #{0} is not valid utf8")]
    InvalidUtf8(usize),

    #[error("malformed header: {0}")]
    BadHeader(String),
}

/// Failure to fetch or interpret one lookup. Retryable covers transient
/// network conditions (timeouts, connection errors, 5xx, 429).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("retryable: {0}")]
    Retryable(String),

    #[error("terminal: {0}")]
    Terminal(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl LookupError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, LookupError::Retryable(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0:?}")]
    IO(#[from] std::io::Error),

    #[error("config is malformed: {0}")]
    Malformed(#[from] serde_yml::Error),

    #[error("invalid config: {field}: {message}")]
    Invalid { field: String, message: String },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("failed to write checkpoint {file}: {source:?}")]
    Checkpoint {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize relations: {0:?}")]
    Serialize(#[from] serde_json::Error),
}
