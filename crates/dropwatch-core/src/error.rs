use thiserror::Error;

/// Top-level error type for dropwatch.
#[derive(Debug, Error)]
pub enum DropwatchError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// DOM extraction against a channel page failed.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// A claim could not be carried out.
    #[error("claim error: {0}")]
    Claim(String),

    /// Browser session error.
    #[error("browser error: {0}")]
    Browser(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
