//! Error types for tfsynth

/// Error type for synthesis operations
#[derive(Debug, thiserror::Error)]
pub enum SynthError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Duplicate address: {0}")]
    DuplicateAddress(String),

    #[error("Invalid remote state: {0}")]
    InvalidState(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Decoding error: {0}")]
    DecodingError(String),

    #[error("{0}")]
    Custom(String),
}

/// Result type alias for tfsynth operations
pub type Result<T> = std::result::Result<T, SynthError>;

impl From<String> for SynthError {
    fn from(s: String) -> Self {
        SynthError::Custom(s)
    }
}

impl From<&str> for SynthError {
    fn from(s: &str) -> Self {
        SynthError::Custom(s.to_string())
    }
}
