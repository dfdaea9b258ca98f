use thiserror::Error;

/// Failures that happen before a record can be validated
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("I/O error: {message}")]
    Io { message: String },

    #[error("Malformed input: {message}")]
    MalformedInput { message: String },
}

impl DomainError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    pub fn malformed_input(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        Self::malformed_input(err.to_string())
    }
}
