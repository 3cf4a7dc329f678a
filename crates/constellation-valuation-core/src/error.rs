use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Domain error in {context}: {reason}")]
    Domain { context: String, reason: String },

    #[error("Malformed configuration: missing required field '{field}'")]
    MalformedConfig { field: String },

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::SerializationError(e.to_string())
    }
}
