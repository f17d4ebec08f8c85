use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Gemini API error ({status}): {message}")]
    ProviderError { status: u16, message: String },
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for GenerationError {
    fn from(err: serde_json::Error) -> Self {
        GenerationError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_message_carries_status_and_text() {
        let err = GenerationError::ProviderError {
            status: 403,
            message: "API key not valid".into(),
        };
        assert_eq!(err.to_string(), "Gemini API error (403): API key not valid");
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let err: GenerationError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, GenerationError::SerializationError(_)));
        assert!(err.to_string().starts_with("Serialization error: "));
    }
}
