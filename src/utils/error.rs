use crate::domain::model::RoundState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Cannot {action} while round is {from:?}")]
    InvalidTransition {
        from: RoundState,
        action: &'static str,
    },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, GameError>;
