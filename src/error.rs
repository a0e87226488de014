//! Error types shared by the stores and the controller.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BotWaveError {
    /// `window.localStorage` could not be reached.
    #[error("local storage is unavailable")]
    Storage,

    /// A stored value exists but is not valid JSON for its type.
    #[error("stored value under '{key}' is corrupted: {message}")]
    Corrupt { key: String, message: String },

    #[error("failed to serialize value: {0}")]
    Serialize(String),

    #[error("broadcast channel error: {0}")]
    Channel(String),

    #[error("'{0}' is not an email address")]
    InvalidEmail(String),
}

impl BotWaveError {
    pub fn corrupt(key: impl Into<String>, err: serde_json::Error) -> Self {
        Self::Corrupt {
            key: key.into(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BotWaveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BotWaveError>;
