//! Error taxonomy for the wheel engine

use thiserror::Error;

use crate::platform::storage::StorageError;

#[derive(Error, Debug)]
pub enum WheelError {
    #[error("Invalid wheel configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Draw outcome tier '{tier}' is not on the wheel")]
    OutcomeNotFound { tier: String },

    #[error("A spin is already in flight")]
    SpinAlreadyInFlight,

    #[error("Spin still running ({remaining_ms} ms left)")]
    SpinStillRunning { remaining_ms: u32 },

    #[error("No spin in flight")]
    NotSpinning,

    #[error("Wheel has no configuration loaded")]
    NotConfigured,

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Draw rejected: {0}")]
    DrawRejected(String),
}

impl WheelError {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        WheelError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WheelError>;
