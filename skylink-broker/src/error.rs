use thiserror::Error;

use crate::hardware::HardwareError;
use skylink_keys::KeyError;

/// Errors surfaced by the broker.
#[derive(Debug, Clone, Error)]
pub enum BrokerError {
    /// The symbolic key name is not in the catalog
    #[error(transparent)]
    UnknownKey(#[from] KeyError),

    /// The hardware service reported a registration failure
    #[error("registration failed: {message} (code {code})")]
    Registration { code: i32, message: String },

    /// The hardware service rejected a subscription operation
    #[error("hardware service error for key {name:?}: {source}")]
    Hardware {
        name: &'static str,
        #[source]
        source: HardwareError,
    },
}

/// Result type for broker operations.
pub type Result<T> = std::result::Result<T, BrokerError>;

impl BrokerError {
    /// Build a registration failure from a hardware-reported error.
    pub fn registration(error: &HardwareError) -> Self {
        Self::Registration {
            code: error.code,
            message: error.message.clone(),
        }
    }
}
