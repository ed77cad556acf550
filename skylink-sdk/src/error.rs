use thiserror::Error;

use skylink_broker::BrokerError;

/// Errors surfaced by the sync facade.
#[derive(Debug, Error)]
pub enum SkylinkError {
    /// Error from the underlying broker (unknown key, hardware rejection,
    /// registration failure)
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// The background worker is gone; no further commands can be processed
    #[error("background worker disconnected")]
    WorkerDisconnected,
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, SkylinkError>;
