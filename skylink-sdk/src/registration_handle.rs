//! Blocking handle for a registration attempt's single outcome.

use std::time::Duration;

use skylink_broker::{BrokerError, OutcomeReceiver};

use crate::error::SkylinkError;

/// Handle to an in-flight registration attempt.
///
/// The underlying channel delivers exactly one outcome; consuming the
/// handle consumes the attempt's result.
#[derive(Debug)]
pub struct RegistrationHandle {
    outcome: OutcomeReceiver<Result<(), BrokerError>>,
}

impl RegistrationHandle {
    pub(crate) fn new(outcome: OutcomeReceiver<Result<(), BrokerError>>) -> Self {
        Self { outcome }
    }

    /// Block until the attempt resolves.
    pub fn wait(self) -> Result<(), SkylinkError> {
        match self.outcome.recv() {
            Some(Ok(())) => Ok(()),
            Some(Err(error)) => Err(error.into()),
            None => Err(SkylinkError::WorkerDisconnected),
        }
    }

    /// Block until the attempt resolves or `timeout` expires.
    ///
    /// On timeout the handle is returned so the caller can keep waiting.
    pub fn wait_timeout(self, timeout: Duration) -> Result<Result<(), SkylinkError>, Self> {
        match self.outcome.recv_timeout(timeout) {
            Ok(Some(Ok(()))) => Ok(Ok(())),
            Ok(Some(Err(error))) => Ok(Err(error.into())),
            Ok(None) => Ok(Err(SkylinkError::WorkerDisconnected)),
            Err(outcome) => Err(Self { outcome }),
        }
    }
}
