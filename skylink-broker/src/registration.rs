//! Device-registration handshake.
//!
//! The hardware service reports registration progress through a single
//! callback that may fire any number of times, repeat terminal reports, or
//! interleave success and failure. The controller funnels those reports
//! through a one-shot [`OutcomeCell`] so the caller observes exactly one
//! outcome per attempt, and performs the connection-mode side effect
//! (bridge vs direct) only for the first terminal report.

use std::sync::{Arc, Mutex};

use crate::error::BrokerError;
use crate::hardware::{HardwareService, RegistrationUpdate};
use crate::outcome::{self, OutcomeCell, OutcomeReceiver};

/// Lifecycle of a registration attempt.
///
/// Transitions are one-directional; `Registered` and `Failed` are terminal
/// for an attempt. A fresh attempt restarts at `Registering`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationState {
    /// No attempt has been made
    Unregistered,
    /// An attempt is in flight
    Registering,
    /// The current attempt succeeded
    Registered,
    /// The current attempt failed
    Failed,
}

/// Drives the one-time registration handshake with the hardware service.
pub struct RegistrationController {
    hardware: Arc<dyn HardwareService>,
    state: Arc<Mutex<RegistrationState>>,
}

impl RegistrationController {
    /// Create a controller over the process-wide hardware handle.
    pub fn new(hardware: Arc<dyn HardwareService>) -> Self {
        Self {
            hardware,
            state: Arc::new(Mutex::new(RegistrationState::Unregistered)),
        }
    }

    /// Current state of the latest attempt.
    pub fn state(&self) -> RegistrationState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(RegistrationState::Failed)
    }

    /// Start a registration attempt.
    ///
    /// Wires the progress callback, *then* triggers the hardware's
    /// registration process; the reverse order could miss the first report.
    /// The returned receiver yields exactly one outcome:
    ///
    /// - on the first report with `registered == true`, the connection mode
    ///   is selected (bridge relay at `bridge_address` if supplied,
    ///   otherwise a direct product connection) and `Ok(())` is delivered;
    /// - on the first report carrying an error while not registered,
    ///   [`BrokerError::Registration`] is delivered;
    /// - reports with neither (`registered == false`, no error) are
    ///   non-terminal progress and are skipped;
    /// - every report after the first terminal one is ignored entirely,
    ///   connection-mode side effects included.
    ///
    /// Must be called within a tokio runtime; the report consumer runs as a
    /// spawned task.
    pub async fn register(
        &self,
        bridge_address: Option<String>,
    ) -> OutcomeReceiver<std::result::Result<(), BrokerError>> {
        let (cell, outcome_rx) = outcome::channel();
        let cell = Arc::new(cell);

        if let Ok(mut state) = self.state.lock() {
            *state = RegistrationState::Registering;
        }

        let (update_tx, update_rx) = tokio::sync::mpsc::unbounded_channel();
        self.hardware.watch_registration(Box::new(move |update| {
            // Consumer gone means the attempt already resolved
            let _ = update_tx.send(update);
        }));

        tokio::spawn(consume_updates(
            update_rx,
            Arc::clone(&self.hardware),
            Arc::clone(&self.state),
            cell,
            bridge_address,
        ));

        self.hardware.begin_registration().await;

        outcome_rx
    }
}

async fn consume_updates(
    mut update_rx: tokio::sync::mpsc::UnboundedReceiver<RegistrationUpdate>,
    hardware: Arc<dyn HardwareService>,
    state: Arc<Mutex<RegistrationState>>,
    cell: Arc<OutcomeCell<std::result::Result<(), BrokerError>>>,
    bridge_address: Option<String>,
) {
    while let Some(update) = update_rx.recv().await {
        if cell.is_completed() {
            tracing::warn!("ignoring registration callback after outcome was delivered");
            break;
        }

        if update.registered {
            match &bridge_address {
                Some(address) => {
                    tracing::debug!(%address, "registration succeeded, enabling bridge mode");
                    hardware.enable_bridge_mode(address).await;
                }
                None => {
                    tracing::debug!("registration succeeded, connecting to product");
                    hardware.connect_to_product().await;
                }
            }
            // State must be terminal before the outcome is observable
            set_state(&state, RegistrationState::Registered);
            cell.complete(Ok(()));
            break;
        }

        if let Some(error) = update.error {
            tracing::debug!(code = error.code, message = %error.message, "registration failed");
            set_state(&state, RegistrationState::Failed);
            cell.complete(Err(BrokerError::registration(&error)));
            break;
        }

        // Not registered yet and no error: non-terminal progress report
        tracing::trace!("registration still pending");
    }
}

fn set_state(state: &Mutex<RegistrationState>, next: RegistrationState) {
    if let Ok(mut state) = state.lock() {
        *state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::HardwareError;
    use crate::testing::MockHardware;

    fn wait_outcome(
        rx: OutcomeReceiver<std::result::Result<(), BrokerError>>,
    ) -> Option<std::result::Result<(), BrokerError>> {
        // The consumer task runs on the runtime; don't block an executor thread
        std::thread::spawn(move || rx.recv()).join().unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn callback_is_wired_before_registration_begins() {
        let hardware = Arc::new(MockHardware::new());
        let controller = RegistrationController::new(Arc::clone(&hardware) as Arc<dyn HardwareService>);

        let _rx = controller.register(None).await;

        assert!(hardware.watch_called_before_begin());
        assert_eq!(hardware.begin_calls(), 1);
        assert_eq!(controller.state(), RegistrationState::Registering);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn success_without_bridge_connects_directly() {
        let hardware = Arc::new(MockHardware::new());
        let controller = RegistrationController::new(Arc::clone(&hardware) as Arc<dyn HardwareService>);

        let rx = controller.register(None).await;
        hardware.fire_registration(RegistrationUpdate::success());

        assert!(matches!(wait_outcome(rx), Some(Ok(()))));
        assert_eq!(hardware.direct_connections(), 1);
        assert_eq!(hardware.bridge_address(), None);
        assert_eq!(controller.state(), RegistrationState::Registered);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn success_with_bridge_uses_relay_address() {
        let hardware = Arc::new(MockHardware::new());
        let controller = RegistrationController::new(Arc::clone(&hardware) as Arc<dyn HardwareService>);

        let rx = controller.register(Some("10.0.0.1".to_string())).await;
        hardware.fire_registration(RegistrationUpdate::success());

        assert!(matches!(wait_outcome(rx), Some(Ok(()))));
        assert_eq!(hardware.bridge_address(), Some("10.0.0.1".to_string()));
        assert_eq!(hardware.direct_connections(), 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failure_carries_code_and_message() {
        let hardware = Arc::new(MockHardware::new());
        let controller = RegistrationController::new(Arc::clone(&hardware) as Arc<dyn HardwareService>);

        let rx = controller.register(None).await;
        hardware.fire_registration(RegistrationUpdate::failure(HardwareError::new(
            -7,
            "invalid app key",
        )));

        match wait_outcome(rx) {
            Some(Err(BrokerError::Registration { code, message })) => {
                assert_eq!(code, -7);
                assert_eq!(message, "invalid app key");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(controller.state(), RegistrationState::Failed);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn mixed_multi_fire_delivers_first_terminal_outcome_once() {
        let hardware = Arc::new(MockHardware::new());
        let controller = RegistrationController::new(Arc::clone(&hardware) as Arc<dyn HardwareService>);

        let rx = controller.register(None).await;
        // Three fires in a row with mixed payloads: pending, failure, success
        hardware.fire_registration(RegistrationUpdate::pending());
        hardware.fire_registration(RegistrationUpdate::failure(HardwareError::new(
            -1,
            "transient failure",
        )));
        hardware.fire_registration(RegistrationUpdate::success());

        // The first terminal report (the failure) wins
        match wait_outcome(rx) {
            Some(Err(BrokerError::Registration { code, .. })) => assert_eq!(code, -1),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(controller.state(), RegistrationState::Failed);

        // The late success must not trigger a connection attempt
        assert_eq!(hardware.direct_connections(), 0);
        assert_eq!(hardware.bridge_address(), None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn repeated_success_fires_connect_once() {
        let hardware = Arc::new(MockHardware::new());
        let controller = RegistrationController::new(Arc::clone(&hardware) as Arc<dyn HardwareService>);

        let rx = controller.register(None).await;
        hardware.fire_registration(RegistrationUpdate::success());
        hardware.fire_registration(RegistrationUpdate::success());
        hardware.fire_registration(RegistrationUpdate::success());

        assert!(matches!(wait_outcome(rx), Some(Ok(()))));
        assert_eq!(hardware.direct_connections(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn fresh_attempt_restarts_at_registering() {
        let hardware = Arc::new(MockHardware::new());
        let controller = RegistrationController::new(Arc::clone(&hardware) as Arc<dyn HardwareService>);

        let rx = controller.register(None).await;
        hardware.fire_registration(RegistrationUpdate::failure(HardwareError::new(-1, "nope")));
        assert!(matches!(wait_outcome(rx), Some(Err(_))));
        assert_eq!(controller.state(), RegistrationState::Failed);

        let rx = controller.register(None).await;
        assert_eq!(controller.state(), RegistrationState::Registering);
        hardware.fire_registration(RegistrationUpdate::success());
        assert!(matches!(wait_outcome(rx), Some(Ok(()))));
        assert_eq!(controller.state(), RegistrationState::Registered);
    }
}
