//! Sync-first telemetry manager.

use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;

use skylink_broker::{
    EventIterator, HardwareService, RegistrationController, SubscriptionLedger, TelemetryBroker,
};

use crate::error::{Result, SkylinkError};
use crate::registration_handle::RegistrationHandle;
use crate::worker::{spawn_worker, Command};

/// Sync-first facade over the telemetry broker.
///
/// All methods are blocking and return quickly: listener commands block only
/// for the worker round-trip, registration returns a handle to the single
/// eventual outcome.
///
/// # Example
///
/// ```rust,ignore
/// use skylink_sdk::SkylinkManager;
///
/// let manager = SkylinkManager::new(hardware);
///
/// manager.register_app()?.wait()?;
/// manager.start_listener("battery charge remaining")?;
///
/// for event in manager.events() {
///     println!("{}: {:?}", event.event_type, event.value);
/// }
/// ```
pub struct SkylinkManager {
    /// Send commands to the background worker
    command_tx: mpsc::Sender<Command>,

    /// Consumer side of the event channel
    events: EventIterator,

    /// Shared ledger handle for sync membership queries
    ledger: Arc<SubscriptionLedger>,

    /// Background worker handle (kept alive)
    _worker: JoinHandle<()>,
}

impl SkylinkManager {
    /// Create a manager over the process-wide hardware handle.
    ///
    /// Spawns the background worker; no hardware calls happen until the
    /// first command.
    pub fn new(hardware: Arc<dyn HardwareService>) -> Self {
        let broker = TelemetryBroker::new(Arc::clone(&hardware));
        let controller = RegistrationController::new(hardware);
        let events = broker.event_iterator();
        let ledger = broker.ledger();

        let (command_tx, command_rx) = mpsc::channel();
        let worker = spawn_worker(broker, controller, command_rx);

        Self {
            command_tx,
            events,
            ledger,
            _worker: worker,
        }
    }

    /// Register with the hardware service over a direct connection.
    ///
    /// Returns a handle to the attempt's single outcome.
    pub fn register_app(&self) -> Result<RegistrationHandle> {
        self.register(None)
    }

    /// Register with the hardware service, routing communication through a
    /// network bridge at `address` instead of a direct connection.
    pub fn register_app_with_bridge(&self, address: impl Into<String>) -> Result<RegistrationHandle> {
        self.register(Some(address.into()))
    }

    fn register(&self, bridge_address: Option<String>) -> Result<RegistrationHandle> {
        let (reply, reply_rx) = mpsc::channel();
        self.command_tx
            .send(Command::Register {
                bridge_address,
                reply,
            })
            .map_err(|_| SkylinkError::WorkerDisconnected)?;
        let outcome = reply_rx
            .recv()
            .map_err(|_| SkylinkError::WorkerDisconnected)?;
        Ok(RegistrationHandle::new(outcome))
    }

    /// Start pushing telemetry for the named key.
    ///
    /// Idempotent: a second start for an active key is acknowledged without
    /// opening another hardware subscription. Unknown names fail with an
    /// unknown-key error.
    pub fn start_listener(&self, name: impl Into<String>) -> Result<()> {
        let (reply, reply_rx) = mpsc::channel();
        self.command_tx
            .send(Command::StartListener {
                name: name.into(),
                reply,
            })
            .map_err(|_| SkylinkError::WorkerDisconnected)?;
        reply_rx
            .recv()
            .map_err(|_| SkylinkError::WorkerDisconnected)?
            .map_err(Into::into)
    }

    /// Stop pushing telemetry for the named key.
    ///
    /// Stopping a key that was never started succeeds; unknown names fail
    /// with an unknown-key error.
    pub fn stop_listener(&self, name: impl Into<String>) -> Result<()> {
        let (reply, reply_rx) = mpsc::channel();
        self.command_tx
            .send(Command::StopListener {
                name: name.into(),
                reply,
            })
            .map_err(|_| SkylinkError::WorkerDisconnected)?;
        reply_rx
            .recv()
            .map_err(|_| SkylinkError::WorkerDisconnected)?
            .map_err(Into::into)
    }

    /// Cloneable blocking iterator over telemetry events.
    pub fn events(&self) -> EventIterator {
        self.events.clone()
    }

    /// Whether a listener is currently active for `name`.
    pub fn is_listener_active(&self, name: &str) -> bool {
        self.ledger.is_active(name)
    }

    /// Names of all currently active listeners.
    pub fn active_listeners(&self) -> Vec<&'static str> {
        self.ledger.active()
    }

    /// Tear down all remaining subscriptions and stop the worker.
    ///
    /// Called automatically on drop; exposed for explicit shutdown.
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(Command::Shutdown);
    }
}

impl Drop for SkylinkManager {
    fn drop(&mut self) {
        tracing::debug!(
            active_listeners = self.ledger.len(),
            "skylink manager dropping"
        );
        let _ = self.command_tx.send(Command::Shutdown);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use skylink_broker::testing::MockHardware;
    use skylink_broker::{BrokerError, EventValue, HardwareError, RegistrationUpdate};
    use skylink_keys::{catalog, KeyValue};

    fn manager_with_mock() -> (Arc<MockHardware>, SkylinkManager) {
        let hardware = Arc::new(MockHardware::new());
        let manager = SkylinkManager::new(Arc::clone(&hardware) as Arc<dyn HardwareService>);
        (hardware, manager)
    }

    fn wait_until(deadline: Duration, mut check: impl FnMut() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if check() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn duplicate_start_acknowledges_without_second_subscription() {
        let (hardware, manager) = manager_with_mock();

        manager
            .start_listener(catalog::BATTERY_CHARGE_REMAINING)
            .unwrap();
        manager
            .start_listener(catalog::BATTERY_CHARGE_REMAINING)
            .unwrap();

        assert_eq!(hardware.started_count(catalog::BATTERY_CHARGE_REMAINING), 1);
        assert!(manager.is_listener_active(catalog::BATTERY_CHARGE_REMAINING));
        assert_eq!(
            manager.active_listeners(),
            vec![catalog::BATTERY_CHARGE_REMAINING]
        );
    }

    #[test]
    fn stop_closes_subscription_and_clears_ledger() {
        let (hardware, manager) = manager_with_mock();

        manager.start_listener(catalog::AIRCRAFT_LOCATION).unwrap();
        manager.stop_listener(catalog::AIRCRAFT_LOCATION).unwrap();

        assert!(!manager.is_listener_active(catalog::AIRCRAFT_LOCATION));
        assert!(!hardware.has_open_subscription(catalog::AIRCRAFT_LOCATION));
    }

    #[test]
    fn unknown_key_gets_a_terminal_response() {
        let (_hardware, manager) = manager_with_mock();

        // Both paths must answer; neither may leave the caller hanging
        assert!(matches!(
            manager.start_listener("gimbal pitch"),
            Err(SkylinkError::Broker(BrokerError::UnknownKey(_)))
        ));
        assert!(matches!(
            manager.stop_listener("gimbal pitch"),
            Err(SkylinkError::Broker(BrokerError::UnknownKey(_)))
        ));
    }

    #[test]
    fn stop_of_never_started_key_succeeds() {
        let (_hardware, manager) = manager_with_mock();
        manager.stop_listener(catalog::AIRCRAFT_VELOCITY).unwrap();
    }

    #[test]
    fn telemetry_flows_from_hardware_to_iterator() {
        let (hardware, manager) = manager_with_mock();
        let events = manager.events();

        manager
            .start_listener(catalog::BATTERY_CHARGE_REMAINING)
            .unwrap();
        hardware.fire_key_update(
            catalog::BATTERY_CHARGE_REMAINING,
            None,
            Some(KeyValue::Integer(72)),
        );

        let event = events.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(event.event_type, "chargeRemaining");
        assert_eq!(event.value, EventValue::Integer(72));
    }

    #[test]
    fn registration_success_connects_directly() {
        let (hardware, manager) = manager_with_mock();

        let handle = manager.register_app().unwrap();
        hardware.fire_registration(RegistrationUpdate::success());

        handle.wait().unwrap();
        assert_eq!(hardware.direct_connections(), 1);
        assert_eq!(hardware.bridge_address(), None);
        assert!(hardware.watch_called_before_begin());
    }

    #[test]
    fn registration_with_bridge_uses_relay() {
        let (hardware, manager) = manager_with_mock();

        let handle = manager.register_app_with_bridge("10.0.0.1").unwrap();
        hardware.fire_registration(RegistrationUpdate::success());

        handle.wait().unwrap();
        assert_eq!(hardware.bridge_address(), Some("10.0.0.1".to_string()));
        assert_eq!(hardware.direct_connections(), 0);
    }

    #[test]
    fn registration_multi_fire_delivers_one_outcome() {
        let (hardware, manager) = manager_with_mock();

        let handle = manager.register_app().unwrap();
        hardware.fire_registration(RegistrationUpdate::pending());
        hardware.fire_registration(RegistrationUpdate::failure(HardwareError::new(
            -3,
            "server rejected app key",
        )));
        hardware.fire_registration(RegistrationUpdate::success());

        match handle.wait() {
            Err(SkylinkError::Broker(BrokerError::Registration { code, message })) => {
                assert_eq!(code, -3);
                assert_eq!(message, "server rejected app key");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        // The late success must not have triggered a connection
        assert_eq!(hardware.direct_connections(), 0);
    }

    #[test]
    fn registration_wait_timeout_returns_handle() {
        let (hardware, manager) = manager_with_mock();

        let handle = manager.register_app().unwrap();
        let handle = handle
            .wait_timeout(Duration::from_millis(20))
            .expect_err("no outcome yet");

        hardware.fire_registration(RegistrationUpdate::success());
        handle.wait().unwrap();
    }

    #[test]
    fn shutdown_tears_down_remaining_listeners() {
        let (hardware, manager) = manager_with_mock();

        manager.start_listener(catalog::CONNECTION_STATUS).unwrap();
        manager.start_listener(catalog::AIRCRAFT_LOCATION).unwrap();
        manager.shutdown();

        assert!(wait_until(Duration::from_secs(1), || {
            !hardware.has_open_subscription(catalog::CONNECTION_STATUS)
                && !hardware.has_open_subscription(catalog::AIRCRAFT_LOCATION)
        }));
    }

    #[test]
    fn drop_tears_down_remaining_listeners() {
        let (hardware, manager) = manager_with_mock();

        manager.start_listener(catalog::CONNECTION_STATUS).unwrap();
        drop(manager);

        assert!(wait_until(Duration::from_secs(1), || {
            !hardware.has_open_subscription(catalog::CONNECTION_STATUS)
        }));
    }
}
