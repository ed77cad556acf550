//! Listener dispatch: opening and closing keyed push subscriptions.

use std::sync::{mpsc, Arc, Mutex};

use crate::error::{BrokerError, Result};
use crate::event::TelemetryEvent;
use crate::format;
use crate::hardware::HardwareService;
use crate::iter::EventIterator;
use crate::ledger::SubscriptionLedger;
use skylink_keys::{KeyCatalog, KeyError, KeyValue};

/// Opens and closes hardware push subscriptions for catalog keys, formats
/// raw updates into [`TelemetryEvent`]s, and publishes them to the event
/// channel.
///
/// Duplicate starts are idempotent no-ops; stops for keys that were never
/// started still succeed. The ledger guarantees at most one hardware
/// subscription per key regardless of caller behavior.
pub struct TelemetryBroker {
    hardware: Arc<dyn HardwareService>,
    ledger: Arc<SubscriptionLedger>,
    event_tx: mpsc::Sender<TelemetryEvent>,
    event_rx: Arc<Mutex<mpsc::Receiver<TelemetryEvent>>>,
}

impl TelemetryBroker {
    /// Create a broker over the process-wide hardware handle.
    pub fn new(hardware: Arc<dyn HardwareService>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            hardware,
            ledger: Arc::new(SubscriptionLedger::new()),
            event_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    /// Shared handle to the ledger, for sync membership queries.
    pub fn ledger(&self) -> Arc<SubscriptionLedger> {
        Arc::clone(&self.ledger)
    }

    /// Cloneable blocking iterator over published events.
    pub fn event_iterator(&self) -> EventIterator {
        EventIterator::new(Arc::clone(&self.event_rx))
    }

    /// Start pushing updates for the named key.
    ///
    /// If a subscription is already active for the key this returns `Ok`
    /// immediately without touching the hardware service. If the hardware
    /// rejects the subscription the ledger entry is released again so a
    /// later retry can succeed.
    pub async fn start_listener(&self, name: &str) -> Result<()> {
        let descriptor = KeyCatalog::resolve(name)?;
        let format = format::format_for(descriptor.name)
            .ok_or_else(|| KeyError::UnknownKey(name.to_string()))?;

        if !self.ledger.try_acquire(descriptor.name) {
            tracing::debug!(key = descriptor.name, "listener already active, skipping");
            return Ok(());
        }

        let event_tx = self.event_tx.clone();
        let key = descriptor.name;
        let on_update = Box::new(move |_old: Option<KeyValue>, new: Option<KeyValue>| {
            let Some(new) = new else {
                tracing::trace!(key, "update without new value dropped");
                return;
            };
            match (format.format)(&new) {
                Some(value) => {
                    // Receiver gone means the consumer stopped listening;
                    // nothing to do but keep the subscription healthy
                    let _ = event_tx.send(TelemetryEvent::new(format.event_type, value));
                }
                None => {
                    tracing::trace!(key, ?new, "update with unexpected shape dropped");
                }
            }
        });

        match self.hardware.start_key_updates(descriptor, on_update).await {
            Ok(()) => {
                tracing::debug!(key = descriptor.name, "listener started");
                Ok(())
            }
            Err(source) => {
                self.ledger.release(descriptor.name);
                Err(BrokerError::Hardware {
                    name: descriptor.name,
                    source,
                })
            }
        }
    }

    /// Stop pushing updates for the named key.
    ///
    /// Unknown names fail with `UnknownKey`; for known keys this always
    /// succeeds, even when no subscription was active. The hardware close is
    /// fire-and-forget cleanup: a failure there is logged, the ledger entry
    /// is released regardless.
    pub async fn stop_listener(&self, name: &str) -> Result<()> {
        let descriptor = KeyCatalog::resolve(name)?;

        if let Err(error) = self.hardware.stop_key_updates(descriptor).await {
            tracing::warn!(key = descriptor.name, %error, "hardware teardown failed");
        }
        self.ledger.release(descriptor.name);
        tracing::debug!(key = descriptor.name, "listener stopped");
        Ok(())
    }

    /// Close the hardware subscription for every key still in the ledger.
    ///
    /// Called on teardown so no native listener registrations leak past the
    /// process.
    pub async fn shutdown(&self) {
        let remaining = self.ledger.active();
        if !remaining.is_empty() {
            tracing::info!(count = remaining.len(), "shutting down active listeners");
        }
        for name in remaining {
            // Ledger entries always resolve; they were admitted via the catalog
            if let Ok(descriptor) = KeyCatalog::resolve(name) {
                if let Err(error) = self.hardware.stop_key_updates(descriptor).await {
                    tracing::warn!(key = name, %error, "hardware teardown failed");
                }
            }
            self.ledger.release(name);
        }
    }
}
