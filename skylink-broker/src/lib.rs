//! # Skylink Broker
//!
//! Subscription brokerage between the hardware telemetry service and the
//! consumer-facing SDK. This crate owns the three pieces of logic with real
//! invariants:
//!
//! - **[`SubscriptionLedger`]** — at most one active hardware subscription
//!   per telemetry key, enforced with an atomic check-and-set.
//! - **[`TelemetryBroker`]** — opens and closes push subscriptions with the
//!   hardware service, converts raw value updates into canonical
//!   [`TelemetryEvent`]s via fixed per-key formatting rules, and tears down
//!   every remaining subscription on shutdown.
//! - **[`RegistrationController`]** — drives the one-time device
//!   registration handshake and guarantees the caller receives exactly one
//!   outcome even when the hardware callback fires repeatedly or
//!   interleaves success and failure reports.
//!
//! The hardware SDK itself sits behind the [`HardwareService`] trait; this
//! crate never constructs or destroys the hardware handle, it only calls
//! into it.

pub mod dispatch;
pub mod error;
pub mod event;
pub(crate) mod format;
pub mod hardware;
pub mod iter;
pub mod ledger;
pub mod outcome;
pub mod registration;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use dispatch::TelemetryBroker;
pub use error::{BrokerError, Result};
pub use event::{EventValue, TelemetryEvent};
pub use hardware::{HardwareError, HardwareService, RegistrationUpdate};
pub use iter::EventIterator;
pub use ledger::SubscriptionLedger;
pub use outcome::{OutcomeCell, OutcomeReceiver};
pub use registration::{RegistrationController, RegistrationState};

// Re-export the key types consumers need alongside the broker
pub use skylink_keys::{KeyCatalog, KeyDescriptor, KeyDomain, KeyError, KeyValue};
