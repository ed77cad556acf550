//! # Skylink SDK
//!
//! Sync-first facade over the skylink telemetry broker. All async work is
//! hidden in a background worker thread with its own tokio runtime; callers
//! never need async/await.
//!
//! ## Overview
//!
//! The SDK gives a consumer symbolic, deduplicated, push-based access to a
//! fixed set of aircraft telemetry keys:
//!
//! - **Registration**: drive the one-time registration handshake with the
//!   hardware service, optionally routing through a network bridge, and
//!   receive exactly one outcome no matter how the hardware callback fires.
//! - **Listeners**: start and stop push subscriptions by symbolic key name
//!   (`"battery charge remaining"`, `"aircraft location"`, …). Starting an
//!   already-active listener is a no-op; at most one hardware subscription
//!   exists per key.
//! - **Events**: consume formatted [`TelemetryEvent`]s through a blocking,
//!   cloneable iterator.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use skylink_sdk::SkylinkManager;
//!
//! let manager = SkylinkManager::new(hardware);
//!
//! // One-time handshake; exactly one outcome
//! manager.register_app()?.wait()?;
//!
//! // Subscribe by symbolic name (idempotent)
//! manager.start_listener("battery charge remaining")?;
//!
//! for event in manager.events() {
//!     println!("{}: {:?}", event.event_type, event.value);
//! }
//!
//! manager.stop_listener("battery charge remaining")?;
//! ```
//!
//! ## Architecture
//!
//! [`SkylinkManager`] forwards every operation as a [`worker::Command`] to a
//! background thread owning a current-thread tokio runtime. Commands get an
//! immediate blocking acknowledgment; telemetry updates bypass the worker
//! entirely, flowing from the hardware callback through the per-key
//! formatter straight into the event channel.

pub mod error;
pub mod manager;
pub mod registration_handle;
pub mod worker;

pub use error::{Result, SkylinkError};
pub use manager::SkylinkManager;
pub use registration_handle::RegistrationHandle;

// Re-export the types consumers interact with
pub use skylink_broker::{
    EventIterator, EventValue, HardwareError, HardwareService, RegistrationUpdate, TelemetryEvent,
};
pub use skylink_keys::{catalog, KeyCatalog, KeyDescriptor, KeyDomain, KeyValue};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        EventIterator, EventValue, HardwareService, KeyCatalog, RegistrationHandle, Result,
        SkylinkError, SkylinkManager, TelemetryEvent,
    };
}
