//! # Skylink Keys
//!
//! Static catalog of the telemetry keys the skylink SDK knows how to
//! observe, plus the value shapes the hardware service delivers for them.
//!
//! A *key* is an addressable telemetry parameter on the aircraft, identified
//! by a [`KeyDomain`] (battery, flight controller, …) and a parameter string
//! within that domain. Consumers refer to keys by a symbolic name
//! (`"battery charge remaining"`); [`KeyCatalog`] translates those names
//! into [`KeyDescriptor`]s understood by the hardware layer.
//!
//! The catalog is fixed at compile time and never mutated, so every lookup
//! is a pure function that can be called concurrently without coordination.

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod value;

pub use catalog::KeyCatalog;
pub use descriptor::{KeyDescriptor, KeyDomain};
pub use error::KeyError;
pub use value::KeyValue;
