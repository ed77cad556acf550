//! Canonical event payloads published to the consumer.

use std::collections::BTreeMap;

use serde::Serialize;

/// Value carried by a telemetry event: a scalar or a flat mapping of named
/// numeric fields. Serializes without an enum wrapper so the host transport
/// sees `72` or `{"heading": 12.5}` directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EventValue {
    /// Textual scalar (e.g. `"connected"`)
    Text(String),
    /// Integer scalar (e.g. battery percent)
    Integer(i64),
    /// Flat map of named numeric fields (e.g. location coordinates)
    Fields(BTreeMap<&'static str, f64>),
}

impl EventValue {
    /// Build a field map from `(name, value)` pairs.
    pub fn fields<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, f64)>,
    {
        Self::Fields(pairs.into_iter().collect())
    }
}

/// A formatted telemetry update, tagged with the event type of the key that
/// produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryEvent {
    /// Event type tag, one per catalog key (e.g. `"chargeRemaining"`)
    #[serde(rename = "type")]
    pub event_type: &'static str,
    /// Formatted payload
    pub value: EventValue,
}

impl TelemetryEvent {
    /// Create an event.
    pub fn new(event_type: &'static str, value: EventValue) -> Self {
        Self { event_type, value }
    }
}
