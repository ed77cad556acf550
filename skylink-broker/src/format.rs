//! Fixed per-key formatting rules.
//!
//! Each catalog key has exactly one formatter that converts a raw
//! [`KeyValue`] into the canonical [`EventValue`] payload, and exactly one
//! event type tag. A value of the wrong shape yields `None` and the update
//! is dropped without disturbing the subscription; transient malformed
//! updates from the hardware layer are expected.

use crate::event::EventValue;
use skylink_keys::{catalog, KeyValue};

/// Formatting rule for one telemetry key.
#[derive(Clone, Copy)]
pub(crate) struct KeyFormat {
    /// Event type tag published with every payload for this key
    pub event_type: &'static str,
    /// Shape-checked conversion from raw value to payload
    pub format: fn(&KeyValue) -> Option<EventValue>,
}

/// Look up the formatting rule for a catalog key.
///
/// Returns `None` only for names outside the catalog; every catalog entry
/// has a rule.
pub(crate) fn format_for(name: &str) -> Option<KeyFormat> {
    match name {
        catalog::CONNECTION_STATUS => Some(KeyFormat {
            event_type: "connectionStatus",
            format: format_connection,
        }),
        catalog::BATTERY_CHARGE_REMAINING => Some(KeyFormat {
            event_type: "chargeRemaining",
            format: format_charge,
        }),
        catalog::AIRCRAFT_LOCATION => Some(KeyFormat {
            event_type: "aircraftLocation",
            format: format_location,
        }),
        catalog::AIRCRAFT_VELOCITY => Some(KeyFormat {
            event_type: "aircraftVelocity",
            format: format_velocity,
        }),
        catalog::AIRCRAFT_COMPASS_HEADING => Some(KeyFormat {
            event_type: "aircraftCompassHeading",
            format: format_heading,
        }),
        _ => None,
    }
}

fn format_connection(value: &KeyValue) -> Option<EventValue> {
    let connected = value.as_bool()?;
    Some(EventValue::Text(
        if connected { "connected" } else { "disconnected" }.to_string(),
    ))
}

fn format_charge(value: &KeyValue) -> Option<EventValue> {
    value.as_integer().map(EventValue::Integer)
}

fn format_location(value: &KeyValue) -> Option<EventValue> {
    match value {
        KeyValue::Location {
            longitude,
            latitude,
            altitude,
        } => Some(EventValue::fields([
            ("longitude", *longitude),
            ("latitude", *latitude),
            ("altitude", *altitude),
        ])),
        _ => None,
    }
}

fn format_velocity(value: &KeyValue) -> Option<EventValue> {
    match value {
        KeyValue::Vector { x, y, z } => {
            Some(EventValue::fields([("x", *x), ("y", *y), ("z", *z)]))
        }
        _ => None,
    }
}

fn format_heading(value: &KeyValue) -> Option<EventValue> {
    value
        .as_double()
        .map(|heading| EventValue::fields([("heading", heading)]))
}
