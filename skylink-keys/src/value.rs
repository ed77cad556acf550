//! Value shapes delivered by the hardware service.

use serde::Serialize;

/// A typed value for a telemetry key, as pushed by the hardware service.
///
/// The hardware layer is free to push any shape for any key; consumers of
/// this enum (the per-key formatters) decide whether the shape matches the
/// key and silently drop mismatches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum KeyValue {
    /// Boolean flag (e.g. product connection state)
    Bool(bool),
    /// Whole number (e.g. battery percent)
    Integer(i64),
    /// Single floating-point reading (e.g. compass heading in degrees)
    Double(f64),
    /// Geographic fix
    Location {
        longitude: f64,
        latitude: f64,
        altitude: f64,
    },
    /// Three-axis vector (e.g. velocity in m/s)
    Vector { x: f64, y: f64, z: f64 },
}

impl KeyValue {
    /// The boolean payload, if this value is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            KeyValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this value is an `Integer`.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            KeyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The floating-point payload, if this value is a `Double`.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            KeyValue::Double(d) => Some(*d),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_reject_wrong_shapes() {
        assert_eq!(KeyValue::Bool(true).as_bool(), Some(true));
        assert_eq!(KeyValue::Bool(true).as_integer(), None);
        assert_eq!(KeyValue::Integer(72).as_integer(), Some(72));
        assert_eq!(KeyValue::Integer(72).as_double(), None);
        assert_eq!(KeyValue::Double(1.5).as_double(), Some(1.5));
    }
}
