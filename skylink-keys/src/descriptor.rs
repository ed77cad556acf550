//! Key descriptors and the closed set of hardware domains.

use serde::Serialize;

/// Hardware domain a telemetry key belongs to.
///
/// The hardware SDK addresses keys through per-domain key types; this enum
/// is the closed, compile-time equivalent. Adding a domain is a source
/// change, never a runtime registration.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub enum KeyDomain {
    /// Product connection state
    Connection,
    /// Smart battery
    Battery,
    /// Flight controller (location, velocity, attitude)
    FlightController,
    /// Camera
    Camera,
    /// Gimbal
    Gimbal,
    /// Mounted payload
    Payload,
    /// Whole-product parameters
    Product,
    /// Remote controller
    RemoteController,
    /// Handheld controller
    HandheldController,
    /// Mission manager
    Mission,
    /// Air link (transmission)
    AirLink,
    /// Accessory aggregation
    Accessory,
}

impl KeyDomain {
    /// Stable identifier used in logs and diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyDomain::Connection => "connection",
            KeyDomain::Battery => "battery",
            KeyDomain::FlightController => "flightController",
            KeyDomain::Camera => "camera",
            KeyDomain::Gimbal => "gimbal",
            KeyDomain::Payload => "payload",
            KeyDomain::Product => "product",
            KeyDomain::RemoteController => "remoteController",
            KeyDomain::HandheldController => "handheldController",
            KeyDomain::Mission => "mission",
            KeyDomain::AirLink => "airLink",
            KeyDomain::Accessory => "accessory",
        }
    }
}

impl std::fmt::Display for KeyDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptor for a single telemetry key.
///
/// One instance exists per catalog entry; all fields are `'static` and the
/// type is `Copy`, so descriptors can be passed around freely without
/// allocation. The symbolic `name` is unique across the catalog.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize)]
pub struct KeyDescriptor {
    /// Symbolic name consumers use to refer to this key
    pub name: &'static str,
    /// Hardware domain the key lives in
    pub domain: KeyDomain,
    /// Parameter string within the domain, as the hardware SDK spells it
    pub parameter: &'static str,
}

impl KeyDescriptor {
    /// Create a descriptor. Only the catalog constructs these.
    pub(crate) const fn new(
        name: &'static str,
        domain: KeyDomain,
        parameter: &'static str,
    ) -> Self {
        Self {
            name,
            domain,
            parameter,
        }
    }
}

impl std::fmt::Display for KeyDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.domain, self.parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_display_is_stable() {
        assert_eq!(KeyDomain::FlightController.to_string(), "flightController");
        assert_eq!(KeyDomain::Battery.to_string(), "battery");
    }

    #[test]
    fn descriptor_display_shows_domain_and_parameter() {
        let descriptor =
            KeyDescriptor::new("aircraft location", KeyDomain::FlightController, "aircraftLocation");
        assert_eq!(descriptor.to_string(), "flightController/aircraftLocation");
    }
}
