//! Static key catalog: symbolic name → descriptor.

use crate::descriptor::{KeyDescriptor, KeyDomain};
use crate::error::KeyError;

/// Symbolic name of the product connection state key.
pub const CONNECTION_STATUS: &str = "connection status";
/// Symbolic name of the battery charge key.
pub const BATTERY_CHARGE_REMAINING: &str = "battery charge remaining";
/// Symbolic name of the aircraft location key.
pub const AIRCRAFT_LOCATION: &str = "aircraft location";
/// Symbolic name of the aircraft velocity key.
pub const AIRCRAFT_VELOCITY: &str = "aircraft velocity";
/// Symbolic name of the aircraft compass heading key.
pub const AIRCRAFT_COMPASS_HEADING: &str = "aircraft compass heading";

const ENTRIES: [KeyDescriptor; 5] = [
    KeyDescriptor::new(CONNECTION_STATUS, KeyDomain::Connection, "connection"),
    KeyDescriptor::new(
        BATTERY_CHARGE_REMAINING,
        KeyDomain::Battery,
        "chargeRemainingInPercent",
    ),
    KeyDescriptor::new(
        AIRCRAFT_LOCATION,
        KeyDomain::FlightController,
        "aircraftLocation",
    ),
    KeyDescriptor::new(AIRCRAFT_VELOCITY, KeyDomain::FlightController, "velocity"),
    KeyDescriptor::new(
        AIRCRAFT_COMPASS_HEADING,
        KeyDomain::FlightController,
        "compassHeading",
    ),
];

/// Fixed mapping from symbolic key names to hardware descriptors.
///
/// The catalog is built into the binary and is not expected to grow via
/// configuration. All lookups are pure and lock-free.
#[derive(Debug)]
pub struct KeyCatalog;

impl KeyCatalog {
    /// Resolve a symbolic name to its descriptor.
    ///
    /// Returns [`KeyError::UnknownKey`] for names outside the catalog.
    pub fn resolve(name: &str) -> Result<KeyDescriptor, KeyError> {
        ENTRIES
            .iter()
            .find(|descriptor| descriptor.name == name)
            .copied()
            .ok_or_else(|| KeyError::UnknownKey(name.to_string()))
    }

    /// Rebuild a descriptor from its domain and parameter string.
    ///
    /// This is the reverse lookup the stop path needs when it is driven by
    /// hardware-level identifiers rather than a symbolic name.
    pub fn reconstruct(domain: KeyDomain, parameter: &str) -> Option<KeyDescriptor> {
        ENTRIES
            .iter()
            .find(|descriptor| descriptor.domain == domain && descriptor.parameter == parameter)
            .copied()
    }

    /// Whether a symbolic name is in the catalog.
    pub fn contains(name: &str) -> bool {
        ENTRIES.iter().any(|descriptor| descriptor.name == name)
    }

    /// All symbolic names, in catalog order.
    pub fn names() -> impl Iterator<Item = &'static str> {
        ENTRIES.iter().map(|descriptor| descriptor.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_catalog_name() {
        for name in KeyCatalog::names() {
            let descriptor = KeyCatalog::resolve(name).unwrap();
            assert_eq!(descriptor.name, name);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = KeyCatalog::resolve("gimbal pitch").unwrap_err();
        assert_eq!(err, KeyError::UnknownKey("gimbal pitch".to_string()));
        assert!(!KeyCatalog::contains("gimbal pitch"));
    }

    #[test]
    fn names_are_unique() {
        let names: Vec<_> = KeyCatalog::names().collect();
        let mut deduped = names.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(names.len(), deduped.len());
    }

    #[test]
    fn battery_key_maps_to_battery_domain() {
        let descriptor = KeyCatalog::resolve(BATTERY_CHARGE_REMAINING).unwrap();
        assert_eq!(descriptor.domain, KeyDomain::Battery);
        assert_eq!(descriptor.parameter, "chargeRemainingInPercent");
    }

    #[test]
    fn flight_controller_keys_share_a_domain() {
        for name in [AIRCRAFT_LOCATION, AIRCRAFT_VELOCITY, AIRCRAFT_COMPASS_HEADING] {
            let descriptor = KeyCatalog::resolve(name).unwrap();
            assert_eq!(descriptor.domain, KeyDomain::FlightController);
        }
    }

    #[test]
    fn reconstruct_inverts_resolution() {
        for name in KeyCatalog::names() {
            let descriptor = KeyCatalog::resolve(name).unwrap();
            let rebuilt = KeyCatalog::reconstruct(descriptor.domain, descriptor.parameter).unwrap();
            assert_eq!(rebuilt, descriptor);
        }
    }

    #[test]
    fn reconstruct_rejects_unknown_pairs() {
        assert!(KeyCatalog::reconstruct(KeyDomain::Camera, "iso").is_none());
        assert!(KeyCatalog::reconstruct(KeyDomain::Battery, "voltage").is_none());
    }
}
