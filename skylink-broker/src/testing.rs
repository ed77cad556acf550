//! In-memory hardware service for tests.
//!
//! Records every call the broker makes and lets tests drive the callback
//! paths by hand: key value updates and registration progress reports fire
//! from whatever thread the test calls them on, mimicking the SDK's
//! delivery threads.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::hardware::{
    HardwareError, HardwareService, KeyUpdateCallback, RegistrationCallback, RegistrationUpdate,
};
use skylink_keys::{KeyDescriptor, KeyValue};

#[derive(Default)]
struct Inner {
    key_callbacks: HashMap<&'static str, KeyUpdateCallback>,
    registration_callback: Option<RegistrationCallback>,
    start_calls: Vec<&'static str>,
    stop_calls: Vec<&'static str>,
    watch_calls: usize,
    begin_calls: usize,
    watch_before_begin: Option<bool>,
    bridge_address: Option<String>,
    direct_connections: usize,
    fail_next_start: Option<HardwareError>,
}

/// Scripted [`HardwareService`] double.
#[derive(Default)]
pub struct MockHardware {
    inner: Mutex<Inner>,
}

impl MockHardware {
    /// Create a mock with no recorded calls.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver a key value update to the subscription for `name`.
    ///
    /// Panics if no subscription is open for the key; a test firing at a
    /// closed subscription is a test bug.
    pub fn fire_key_update(&self, name: &str, old: Option<KeyValue>, new: Option<KeyValue>) {
        let mut inner = self.inner.lock().unwrap();
        let callback = inner
            .key_callbacks
            .get_mut(name)
            .unwrap_or_else(|| panic!("no open subscription for key {name:?}"));
        callback(old, new);
    }

    /// Deliver a registration progress report to the watched callback.
    pub fn fire_registration(&self, update: RegistrationUpdate) {
        let mut inner = self.inner.lock().unwrap();
        let callback = inner
            .registration_callback
            .as_mut()
            .expect("no registration callback attached");
        callback(update);
    }

    /// Make the next `start_key_updates` call fail with `error`.
    pub fn fail_next_start(&self, error: HardwareError) {
        self.inner.lock().unwrap().fail_next_start = Some(error);
    }

    /// How many times a subscription was opened for `name`.
    pub fn started_count(&self, name: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .start_calls
            .iter()
            .filter(|started| **started == name)
            .count()
    }

    /// Every key a subscription open was requested for, in call order.
    pub fn start_calls(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().start_calls.clone()
    }

    /// Every key a subscription close was requested for, in call order.
    pub fn stop_calls(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().stop_calls.clone()
    }

    /// Whether a subscription is currently open for `name`.
    pub fn has_open_subscription(&self, name: &str) -> bool {
        self.inner.lock().unwrap().key_callbacks.contains_key(name)
    }

    /// Number of `begin_registration` calls.
    pub fn begin_calls(&self) -> usize {
        self.inner.lock().unwrap().begin_calls
    }

    /// Whether the registration callback was attached before the first
    /// `begin_registration` call.
    pub fn watch_called_before_begin(&self) -> bool {
        self.inner
            .lock()
            .unwrap()
            .watch_before_begin
            .unwrap_or(false)
    }

    /// Address passed to `enable_bridge_mode`, if it was called.
    pub fn bridge_address(&self) -> Option<String> {
        self.inner.lock().unwrap().bridge_address.clone()
    }

    /// Number of `connect_to_product` calls.
    pub fn direct_connections(&self) -> usize {
        self.inner.lock().unwrap().direct_connections
    }
}

#[async_trait]
impl HardwareService for MockHardware {
    async fn start_key_updates(
        &self,
        descriptor: KeyDescriptor,
        on_update: KeyUpdateCallback,
    ) -> std::result::Result<(), HardwareError> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(error) = inner.fail_next_start.take() {
            return Err(error);
        }
        inner.start_calls.push(descriptor.name);
        inner.key_callbacks.insert(descriptor.name, on_update);
        Ok(())
    }

    async fn stop_key_updates(
        &self,
        descriptor: KeyDescriptor,
    ) -> std::result::Result<(), HardwareError> {
        let mut inner = self.inner.lock().unwrap();
        inner.stop_calls.push(descriptor.name);
        inner.key_callbacks.remove(descriptor.name);
        Ok(())
    }

    fn watch_registration(&self, on_update: RegistrationCallback) {
        let mut inner = self.inner.lock().unwrap();
        inner.watch_calls += 1;
        inner.registration_callback = Some(on_update);
    }

    async fn begin_registration(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.begin_calls += 1;
        if inner.watch_before_begin.is_none() {
            inner.watch_before_begin = Some(inner.watch_calls > 0);
        }
    }

    async fn enable_bridge_mode(&self, address: &str) {
        self.inner.lock().unwrap().bridge_address = Some(address.to_string());
    }

    async fn connect_to_product(&self) {
        self.inner.lock().unwrap().direct_connections += 1;
    }
}
