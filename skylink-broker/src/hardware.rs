//! Trait boundary to the hardware telemetry SDK.
//!
//! The concrete SDK is an external singleton owned by the process for its
//! entire lifetime. Everything the broker needs from it is expressed here:
//! per-key push subscriptions and the registration handshake. Callbacks are
//! invoked on whatever thread the SDK delivers from and must be treated as
//! concurrent with consumer calls.

use async_trait::async_trait;
use thiserror::Error;

use skylink_keys::{KeyDescriptor, KeyValue};

/// Error reported by the hardware service, carrying the SDK's native code
/// and human-readable message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (code {code})")]
pub struct HardwareError {
    /// SDK-native error code
    pub code: i32,
    /// Human-readable description
    pub message: String,
}

impl HardwareError {
    /// Create a hardware error from a code and message.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// One registration progress report from the hardware service.
///
/// The service may deliver any number of these for a single attempt,
/// including repeats after a terminal state was already reported.
#[derive(Debug, Clone)]
pub struct RegistrationUpdate {
    /// Whether the service considers the app registered overall
    pub registered: bool,
    /// Error accompanying this report, if any
    pub error: Option<HardwareError>,
}

impl RegistrationUpdate {
    /// A success report.
    pub fn success() -> Self {
        Self {
            registered: true,
            error: None,
        }
    }

    /// A failure report.
    pub fn failure(error: HardwareError) -> Self {
        Self {
            registered: false,
            error: Some(error),
        }
    }

    /// A non-terminal progress report (not registered, no error yet).
    pub fn pending() -> Self {
        Self {
            registered: false,
            error: None,
        }
    }
}

/// Callback receiving `(old, new)` value pairs for a subscribed key.
pub type KeyUpdateCallback = Box<dyn FnMut(Option<KeyValue>, Option<KeyValue>) + Send>;

/// Callback receiving registration progress reports.
pub type RegistrationCallback = Box<dyn FnMut(RegistrationUpdate) + Send>;

/// Capability-typed key/value push service exposed by the hardware SDK.
///
/// Implementations deliver callbacks from their own threads; callers must
/// not assume any ordering between callback delivery and method returns
/// except where documented.
#[async_trait]
pub trait HardwareService: Send + Sync {
    /// Open a push subscription for `descriptor`.
    ///
    /// `on_update` is invoked for every value change until
    /// [`stop_key_updates`](Self::stop_key_updates) is called for the same
    /// descriptor. Updates for a single key are delivered in emission order.
    async fn start_key_updates(
        &self,
        descriptor: KeyDescriptor,
        on_update: KeyUpdateCallback,
    ) -> std::result::Result<(), HardwareError>;

    /// Close the push subscription for `descriptor`.
    ///
    /// Closing a subscription that does not exist is a no-op.
    async fn stop_key_updates(
        &self,
        descriptor: KeyDescriptor,
    ) -> std::result::Result<(), HardwareError>;

    /// Attach the registration progress callback.
    ///
    /// Must be called before [`begin_registration`](Self::begin_registration)
    /// or the first report can be missed.
    fn watch_registration(&self, on_update: RegistrationCallback);

    /// Trigger the registration handshake. Progress arrives through the
    /// callback attached with [`watch_registration`](Self::watch_registration).
    async fn begin_registration(&self);

    /// Route all further communication through a network relay at `address`
    /// instead of opening a direct connection.
    async fn enable_bridge_mode(&self, address: &str);

    /// Open a direct connection to the product.
    async fn connect_to_product(&self);
}
