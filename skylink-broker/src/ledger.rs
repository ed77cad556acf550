//! Active-subscription ledger with duplicate protection.

use dashmap::DashSet;

/// Set of telemetry keys with a currently-open hardware subscription.
///
/// The ledger is the dedup gate that makes "start listener" idempotent:
/// [`try_acquire`](Self::try_acquire) is an atomic check-and-set, so two
/// concurrent starts for the same key can never both open a hardware
/// subscription. Absence of a name means no subscription exists for it.
#[derive(Debug, Default)]
pub struct SubscriptionLedger {
    active: DashSet<&'static str>,
}

impl SubscriptionLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as active iff it was not already active.
    ///
    /// Returns `true` when the caller won the slot and owns the hardware
    /// subscription that should now be opened; `false` when a subscription
    /// already exists.
    pub fn try_acquire(&self, name: &'static str) -> bool {
        let acquired = self.active.insert(name);
        tracing::debug!(key = name, acquired, "subscription ledger acquire");
        acquired
    }

    /// Remove `name` from the ledger, returning whether it was present.
    ///
    /// Releasing an absent name is a no-op, not an error.
    pub fn release(&self, name: &str) -> bool {
        let released = self.active.remove(name).is_some();
        tracing::debug!(key = name, released, "subscription ledger release");
        released
    }

    /// Whether `name` currently has an active subscription.
    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    /// Snapshot of all active names.
    pub fn active(&self) -> Vec<&'static str> {
        self.active.iter().map(|entry| *entry).collect()
    }

    /// Number of active subscriptions.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no subscriptions are active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
