//! Blocking iterator for consuming telemetry events.
//!
//! The consumer side of the event channel: a cloneable handle that blocks
//! on `next()` until an event arrives, with non-blocking and timed variants.

use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use crate::event::TelemetryEvent;

/// Blocking iterator over formatted telemetry events.
///
/// Clones share the same underlying channel, so events are distributed
/// among consumers rather than duplicated.
pub struct EventIterator {
    rx: Arc<Mutex<mpsc::Receiver<TelemetryEvent>>>,
}

impl EventIterator {
    pub(crate) fn new(rx: Arc<Mutex<mpsc::Receiver<TelemetryEvent>>>) -> Self {
        Self { rx }
    }

    /// Block until an event is available.
    ///
    /// Returns `None` once the broker is gone and the channel drained.
    pub fn recv(&self) -> Option<TelemetryEvent> {
        self.rx.lock().ok()?.recv().ok()
    }

    /// Receive an event without blocking.
    pub fn try_recv(&self) -> Option<TelemetryEvent> {
        self.rx.lock().ok()?.try_recv().ok()
    }

    /// Block until an event is available or `timeout` expires.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<TelemetryEvent> {
        self.rx.lock().ok()?.recv_timeout(timeout).ok()
    }

    /// Non-blocking iterator over currently queued events.
    pub fn try_iter(&self) -> TryIterator<'_> {
        TryIterator { inner: self }
    }

    /// Iterator that blocks for up to `timeout` on each `next()`.
    pub fn timeout_iter(&self, timeout: Duration) -> TimeoutIterator<'_> {
        TimeoutIterator {
            inner: self,
            timeout,
        }
    }
}

impl Iterator for EventIterator {
    type Item = TelemetryEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl Clone for EventIterator {
    fn clone(&self) -> Self {
        Self {
            rx: Arc::clone(&self.rx),
        }
    }
}

/// Non-blocking iterator over currently queued events.
pub struct TryIterator<'a> {
    inner: &'a EventIterator,
}

impl Iterator for TryIterator<'_> {
    type Item = TelemetryEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.try_recv()
    }
}

/// Blocking iterator with a per-item timeout.
pub struct TimeoutIterator<'a> {
    inner: &'a EventIterator,
    timeout: Duration,
}

impl Iterator for TimeoutIterator<'_> {
    type Item = TelemetryEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.recv_timeout(self.timeout)
    }
}
