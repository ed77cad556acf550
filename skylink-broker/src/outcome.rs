//! One-shot outcome cell.
//!
//! A result cell that accepts exactly one write; every later write is a
//! rejected no-op. This is the primitive that turns the hardware service's
//! multi-fire registration callback into a single delivered outcome.

use std::sync::{mpsc, Mutex};
use std::time::Duration;

/// Write side of a one-shot outcome channel.
///
/// The sender is consumed by the first successful [`complete`](Self::complete);
/// the cell can be shared across threads and checked for completion.
#[derive(Debug)]
pub struct OutcomeCell<T> {
    slot: Mutex<Option<mpsc::Sender<T>>>,
}

/// Read side of a one-shot outcome channel.
#[derive(Debug)]
pub struct OutcomeReceiver<T> {
    rx: mpsc::Receiver<T>,
}

/// Create a linked cell/receiver pair.
pub fn channel<T>() -> (OutcomeCell<T>, OutcomeReceiver<T>) {
    let (tx, rx) = mpsc::channel();
    (
        OutcomeCell {
            slot: Mutex::new(Some(tx)),
        },
        OutcomeReceiver { rx },
    )
}

impl<T> OutcomeCell<T> {
    /// Deliver the outcome if none has been delivered yet.
    ///
    /// Returns `true` for the first caller; `false` means the outcome was
    /// already delivered and `value` is discarded. Check-and-deliver is
    /// atomic with respect to concurrent callers.
    pub fn complete(&self, value: T) -> bool {
        let sender = match self.slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        };
        match sender {
            Some(tx) => {
                // A dropped receiver still counts as delivered
                let _ = tx.send(value);
                true
            }
            None => false,
        }
    }

    /// Whether an outcome has already been delivered.
    pub fn is_completed(&self) -> bool {
        self.slot.lock().map(|slot| slot.is_none()).unwrap_or(true)
    }
}

impl<T> OutcomeReceiver<T> {
    /// Block until the outcome arrives.
    ///
    /// Returns `None` if the cell was dropped without completing.
    pub fn recv(self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// Block until the outcome arrives or `timeout` expires.
    ///
    /// The receiver is returned on timeout so the caller can keep waiting.
    pub fn recv_timeout(self, timeout: Duration) -> std::result::Result<Option<T>, Self> {
        match self.rx.recv_timeout(timeout) {
            Ok(value) => Ok(Some(value)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Ok(None),
            Err(mpsc::RecvTimeoutError::Timeout) => Err(self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn first_write_wins() {
        let (cell, rx) = channel();
        assert!(!cell.is_completed());
        assert!(cell.complete(1));
        assert!(!cell.complete(2));
        assert!(!cell.complete(3));
        assert!(cell.is_completed());
        assert_eq!(rx.recv(), Some(1));
    }

    #[test]
    fn dropped_cell_yields_no_outcome() {
        let (cell, rx) = channel::<u32>();
        drop(cell);
        assert_eq!(rx.recv(), None);
    }

    #[test]
    fn concurrent_completers_deliver_exactly_once() {
        let (cell, rx) = channel();
        let cell = Arc::new(cell);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cell = Arc::clone(&cell);
                std::thread::spawn(move || cell.complete(i))
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);

        // Exactly one value came through
        assert!(rx.recv().is_some());
    }

    #[test]
    fn timeout_returns_receiver_for_retry() {
        let (cell, rx) = channel();
        let rx = rx
            .recv_timeout(Duration::from_millis(10))
            .expect_err("should time out");
        assert!(cell.complete(7));
        assert_eq!(rx.recv(), Some(7));
    }
}
