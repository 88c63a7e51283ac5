//! Per-connection lifecycle tracking.
//!
//! # Responsibilities
//! - Signal handlers when the client connection has gone away
//! - Bound in-flight requests per connector (backpressure)
//!
//! # Design Decisions
//! - Closing is one-way; a closed signal never reopens
//! - The close guard lives in the request future, so a dropped future
//!   (client disconnect) closes the signal without extra plumbing

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Shared flag telling handlers whether the client is still connected.
#[derive(Debug, Clone, Default)]
pub struct ConnectionSignal {
    closed: Arc<AtomicBool>,
}

impl ConnectionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Returns a guard that closes the signal when dropped unless disarmed.
    pub fn close_on_drop(&self) -> CloseOnDrop {
        CloseOnDrop {
            signal: self.clone(),
            armed: true,
        }
    }
}

/// Closes its [`ConnectionSignal`] when dropped while still armed.
#[derive(Debug)]
pub struct CloseOnDrop {
    signal: ConnectionSignal,
    armed: bool,
}

impl CloseOnDrop {
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        if self.armed {
            self.signal.close();
            tracing::debug!("Client went away before the response was produced");
        }
    }
}

/// Limits concurrently executing requests on one connector.
///
/// When the limit is reached, new requests wait until a slot frees up.
#[derive(Debug, Clone)]
pub struct InFlightLimit {
    permits: Arc<Semaphore>,
    max: usize,
}

impl InFlightLimit {
    pub fn new(max: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max)),
            max,
        }
    }

    /// Wait for a free slot. The slot is released when the permit drops.
    ///
    /// Returns `None` only if the limiter was closed.
    pub async fn acquire(&self) -> Option<InFlightPermit> {
        let permit = Arc::clone(&self.permits).acquire_owned().await.ok()?;
        Some(InFlightPermit { _permit: permit })
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

/// A held in-flight slot.
#[derive(Debug)]
pub struct InFlightPermit {
    _permit: OwnedSemaphorePermit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_on_drop_guard() {
        let signal = ConnectionSignal::new();
        signal.close_on_drop().disarm();
        assert!(!signal.is_closed());

        drop(signal.close_on_drop());
        assert!(signal.is_closed());
    }

    #[tokio::test]
    async fn in_flight_limit_counts() {
        let limit = InFlightLimit::new(2);
        assert_eq!(limit.available(), 2);

        let first = limit.acquire().await.unwrap();
        let second = limit.acquire().await.unwrap();
        assert_eq!(limit.available(), 0);

        drop(first);
        assert_eq!(limit.available(), 1);
        drop(second);
        assert_eq!(limit.available(), limit.max());
    }
}
