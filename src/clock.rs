//! Time source and interruptible sleep.
//!
//! Every deadline and pause the locator takes goes through a [`Clock`], so
//! tests can substitute virtual time and callers can cancel a pending retry
//! pause or settle delay from another thread.

use crate::util::Cancelled;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of the current instant plus a blocking, cancellable sleep.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Blocks for `duration` unless cancelled first.
    fn sleep(&self, duration: Duration) -> Result<(), Cancelled>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        (**self).sleep(duration)
    }
}

/// Handle that interrupts sleeps of every [`SystemClock`] built from it.
///
/// Cancellation is sticky: once cancelled, current and future sleeps return
/// [`Cancelled`] immediately. The flag is the source of truth; the channel
/// only wakes sleepers.
#[derive(Clone, Debug)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl CancelToken {
    /// Creates a token that has not been cancelled.
    pub fn new() -> Self {
        let (tx, rx) = bounded(1);
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            tx,
            rx,
        }
    }

    /// Cancels pending and future sleeps.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        // A full channel already carries the wake-up.
        let _ = self.tx.try_send(());
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn wait(&self, duration: Duration) -> Result<(), Cancelled> {
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        match self.rx.recv_timeout(duration) {
            Ok(()) => {
                // Pass the wake-up on to other sleepers.
                let _ = self.tx.try_send(());
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Err(Cancelled),
        }
        if self.is_cancelled() {
            return Err(Cancelled);
        }
        Ok(())
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock time with sleeps that a [`CancelToken`] can interrupt.
#[derive(Clone, Debug, Default)]
pub struct SystemClock {
    token: CancelToken,
}

impl SystemClock {
    /// Creates a clock with its own, never-shared cancel token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock whose sleeps are interrupted by `token`.
    pub fn with_token(token: CancelToken) -> Self {
        Self { token }
    }

    /// Returns the token controlling this clock's sleeps.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) -> Result<(), Cancelled> {
        self.token.wait(duration)
    }
}
