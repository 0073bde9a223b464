//! Cancellation sources for long-running encodes

use packmat_core::InterruptCheck;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag another thread can raise to stop a write
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create an unraised token
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every holder of this token to stop
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether `cancel` has been called
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

impl InterruptCheck for CancellationToken {
    fn should_stop(&self) -> bool {
        self.is_cancelled()
    }
}

/// Stops a write once a wall-clock instant has passed
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    /// Deadline at a fixed instant
    pub fn at(at: Instant) -> Self {
        Self { at }
    }

    /// Deadline `timeout` from now
    pub fn after(timeout: Duration) -> Self {
        Self::at(Instant::now() + timeout)
    }

    /// Whether the deadline has passed
    pub fn expired(&self) -> bool {
        Instant::now() >= self.at
    }
}

impl InterruptCheck for Deadline {
    fn should_stop(&self) -> bool {
        self.expired()
    }
}
