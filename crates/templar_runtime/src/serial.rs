//! Process-unique entity serials.

use std::sync::atomic::{AtomicU64, Ordering};

use templar_foundation::{Error, ErrorKind, Result};

/// A monotonically increasing serial source.
///
/// Serial `0` is never issued; a fresh counter hands out `1` first. After
/// loading a save, call [`observe`](Self::observe) with every restored
/// serial (or build the counter with [`starting_at`](Self::starting_at)) so
/// new entities never collide with loaded ones.
#[derive(Debug, Default)]
pub struct SerialCounter {
    last: AtomicU64,
}

impl SerialCounter {
    /// Creates a counter that has issued nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Creates a counter whose next serial is `last + 1`.
    #[must_use]
    pub const fn starting_at(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    /// Issues the next serial.
    ///
    /// Fails with [`ErrorKind::SerialsExhausted`] once `u64::MAX` has been
    /// issued or observed; the counter never wraps back to reuse a serial.
    pub fn next(&self) -> Result<u64> {
        self.last
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
                last.checked_add(1)
            })
            .map(|last| last + 1)
            .map_err(|last| Error::new(ErrorKind::SerialsExhausted(last)))
    }

    /// Raises the floor so that `serial` is never issued again.
    pub fn observe(&self, serial: u64) {
        self.last.fetch_max(serial, Ordering::Relaxed);
    }

    /// Returns the most recently issued (or observed) serial.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}
