//! Millisecond time base
//!
//! Bounded polling loops (EEPROM write-cycle completion, block reads) are
//! written against [`Clock`] so they can run on any board and under a
//! simulated clock in tests.

/// Monotonic millisecond clock with a blocking delay
///
/// `now_ms` is allowed to wrap; use [`Deadline`] for comparisons.
pub trait Clock {
    /// Current time in milliseconds
    fn now_ms(&self) -> u32;

    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<T: Clock + ?Sized> Clock for &mut T {
    fn now_ms(&self) -> u32 {
        T::now_ms(self)
    }

    fn delay_ms(&mut self, ms: u32) {
        T::delay_ms(self, ms)
    }
}

/// A point in time after which a bounded wait gives up
///
/// Comparisons use wrapping arithmetic, so a deadline stays correct across
/// the `u32` rollover as long as the timeout is shorter than ~24 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    at_ms: u32,
}

impl Deadline {
    /// Deadline `timeout_ms` from now
    pub fn after<C: Clock + ?Sized>(clock: &C, timeout_ms: u32) -> Self {
        Self {
            at_ms: clock.now_ms().wrapping_add(timeout_ms),
        }
    }

    /// Check if the deadline has been reached
    pub fn expired<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        Self::reached(clock.now_ms(), self.at_ms)
    }

    /// Milliseconds left, zero once expired
    pub fn remaining_ms<C: Clock + ?Sized>(&self, clock: &C) -> u32 {
        let now = clock.now_ms();
        if Self::reached(now, self.at_ms) {
            0
        } else {
            self.at_ms.wrapping_sub(now)
        }
    }

    fn reached(now: u32, at: u32) -> bool {
        // Signed view of the difference handles rollover.
        (now.wrapping_sub(at) as i32) >= 0
    }
}
