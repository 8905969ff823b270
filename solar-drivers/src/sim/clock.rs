//! Manually advanced clock

use solar_hal::Clock;

/// Clock that only moves when something delays on it
///
/// Poll loops run instantly in tests while still observing their
/// millisecond budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ManualClock {
    now_ms: u32,
    delays: u32,
}

impl ManualClock {
    /// Clock starting at `now_ms`
    pub const fn starting_at(now_ms: u32) -> Self {
        Self { now_ms, delays: 0 }
    }

    /// Move time forward without counting a delay
    pub fn advance(&mut self, ms: u32) {
        self.now_ms = self.now_ms.wrapping_add(ms);
    }

    /// Number of `delay_ms` calls so far
    pub fn delays(&self) -> u32 {
        self.delays
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now_ms
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delays += 1;
        self.advance(ms);
    }
}
