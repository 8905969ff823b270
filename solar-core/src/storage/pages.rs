//! New-page counter
//!
//! Counts pages started since the last explicit reset. It is a usage
//! gauge for the current fill cycle, not the device occupancy: wraparound
//! of the write cursor leaves it untouched.

/// Operation on the new-page counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NewPagesMode {
    /// Read the count
    Get,
    /// Add one page (saturates at the device page count)
    Increase,
    /// Start a new fill cycle
    Reset,
}

/// Saturating page counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PageCounter {
    count: u16,
    limit: u16,
}

impl PageCounter {
    /// Counter capped at `limit` pages
    pub const fn new(limit: u16) -> Self {
        Self { count: 0, limit }
    }

    /// Pages counted so far
    pub const fn get(&self) -> u16 {
        self.count
    }

    /// Count one more page, returning the new value
    pub fn increase(&mut self) -> u16 {
        if self.count < self.limit {
            self.count += 1;
        }
        self.count
    }

    /// Clear the count
    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Apply `mode` and return the resulting count
    pub fn apply(&mut self, mode: NewPagesMode) -> u16 {
        match mode {
            NewPagesMode::Get => self.get(),
            NewPagesMode::Increase => self.increase(),
            NewPagesMode::Reset => {
                self.reset();
                self.count
            }
        }
    }
}
