//! GPIO output abstraction
//!
//! The logger drives a single status LED; nothing reads pins back.

/// Digital output pin
pub trait OutputPin {
    /// Drive the pin to a logic level (`true` = high)
    fn set_state(&mut self, high: bool);

    /// Check if the pin is currently driven high
    fn is_set_high(&self) -> bool;

    /// Set the pin high (logic 1)
    fn set_high(&mut self) {
        self.set_state(true);
    }

    /// Set the pin low (logic 0)
    fn set_low(&mut self) {
        self.set_state(false);
    }

    /// Toggle the pin state
    fn toggle(&mut self) {
        let high = self.is_set_high();
        self.set_state(!high);
    }
}
