//! Status LED signaller
//!
//! Reports conditions by blinking a single LED. Each signal is a fixed
//! sequence of on/off steps; the LED is always left off afterwards.
//! Playing a pattern blocks for its full duration.

use solar_core::traits::{StatusSignal, StorageSignal};
use solar_hal::{Clock, OutputPin};

/// One LED state held for a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkStep {
    /// LED lit
    pub on: bool,
    /// Time to hold the state (ms)
    pub duration_ms: u32,
}

impl BlinkStep {
    const fn on(duration_ms: u32) -> Self {
        Self {
            on: true,
            duration_ms,
        }
    }

    const fn off(duration_ms: u32) -> Self {
        Self {
            on: false,
            duration_ms,
        }
    }
}

const INIT: &[BlinkStep] = &[BlinkStep::on(1000)];

const EEPROM: &[BlinkStep] = &[BlinkStep::on(500), BlinkStep::off(120), BlinkStep::on(120)];

const ERROR: &[BlinkStep] = &[
    BlinkStep::on(1000),
    BlinkStep::off(500),
    BlinkStep::on(250),
    BlinkStep::off(120),
    BlinkStep::off(60),
    BlinkStep::off(30),
];

const BLINK: &[BlinkStep] = &[BlinkStep::on(30)];

const CHARGE_BLINK: &[BlinkStep] = &[
    BlinkStep::on(30),
    BlinkStep::off(60),
    BlinkStep::on(30),
    BlinkStep::off(60),
    BlinkStep::on(30),
];

/// LED patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedSignal {
    /// Power-up: one long flash
    Init,
    /// Storage nearly full: long flash, short flash
    Eeprom,
    /// Measurement heartbeat: one short flash
    Blink,
    /// Solar charging: three short flashes
    ChargeBlink,
    /// Write failure: long flash, medium flash, long dark tail
    Error,
}

impl LedSignal {
    /// Steps of the pattern
    pub const fn steps(self) -> &'static [BlinkStep] {
        match self {
            LedSignal::Init => INIT,
            LedSignal::Eeprom => EEPROM,
            LedSignal::Blink => BLINK,
            LedSignal::ChargeBlink => CHARGE_BLINK,
            LedSignal::Error => ERROR,
        }
    }

    /// Total time the pattern blocks for (ms)
    pub fn duration_ms(self) -> u32 {
        self.steps().iter().map(|s| s.duration_ms).sum()
    }
}

impl From<StorageSignal> for LedSignal {
    fn from(signal: StorageSignal) -> Self {
        match signal {
            StorageSignal::NearlyFull => LedSignal::Eeprom,
            StorageSignal::WriteFailure => LedSignal::Error,
        }
    }
}

/// Drives the status LED
pub struct LedSignaller<P, C> {
    pin: P,
    clock: C,
    /// If true, LED on = pin LOW
    inverted: bool,
    enabled: bool,
}

impl<P: OutputPin, C: Clock> LedSignaller<P, C> {
    /// Create a signaller; the LED starts off
    ///
    /// # Arguments
    /// - `pin`: LED output
    /// - `clock`: time base for the pattern steps
    /// - `inverted`: LED is lit when the pin is LOW
    pub fn new(pin: P, clock: C, inverted: bool) -> Self {
        let mut led = Self {
            pin,
            clock,
            inverted,
            enabled: true,
        };
        led.set_lit(false);
        led
    }

    /// Create a signaller for an LED wired to light on HIGH
    pub fn new_active_high(pin: P, clock: C) -> Self {
        Self::new(pin, clock, false)
    }

    /// Enable or disable signalling (disabled = LED stays dark)
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.set_lit(false);
        }
    }

    /// Check if signalling is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Play a pattern to completion
    pub fn play(&mut self, signal: LedSignal) {
        if !self.enabled {
            return;
        }

        for step in signal.steps() {
            self.set_lit(step.on);
            self.clock.delay_ms(step.duration_ms);
        }
        self.set_lit(false);
    }

    fn set_lit(&mut self, lit: bool) {
        self.pin.set_state(lit != self.inverted);
    }

    /// The LED pin
    pub fn pin(&self) -> &P {
        &self.pin
    }

    /// The time base
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

impl<P: OutputPin, C: Clock> StatusSignal for LedSignaller<P, C> {
    fn signal(&mut self, signal: StorageSignal) {
        self.play(signal.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ManualClock;
    use heapless::Vec;

    /// Mock GPIO pin recording every level change
    struct MockPin {
        high: bool,
        levels: Vec<bool, 32>,
    }

    impl MockPin {
        fn new() -> Self {
            Self {
                high: false,
                levels: Vec::new(),
            }
        }
    }

    impl OutputPin for MockPin {
        fn set_state(&mut self, high: bool) {
            self.high = high;
            let _ = self.levels.push(high);
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_nearly_full_pattern() {
        let mut led = LedSignaller::new_active_high(MockPin::new(), ManualClock::default());
        led.signal(StorageSignal::NearlyFull);

        // initial off, on 500, off 120, on 120, final off
        assert_eq!(led.pin().levels.as_slice(), &[false, true, false, true, false]);
        assert_eq!(led.clock().now_ms(), 740);
        assert!(!led.pin().is_set_high());
    }

    #[test]
    fn test_write_failure_pattern_duration() {
        let mut led = LedSignaller::new_active_high(MockPin::new(), ManualClock::default());
        led.signal(StorageSignal::WriteFailure);

        assert_eq!(led.clock().now_ms(), LedSignal::Error.duration_ms());
        assert_eq!(LedSignal::Error.duration_ms(), 1960);
        assert!(!led.pin().is_set_high());
    }

    #[test]
    fn test_active_low_led() {
        let mut led = LedSignaller::new(MockPin::new(), ManualClock::default(), true);
        // Off means pin high
        assert!(led.pin().is_set_high());

        led.play(LedSignal::Blink);
        assert_eq!(led.pin().levels.as_slice(), &[true, false, true]);
        assert_eq!(led.clock().now_ms(), 30);
    }

    #[test]
    fn test_disabled_led_stays_dark() {
        let mut led = LedSignaller::new_active_high(MockPin::new(), ManualClock::default());
        led.set_enabled(false);
        led.play(LedSignal::ChargeBlink);

        assert!(!led.is_enabled());
        assert_eq!(led.clock().now_ms(), 0);
        assert!(led.pin().levels.iter().all(|&high| !high));
    }
}
