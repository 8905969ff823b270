//! `embedded-hal` delay adapter

use embedded_hal::delay::DelayNs;
use solar_hal::Clock;

/// Clock built from a blocking delay
///
/// Time only advances by the delays performed through it, which is what
/// the bounded polling loops need: a timeout of `T` ms allows at most `T`
/// one-millisecond polls. Bus transaction time is not counted.
pub struct DelayClock<D> {
    delay: D,
    elapsed_ms: u32,
}

impl<D: DelayNs> DelayClock<D> {
    /// Wrap a delay provider
    pub fn new(delay: D) -> Self {
        Self {
            delay,
            elapsed_ms: 0,
        }
    }

    /// Unwrap the delay provider
    pub fn into_inner(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> Clock for DelayClock<D> {
    fn now_ms(&self) -> u32 {
        self.elapsed_ms
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
        self.elapsed_ms = self.elapsed_ms.wrapping_add(ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_hal::Deadline;

    #[derive(Default)]
    struct CountingDelay {
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    #[test]
    fn test_time_follows_delays() {
        let mut clock = DelayClock::new(CountingDelay::default());
        let deadline = Deadline::after(&clock, 3);

        clock.delay_ms(1);
        clock.delay_ms(1);
        assert!(!deadline.expired(&clock));

        clock.delay_ms(1);
        assert!(deadline.expired(&clock));
        assert_eq!(clock.now_ms(), 3);
        assert_eq!(clock.into_inner().total_ns, 3_000_000);
    }
}
