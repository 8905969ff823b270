//! Host-side simulation of the storage hardware
//!
//! Used by the unit and integration tests; also handy for running the
//! log on a desktop.

pub mod clock;
pub mod eeprom;

pub use clock::ManualClock;
pub use eeprom::{SimEeprom, SimError, SimStats};
