//! Configuration types
//!
//! Geometry and timing of the external EEPROM, fixed at construction.

pub mod eeprom;

pub use eeprom::*;
