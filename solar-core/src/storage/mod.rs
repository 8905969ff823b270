//! Bit-packed circular log
//!
//! Packs variable-width fields into bytes and writes them to the EEPROM
//! as a ring.

pub mod log;
pub mod pages;

pub use log::{EepromLog, LogError, MAX_FIELD_BITS};
pub use pages::{NewPagesMode, PageCounter};
