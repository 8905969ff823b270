//! Collaborator traits
//!
//! These traits define the seams between the log, the EEPROM transport,
//! and the status indicator.

pub mod eeprom;
pub mod status;

pub use eeprom::Eeprom;
pub use status::{StatusSignal, StorageSignal};
