//! Board-agnostic storage core for the solar logger firmware
//!
//! This crate contains the logic that turns sensor samples into durable
//! EEPROM bytes without depending on a specific board:
//!
//! - Device geometry and timing configuration
//! - Transport and status-signal traits
//! - Bit-packed circular log with page accounting
//! - Sample record schema (field order and bit widths)

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod record;
pub mod storage;
pub mod traits;
