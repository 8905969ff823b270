//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in solar-core on top of the solar-hal abstractions:
//!
//! - I2C EEPROM transport (24-series page-write parts)
//! - Status LED signaller
//! - Adapters from `embedded-hal` 1.0 buses and delays
//! - Simulated EEPROM and clock for host testing

#![no_std]
#![deny(unsafe_code)]

pub mod adapter;
pub mod eeprom;
pub mod sim;
pub mod status;
