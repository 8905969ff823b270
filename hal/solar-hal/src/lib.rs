//! Solar logger Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the logger needs.
//! Board support code implements them; the storage core and drivers only
//! ever see the traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  solar-core (bit-packed EEPROM log)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  solar-drivers (EEPROM, LED, adapters)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  solar-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - I2C master transactions
//! - [`gpio::OutputPin`] - Status LED output
//! - [`time::Clock`] - Millisecond time base for bounded polling

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;
pub mod time;

pub use gpio::OutputPin;
pub use i2c::I2cBus;
pub use time::{Clock, Deadline};
