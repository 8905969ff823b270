//! Adapters from `embedded-hal` 1.0 traits to solar-hal traits

pub mod clock;
pub mod i2c;

pub use clock::DelayClock;
pub use i2c::HalI2c;
