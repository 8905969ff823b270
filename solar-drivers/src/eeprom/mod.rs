//! External EEPROM transport

pub mod i2c;

pub use i2c::{EepromError, I2cEeprom, MAX_BLOCK_SIZE, MAX_TRANSFER_LEN};
