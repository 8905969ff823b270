//! `embedded-hal` I2C adapter

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};
use solar_hal::I2cBus;

/// Wraps any `embedded_hal::i2c::I2c` bus (7-bit addressing)
///
/// Errors are reduced to their [`ErrorKind`], so the EEPROM driver's
/// error type does not depend on the board HAL.
pub struct HalI2c<I> {
    inner: I,
}

impl<I: I2c> HalI2c<I> {
    /// Wrap a bus
    pub fn new(inner: I) -> Self {
        Self { inner }
    }

    /// Unwrap the bus
    pub fn into_inner(self) -> I {
        self.inner
    }
}

impl<I: I2c> I2cBus for HalI2c<I> {
    type Error = ErrorKind;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), ErrorKind> {
        self.inner.write(address, data).map_err(|e| e.kind())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), ErrorKind> {
        self.inner.read(address, buf).map_err(|e| e.kind())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), ErrorKind> {
        self.inner
            .write_read(address, write_data, read_buf)
            .map_err(|e| e.kind())
    }
}
