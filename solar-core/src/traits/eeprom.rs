//! EEPROM transport trait

/// Byte-addressable persistent storage
///
/// Implemented by the I2C EEPROM driver. The log only needs
/// [`write_byte`](Eeprom::write_byte); the block operations are here so
/// the whole transport sits behind one seam.
pub trait Eeprom {
    /// Error type for transport operations
    type Error;

    /// Write one byte and wait until the device has committed it
    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Self::Error>;

    /// Read one byte
    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error>;

    /// Write `data` starting at `addr`
    ///
    /// Returns the number of bytes the device confirmed.
    fn write_block(&mut self, addr: u16, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read into `buf` starting at `addr`
    ///
    /// Returns the number of bytes received.
    fn read_block(&mut self, addr: u16, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

impl<T: Eeprom + ?Sized> Eeprom for &mut T {
    type Error = T::Error;

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Self::Error> {
        T::write_byte(self, addr, value)
    }

    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error> {
        T::read_byte(self, addr)
    }

    fn write_block(&mut self, addr: u16, data: &[u8]) -> Result<usize, Self::Error> {
        T::write_block(self, addr, data)
    }

    fn read_block(&mut self, addr: u16, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read_block(self, addr, buf)
    }
}
