//! I2C bus abstractions
//!
//! Provides the I2C master operations the EEPROM transport is built on.

/// I2C bus master
///
/// Every call is one complete transaction (START ... STOP). A device that
/// does not acknowledge its address reports an error.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write data to a device at the given address
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `data` - Bytes to write (may be empty)
    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error>;

    /// Read exactly `buf.len()` bytes from a device
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `buf` - Buffer to read into
    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error>;

    /// Write then read in a single transaction (repeated start)
    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Address-only transaction
    ///
    /// Succeeds when the device acknowledges its address. EEPROMs do not
    /// acknowledge while an internal write cycle is running, so this is
    /// also the write-completion poll.
    fn probe(&mut self, address: u8) -> Result<(), Self::Error> {
        self.write(address, &[])
    }

    /// Read up to `buf.len()` bytes, returning how many arrived
    ///
    /// Buses that can end a read early (slave stops clocking out data,
    /// receive FIFO drained) override this. The default performs a full
    /// [`read`](I2cBus::read).
    fn read_available(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.read(address, buf)?;
        Ok(buf.len())
    }
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, address, data)
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), Self::Error> {
        T::read(self, address, buf)
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), Self::Error> {
        T::write_read(self, address, write_data, read_buf)
    }

    fn probe(&mut self, address: u8) -> Result<(), Self::Error> {
        T::probe(self, address)
    }

    fn read_available(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read_available(self, address, buf)
    }
}
