//! 24-series I2C EEPROM driver
//!
//! Every transaction starts with the two-byte big-endian memory address.
//! After a write the part runs an internal write cycle (up to ~5 ms) during
//! which it does not acknowledge its address; the driver polls with
//! address-only transactions until it answers or the timeout elapses.
//!
//! Block transfers are split into `block_size` chunks (the part's page-write
//! buffer); whatever is left over goes byte by byte.

use heapless::Vec;
use solar_core::config::{ConfigError, EepromConfig};
use solar_core::traits::Eeprom;
use solar_hal::{Clock, Deadline, I2cBus};

/// Largest block transaction the driver can assemble
pub const MAX_BLOCK_SIZE: usize = 64;

/// Longest buffer accepted by one block call
pub const MAX_TRANSFER_LEN: usize = u8::MAX as usize;

/// Errors from EEPROM operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EepromError<E> {
    /// Bus transaction failed (device did not acknowledge)
    Bus(E),
    /// Write cycle not confirmed within the timeout
    Timeout,
    /// Fewer bytes arrived than requested
    ShortRead {
        /// Bytes requested
        expected: usize,
        /// Bytes stored in the caller's buffer
        received: usize,
    },
    /// Transfer runs past the end of the device
    AddressOutOfRange,
    /// Buffer longer than [`MAX_TRANSFER_LEN`]
    InvalidLength,
    /// Block write stopped after `written` bytes were confirmed
    ShortWrite {
        /// Bytes on the device before the failure
        written: usize,
        /// Failure that stopped the transfer
        cause: WriteFault<E>,
    },
}

/// Failure of a single write transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriteFault<E> {
    /// Device did not acknowledge the write
    Bus(E),
    /// Write cycle not confirmed within the timeout
    Timeout,
}

/// I2C EEPROM transport
///
/// Blocking: a call returns once the device confirmed the transfer or the
/// configured timeout expired.
pub struct I2cEeprom<B, C> {
    bus: B,
    clock: C,
    config: EepromConfig,
}

impl<B: I2cBus, C: Clock> I2cEeprom<B, C> {
    /// Create a driver for the device described by `config`
    pub fn new(bus: B, clock: C, config: EepromConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        if usize::from(config.block_size) > MAX_BLOCK_SIZE {
            return Err(ConfigError::InvalidBlockSize);
        }

        Ok(Self { bus, clock, config })
    }

    /// Check that the device acknowledges its address
    pub fn begin(&mut self) -> bool {
        let present = self.bus.probe(self.config.device_address).is_ok();

        #[cfg(feature = "defmt")]
        {
            if present {
                defmt::info!("EEPROM found at {=u8:#x}", self.config.device_address);
            } else {
                defmt::warn!("No EEPROM at {=u8:#x}", self.config.device_address);
            }
        }

        present
    }

    /// Write one byte and wait for the write cycle to finish
    pub fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), EepromError<B::Error>> {
        self.check_range(addr, 1)?;

        let [hi, lo] = addr.to_be_bytes();
        self.bus
            .write(self.config.device_address, &[hi, lo, value])
            .map_err(EepromError::Bus)?;

        self.wait_write_cycle()
    }

    /// Read one byte
    pub fn read_byte(&mut self, addr: u16) -> Result<u8, EepromError<B::Error>> {
        self.check_range(addr, 1)?;

        let mut byte = [0u8; 1];
        self.bus
            .write(self.config.device_address, &addr.to_be_bytes())
            .map_err(EepromError::Bus)?;
        let received = self
            .bus
            .read_available(self.config.device_address, &mut byte)
            .map_err(EepromError::Bus)?;

        if received != 1 {
            return Err(EepromError::ShortRead {
                expected: 1,
                received: 0,
            });
        }
        Ok(byte[0])
    }

    /// Write `data` starting at `addr`
    ///
    /// Full blocks go out as single page writes; a block that would cross a
    /// device page is written byte by byte instead, since the part would
    /// otherwise wrap it to the start of the page. Stops at the first
    /// failure. Returns the number of bytes written.
    ///
    /// A failure after some bytes were confirmed is reported as
    /// [`EepromError::ShortWrite`] carrying that count.
    pub fn write_block(&mut self, addr: u16, data: &[u8]) -> Result<usize, EepromError<B::Error>> {
        self.check_transfer(addr, data.len())?;

        let block = usize::from(self.config.block_size);
        let mut written = 0usize;

        let mut chunks = data.chunks_exact(block);
        for chunk in &mut chunks {
            let at = Self::offset(addr, written);
            if self.crosses_page(at, chunk.len()) {
                for &byte in chunk {
                    self.write_byte(Self::offset(addr, written), byte)
                        .map_err(|e| Self::short_write(written, e))?;
                    written += 1;
                }
            } else {
                self.write_page(at, chunk)
                    .map_err(|e| Self::short_write(written, e))?;
                written += chunk.len();
            }
        }

        for &byte in chunks.remainder() {
            self.write_byte(Self::offset(addr, written), byte)
                .map_err(|e| Self::short_write(written, e))?;
            written += 1;
        }

        Ok(written)
    }

    /// Read into `buf` starting at `addr`
    ///
    /// Full blocks are collected within the timeout; if a block comes up
    /// short the call fails with [`EepromError::ShortRead`] and `buf` holds
    /// the bytes received so far. The remainder is read byte by byte and
    /// reports a missing byte the same way.
    pub fn read_block(&mut self, addr: u16, buf: &mut [u8]) -> Result<usize, EepromError<B::Error>> {
        self.check_transfer(addr, buf.len())?;

        let expected = buf.len();
        let block = usize::from(self.config.block_size);
        let mut read = 0usize;

        let mut chunks = buf.chunks_exact_mut(block);
        for chunk in &mut chunks {
            let received = self.read_chunk(Self::offset(addr, read), chunk)?;
            read += received;
            if received < chunk.len() {
                #[cfg(feature = "defmt")]
                defmt::warn!("EEPROM short read: {=usize}/{=usize} bytes", read, expected);
                return Err(EepromError::ShortRead {
                    expected,
                    received: read,
                });
            }
        }

        for byte in chunks.into_remainder() {
            match self.read_byte(Self::offset(addr, read)) {
                Ok(value) => *byte = value,
                Err(EepromError::ShortRead { .. }) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("EEPROM short read: {=usize}/{=usize} bytes", read, expected);
                    return Err(EepromError::ShortRead {
                        expected,
                        received: read,
                    });
                }
                Err(e) => return Err(e),
            }
            read += 1;
        }

        Ok(read)
    }

    /// One page-write transaction of at most `block_size` bytes
    fn write_page(&mut self, addr: u16, chunk: &[u8]) -> Result<(), EepromError<B::Error>> {
        let mut frame: Vec<u8, { MAX_BLOCK_SIZE + 2 }> = Vec::new();
        frame
            .extend_from_slice(&addr.to_be_bytes())
            .map_err(|_| EepromError::InvalidLength)?;
        frame
            .extend_from_slice(chunk)
            .map_err(|_| EepromError::InvalidLength)?;

        self.bus
            .write(self.config.device_address, &frame)
            .map_err(EepromError::Bus)?;

        self.wait_write_cycle()
    }

    /// Set the address pointer, then collect `chunk.len()` bytes or give up
    fn read_chunk(&mut self, addr: u16, chunk: &mut [u8]) -> Result<usize, EepromError<B::Error>> {
        let device = self.config.device_address;
        self.bus
            .write(device, &addr.to_be_bytes())
            .map_err(EepromError::Bus)?;

        let deadline = Deadline::after(&self.clock, self.config.timeout_ms);
        let mut received = 0usize;

        loop {
            let n = self
                .bus
                .read_available(device, &mut chunk[received..])
                .map_err(EepromError::Bus)?;
            received += n.min(chunk.len() - received);

            if received == chunk.len() || deadline.expired(&self.clock) {
                return Ok(received);
            }
            self.clock.delay_ms(self.config.poll_interval_ms);
        }
    }

    /// Poll the device until it acknowledges again
    fn wait_write_cycle(&mut self) -> Result<(), EepromError<B::Error>> {
        let device = self.config.device_address;
        let deadline = Deadline::after(&self.clock, self.config.timeout_ms);

        while !deadline.expired(&self.clock) {
            if self.bus.probe(device).is_ok() {
                return Ok(());
            }
            self.clock.delay_ms(self.config.poll_interval_ms);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!(
            "EEPROM write cycle not confirmed within {=u32} ms",
            self.config.timeout_ms
        );
        Err(EepromError::Timeout)
    }

    /// Attach the confirmed byte count to a failure inside a block write
    fn short_write(written: usize, error: EepromError<B::Error>) -> EepromError<B::Error> {
        if written == 0 {
            return error;
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("EEPROM block write stopped after {=usize} bytes", written);

        match error {
            EepromError::Bus(e) => EepromError::ShortWrite {
                written,
                cause: WriteFault::Bus(e),
            },
            EepromError::Timeout => EepromError::ShortWrite {
                written,
                cause: WriteFault::Timeout,
            },
            other => other,
        }
    }

    fn check_range(&self, addr: u16, len: usize) -> Result<(), EepromError<B::Error>> {
        if self.config.contains(addr, len) {
            Ok(())
        } else {
            Err(EepromError::AddressOutOfRange)
        }
    }

    fn check_transfer(&self, addr: u16, len: usize) -> Result<(), EepromError<B::Error>> {
        if len > MAX_TRANSFER_LEN {
            return Err(EepromError::InvalidLength);
        }
        self.check_range(addr, len)
    }

    fn crosses_page(&self, addr: u16, len: usize) -> bool {
        let page = usize::from(self.config.page_size);
        usize::from(addr) % page + len > page
    }

    // Callers have range-checked `base + offset` against the capacity.
    fn offset(base: u16, offset: usize) -> u16 {
        base.wrapping_add(offset as u16)
    }

    /// Device configuration
    pub fn config(&self) -> &EepromConfig {
        &self.config
    }

    /// The underlying bus
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the underlying bus
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// The time base
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Release the bus and clock
    pub fn release(self) -> (B, C) {
        (self.bus, self.clock)
    }
}

impl<B: I2cBus, C: Clock> Eeprom for I2cEeprom<B, C> {
    type Error = EepromError<B::Error>;

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Self::Error> {
        I2cEeprom::write_byte(self, addr, value)
    }

    fn read_byte(&mut self, addr: u16) -> Result<u8, Self::Error> {
        I2cEeprom::read_byte(self, addr)
    }

    fn write_block(&mut self, addr: u16, data: &[u8]) -> Result<usize, Self::Error> {
        I2cEeprom::write_block(self, addr, data)
    }

    fn read_block(&mut self, addr: u16, buf: &mut [u8]) -> Result<usize, Self::Error> {
        I2cEeprom::read_block(self, addr, buf)
    }
}
