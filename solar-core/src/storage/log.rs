//! Bit-packed circular EEPROM log
//!
//! Fields of any width up to 16 bits are shifted MSB-first into an 8-bit
//! accumulator. Every completed byte is written at the write cursor, which
//! then advances by one and wraps to 0 at the end of the device, silently
//! overwriting the oldest data.
//!
//! ```text
//!  append_bits(0b1011, 4)        append_bits(0b0110, 4)
//!  ┌─┬─┬─┬─┬─┬─┬─┬─┐             ┌─┬─┬─┬─┬─┬─┬─┬─┐
//!  │1│0│1│1│ │ │ │ │ bit_idx=4   │1│0│1│1│0│1│1│0│ -> write 0xB6 @ cursor
//!  └─┴─┴─┴─┴─┴─┴─┴─┘             └─┴─┴─┴─┴─┴─┴─┴─┘    cursor += 1
//! ```
//!
//! Write failures are reported but never stall the log: the cursor moves on
//! and the byte is lost. There is no header in the stream and no state is
//! recovered from the device at startup.

use crate::config::{ConfigError, EepromConfig};
use crate::traits::{Eeprom, StatusSignal, StorageSignal};

use super::pages::{NewPagesMode, PageCounter};

/// Widest field accepted by [`EepromLog::append_bits`]
pub const MAX_FIELD_BITS: u8 = 16;

/// Errors reported by the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogError<E> {
    /// The transport failed to commit a byte; the cursor advanced anyway
    Write {
        /// Address the byte was meant for
        addr: u16,
        /// Transport error
        error: E,
    },
    /// Field width above [`MAX_FIELD_BITS`]; nothing was appended
    InvalidWidth(u8),
}

/// Single-writer bit-packed log over an EEPROM transport
///
/// Owns the write cursor, the bit accumulator, and the new-page counter.
/// Constructed once at startup and handed to the sensor code by `&mut`.
pub struct EepromLog<E, S> {
    eeprom: E,
    signal: S,
    config: EepromConfig,
    /// Next byte offset to write
    mem_addr: u16,
    /// Partially filled output byte
    bit_buffer: u8,
    /// Bits already in `bit_buffer` (0-7)
    bit_idx: u8,
    new_pages: PageCounter,
}

impl<E: Eeprom, S: StatusSignal> EepromLog<E, S> {
    /// Create an empty log starting at address 0
    pub fn new(eeprom: E, signal: S, config: EepromConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            eeprom,
            signal,
            config,
            mem_addr: 0,
            bit_buffer: 0,
            bit_idx: 0,
            new_pages: PageCounter::new(config.page_count),
        })
    }

    /// Append the low `bit_count` bits of `value`, most significant first
    ///
    /// A zero width is a no-op. Widths above [`MAX_FIELD_BITS`] are
    /// rejected before anything is appended.
    ///
    /// If a completed byte cannot be written, a
    /// [`StorageSignal::WriteFailure`] is raised and the remaining bits are
    /// still appended. The last write error is returned.
    pub fn append_bits(&mut self, value: u16, bit_count: u8) -> Result<(), LogError<E::Error>> {
        if bit_count > MAX_FIELD_BITS {
            return Err(LogError::InvalidWidth(bit_count));
        }

        let mut result = Ok(());

        for bit in (0..bit_count).rev() {
            if value & (1 << bit) != 0 {
                self.bit_buffer |= 1;
            }

            if self.bit_idx == 7 {
                let byte = self.bit_buffer;
                self.bit_idx = 0;
                self.bit_buffer = 0;
                if let Err(e) = self.emit(byte) {
                    result = Err(e);
                }
            } else {
                self.bit_idx += 1;
                self.bit_buffer <<= 1;
            }
        }

        result
    }

    /// Pad the pending byte with zero bits and write it
    ///
    /// Does nothing when no bits are pending, so calling it twice in a row
    /// writes at most one byte.
    pub fn flush(&mut self) -> Result<(), LogError<E::Error>> {
        if self.bit_idx == 0 {
            return Ok(());
        }
        self.append_bits(0, 8 - self.bit_idx)
    }

    /// Write one completed byte and advance the cursor
    fn emit(&mut self, byte: u8) -> Result<(), LogError<E::Error>> {
        let addr = self.mem_addr;
        let result = self
            .eeprom
            .write_byte(addr, byte)
            .map_err(|error| LogError::Write { addr, error });

        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("EEPROM write failed at {=u16:#x}", addr);
            self.signal.signal(StorageSignal::WriteFailure);
        }

        self.advance();
        result
    }

    fn advance(&mut self) {
        let next = u32::from(self.mem_addr) + 1;

        if self.config.is_page_aligned(next) {
            let pages = self.new_pages.increase();

            #[cfg(feature = "defmt")]
            defmt::debug!("EEPROM page complete, {=u16} new pages", pages);

            if pages >= self.config.near_full_pages {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "EEPROM nearly full: {=u16}/{=u16} pages",
                    pages,
                    self.config.page_count
                );
                self.signal.signal(StorageSignal::NearlyFull);
            }
        }

        if next >= self.config.capacity() {
            #[cfg(feature = "defmt")]
            defmt::info!("EEPROM log wrapped to address 0");
            self.mem_addr = 0;
        } else {
            // next < capacity <= 2^16
            self.mem_addr = next as u16;
        }
    }

    /// Next byte offset the log will write
    pub fn mem_addr(&self) -> u16 {
        self.mem_addr
    }

    /// Start of the page the cursor is in
    pub fn page_addr(&self) -> u16 {
        self.config.page_addr(self.mem_addr)
    }

    /// Bits waiting in the accumulator (0-7)
    pub fn pending_bits(&self) -> u8 {
        self.bit_idx
    }

    /// Pages started since the last reset
    pub fn new_pages(&self) -> u16 {
        self.new_pages.get()
    }

    /// Count one page manually (saturates at the page count)
    pub fn increase_new_pages(&mut self) -> u16 {
        self.new_pages.increase()
    }

    /// Start a new fill cycle
    ///
    /// Only the counter is cleared; the cursor keeps its position.
    pub fn reset_new_pages(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::info!("EEPROM new-page counter reset at {=u16} pages", self.new_pages.get());
        self.new_pages.reset();
    }

    /// Query, increase or reset the new-page counter
    pub fn new_pages_op(&mut self, mode: NewPagesMode) -> u16 {
        if mode == NewPagesMode::Reset {
            self.reset_new_pages();
            return self.new_pages.get();
        }
        self.new_pages.apply(mode)
    }

    /// Device configuration
    pub fn config(&self) -> &EepromConfig {
        &self.config
    }

    /// The underlying transport
    pub fn eeprom(&self) -> &E {
        &self.eeprom
    }

    /// Mutable access to the underlying transport (e.g. for read-back)
    pub fn eeprom_mut(&mut self) -> &mut E {
        &mut self.eeprom
    }

    /// The status signal receiver
    pub fn signal(&self) -> &S {
        &self.signal
    }

    /// Tear the log down, dropping any pending bits
    pub fn into_parts(self) -> (E, S) {
        (self.eeprom, self.signal)
    }
}
