//! EEPROM geometry and transport timing
//!
//! Defaults describe a 24LC256-class part: 32 KiB as 512 pages of 64 bytes
//! at I2C address 0x50.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 7-bit I2C address of the EEPROM (A0..A2 tied low)
pub const EEPROM_I2C_ADDRESS: u8 = 0x50;

/// Bytes per EEPROM page
pub const PAGE_SIZE: u16 = 64;

/// Number of pages on the device
pub const PAGE_COUNT: u16 = 512;

/// New-page count at which the log reports "nearly full" (~88%)
pub const NEAR_FULL_PAGES: u16 = 452;

/// Largest single write/read transaction the transport issues
pub const BLOCK_SIZE: u8 = 16;

/// Upper bound for one transaction to be acknowledged (ms)
pub const I2C_TIMEOUT_MS: u32 = 100;

/// Interval between write-completion polls (ms)
pub const POLL_INTERVAL_MS: u32 = 1;

/// Largest address space a 16-bit byte offset can cover
pub const MAX_CAPACITY: u32 = 1 << 16;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Page size is zero
    ZeroPageSize,
    /// Page count is zero
    ZeroPageCount,
    /// `page_size * page_count` exceeds the 16-bit address space
    CapacityTooLarge,
    /// Near-full threshold is above the page count
    ThresholdTooHigh,
    /// Block size is zero, larger than a page, or does not divide the page
    InvalidBlockSize,
    /// Poll interval is zero
    ZeroPollInterval,
    /// Timeout is zero, so no write could ever be confirmed
    ZeroTimeout,
}

/// EEPROM device configuration
///
/// Shared by the transport (address, block size, timing) and the log
/// (page geometry, near-full threshold).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EepromConfig {
    /// 7-bit I2C device address
    pub device_address: u8,
    /// Bytes per page
    pub page_size: u16,
    /// Pages on the device
    pub page_count: u16,
    /// New-page count that triggers the nearly-full signal
    pub near_full_pages: u16,
    /// Bytes per block transaction
    pub block_size: u8,
    /// Transaction acknowledge timeout (ms)
    pub timeout_ms: u32,
    /// Delay between acknowledge polls (ms)
    pub poll_interval_ms: u32,
}

impl Default for EepromConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl EepromConfig {
    /// The logger's on-board EEPROM
    pub const DEFAULT: Self = Self {
        device_address: EEPROM_I2C_ADDRESS,
        page_size: PAGE_SIZE,
        page_count: PAGE_COUNT,
        near_full_pages: NEAR_FULL_PAGES,
        block_size: BLOCK_SIZE,
        timeout_ms: I2C_TIMEOUT_MS,
        poll_interval_ms: POLL_INTERVAL_MS,
    };

    /// Same timing and address with a different page layout
    ///
    /// Used to run the log against small simulated devices.
    pub const fn with_geometry(self, page_size: u16, page_count: u16, near_full_pages: u16) -> Self {
        Self {
            page_size,
            page_count,
            near_full_pages,
            ..self
        }
    }

    /// Same geometry with a different block transaction size
    pub const fn with_block_size(self, block_size: u8) -> Self {
        Self { block_size, ..self }
    }

    /// Same geometry with different acknowledge timing
    pub const fn with_timing(self, timeout_ms: u32, poll_interval_ms: u32) -> Self {
        Self {
            timeout_ms,
            poll_interval_ms,
            ..self
        }
    }

    /// Check the configuration for consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.page_count == 0 {
            return Err(ConfigError::ZeroPageCount);
        }
        if self.capacity() > MAX_CAPACITY {
            return Err(ConfigError::CapacityTooLarge);
        }
        if self.near_full_pages > self.page_count {
            return Err(ConfigError::ThresholdTooHigh);
        }

        let block = u16::from(self.block_size);
        if block == 0 || block > self.page_size || self.page_size % block != 0 {
            return Err(ConfigError::InvalidBlockSize);
        }

        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        Ok(())
    }

    /// Total bytes on the device
    pub const fn capacity(&self) -> u32 {
        self.page_size as u32 * self.page_count as u32
    }

    /// Start of the page containing `addr`
    pub const fn page_addr(&self, addr: u16) -> u16 {
        addr - (addr % self.page_size)
    }

    /// Check if `addr` is the first byte of a page
    pub const fn is_page_aligned(&self, addr: u32) -> bool {
        addr % self.page_size as u32 == 0
    }

    /// Check if `len` bytes starting at `addr` fit on the device
    pub const fn contains(&self, addr: u16, len: usize) -> bool {
        addr as u32 as usize + len <= self.capacity() as usize
    }
}
