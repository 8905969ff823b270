//! Simulated 24-series I2C EEPROM
//!
//! Behaves like the real part on the bus:
//! - two-byte big-endian memory address at the start of every write
//! - page writes wrap inside the current page
//! - sequential reads continue from the internal address pointer
//! - the device ignores its address while a write cycle is in progress
//!
//! Faults can be injected: absent device, long or endless write cycles,
//! a device that gives out after a number of writes, and reads that deliver
//! fewer bytes than requested.

use solar_hal::I2cBus;

/// Bus errors from the simulated device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SimError {
    /// Address not acknowledged
    Nack,
}

/// Transaction counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SimStats {
    /// Write transactions that stored data
    pub data_writes: u32,
    /// Address-only transactions
    pub probes: u32,
    /// Read transactions
    pub reads: u32,
    /// Transactions the device did not acknowledge
    pub nacks: u32,
}

/// In-memory EEPROM of `N` bytes
pub struct SimEeprom<const N: usize> {
    memory: [u8; N],
    address: u8,
    page_size: usize,
    /// Internal address counter
    pointer: usize,
    present: bool,
    /// NACKed transactions after each data write
    busy_polls: u32,
    busy_remaining: u32,
    /// Bytes delivered per `read_available` call
    read_limit: Option<usize>,
    /// Bytes left before reads come back empty
    read_budget: Option<usize>,
    /// Data writes left before the device fails
    write_budget: Option<u32>,
    /// Past the write budget, latch writes but never finish the cycle
    hang_after_budget: bool,
    stats: SimStats,
}

impl<const N: usize> SimEeprom<N> {
    /// Erased (0xFF) device at `address` with `page_size`-byte pages
    pub fn new(address: u8, page_size: usize) -> Self {
        Self {
            memory: [0xFF; N],
            address,
            page_size: page_size.max(1),
            pointer: 0,
            present: true,
            busy_polls: 0,
            busy_remaining: 0,
            read_limit: None,
            read_budget: None,
            write_budget: None,
            hang_after_budget: false,
            stats: SimStats::default(),
        }
    }

    /// Device contents
    pub fn memory(&self) -> &[u8; N] {
        &self.memory
    }

    /// Transaction counters
    pub fn stats(&self) -> SimStats {
        self.stats
    }

    /// Connect or disconnect the device
    pub fn set_present(&mut self, present: bool) {
        self.present = present;
    }

    /// Number of polls each write cycle stays busy (`u32::MAX` = forever)
    pub fn set_busy_polls(&mut self, polls: u32) {
        self.busy_polls = polls;
    }

    /// Cap the bytes returned per `read_available` call
    pub fn set_read_limit(&mut self, limit: Option<usize>) {
        self.read_limit = limit;
    }

    /// Total bytes `read_available` delivers before returning nothing
    pub fn set_read_budget(&mut self, budget: Option<usize>) {
        self.read_budget = budget;
    }

    /// Data writes accepted before the device stops acknowledging them
    pub fn set_write_budget(&mut self, budget: Option<u32>) {
        self.write_budget = budget;
    }

    /// Past the write budget, accept the data but stay busy forever
    pub fn set_hang_after_budget(&mut self, hang: bool) {
        self.hang_after_budget = hang;
    }

    /// Consume one data write from the budget; `false` once it is spent
    fn take_write(&mut self) -> bool {
        match self.write_budget {
            Some(0) => false,
            Some(left) => {
                self.write_budget = Some(left - 1);
                true
            }
            None => true,
        }
    }

    fn acknowledge(&mut self, address: u8) -> Result<(), SimError> {
        if address != self.address || !self.present {
            self.stats.nacks += 1;
            return Err(SimError::Nack);
        }
        if self.busy_remaining > 0 {
            if self.busy_remaining != u32::MAX {
                self.busy_remaining -= 1;
            }
            self.stats.nacks += 1;
            return Err(SimError::Nack);
        }
        Ok(())
    }

    fn store(&mut self, payload: &[u8]) {
        let page_start = self.pointer - self.pointer % self.page_size;
        let mut offset = self.pointer % self.page_size;

        for &byte in payload {
            self.memory[(page_start + offset) % N] = byte;
            offset = (offset + 1) % self.page_size;
        }

        self.pointer = (page_start + offset) % N;
        self.busy_remaining = self.busy_polls;
    }

    fn load(&mut self, buf: &mut [u8]) {
        for byte in buf.iter_mut() {
            *byte = self.memory[self.pointer];
            self.pointer = (self.pointer + 1) % N;
        }
    }
}

impl<const N: usize> I2cBus for SimEeprom<N> {
    type Error = SimError;

    fn write(&mut self, address: u8, data: &[u8]) -> Result<(), SimError> {
        self.acknowledge(address)?;

        match data {
            [] => self.stats.probes += 1,
            [hi, lo, payload @ ..] => {
                let accepted = payload.is_empty() || self.take_write();
                if !accepted && !self.hang_after_budget {
                    self.stats.nacks += 1;
                    return Err(SimError::Nack);
                }

                self.pointer = usize::from(u16::from_be_bytes([*hi, *lo])) % N;
                if !payload.is_empty() {
                    self.store(payload);
                    self.stats.data_writes += 1;
                }
                if !accepted {
                    self.busy_remaining = u32::MAX;
                }
            }
            // Half an address: the part latches nothing useful
            [_] => {}
        }

        Ok(())
    }

    fn read(&mut self, address: u8, buf: &mut [u8]) -> Result<(), SimError> {
        self.acknowledge(address)?;
        self.stats.reads += 1;
        self.load(buf);
        Ok(())
    }

    fn write_read(
        &mut self,
        address: u8,
        write_data: &[u8],
        read_buf: &mut [u8],
    ) -> Result<(), SimError> {
        self.write(address, write_data)?;
        self.read(address, read_buf)
    }

    fn read_available(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, SimError> {
        let mut n = self.read_limit.map_or(buf.len(), |limit| limit.min(buf.len()));
        if let Some(budget) = self.read_budget {
            n = n.min(budget);
        }
        self.read(address, &mut buf[..n])?;
        if let Some(budget) = self.read_budget.as_mut() {
            *budget -= n;
        }
        Ok(n)
    }
}
