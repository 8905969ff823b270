//! Property tests for the bit-packed stream layout

use proptest::prelude::*;
use solar_core::config::EepromConfig;
use solar_core::storage::EepromLog;
use solar_core::traits::Eeprom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Never;

/// Appends every byte in write order and checks the cursor is contiguous
#[derive(Default)]
struct StreamSink {
    bytes: Vec<u8>,
}

impl Eeprom for StreamSink {
    type Error = Never;

    fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Never> {
        assert_eq!(addr as usize, self.bytes.len());
        self.bytes.push(value);
        Ok(())
    }

    fn read_byte(&mut self, addr: u16) -> Result<u8, Never> {
        Ok(self.bytes[addr as usize])
    }

    fn write_block(&mut self, addr: u16, data: &[u8]) -> Result<usize, Never> {
        for (i, &b) in data.iter().enumerate() {
            self.write_byte(addr + i as u16, b)?;
        }
        Ok(data.len())
    }

    fn read_block(&mut self, addr: u16, buf: &mut [u8]) -> Result<usize, Never> {
        buf.copy_from_slice(&self.bytes[addr as usize..addr as usize + buf.len()]);
        Ok(buf.len())
    }
}

/// MSB-first reader over the emitted bytes
struct BitReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl BitReader<'_> {
    fn take(&mut self, width: u8) -> u16 {
        let mut value = 0u16;
        for _ in 0..width {
            let byte = self.bytes[self.pos / 8];
            let bit = (byte >> (7 - self.pos % 8)) & 1;
            value = (value << 1) | u16::from(bit);
            self.pos += 1;
        }
        value
    }
}

fn mask(value: u16, width: u8) -> u16 {
    if width >= 16 {
        value
    } else {
        value & ((1u16 << width) - 1)
    }
}

fn field() -> impl Strategy<Value = (u16, u8)> {
    (any::<u16>(), 0u8..=16)
}

proptest! {
    #[test]
    fn fields_read_back_msb_first(fields in prop::collection::vec(field(), 0..64)) {
        let mut log = EepromLog::new(StreamSink::default(), (), EepromConfig::DEFAULT).unwrap();

        let total_bits: usize = fields.iter().map(|&(_, w)| w as usize).sum();
        for &(value, width) in &fields {
            log.append_bits(value, width).unwrap();
        }
        prop_assert_eq!(log.pending_bits() as usize, total_bits % 8);
        prop_assert_eq!(log.eeprom().bytes.len(), total_bits / 8);

        log.flush().unwrap();
        let (sink, ()) = log.into_parts();
        prop_assert_eq!(sink.bytes.len(), total_bits.div_ceil(8));

        let mut reader = BitReader { bytes: &sink.bytes, pos: 0 };
        for &(value, width) in &fields {
            prop_assert_eq!(reader.take(width), mask(value, width));
        }

        // Padding is zero
        let padding = (8 - total_bits % 8) % 8;
        prop_assert_eq!(reader.take(padding as u8), 0);
    }

    #[test]
    fn whole_byte_widths_emit_exact_bytes(mut widths in prop::collection::vec(1u8..=8, 1..6), value in any::<u16>()) {
        let partial: usize = widths.iter().map(|&w| w as usize).sum();
        if partial % 8 != 0 {
            widths.push((8 - partial % 8) as u8);
        }
        let total = partial.div_ceil(8) * 8;

        let mut log = EepromLog::new(StreamSink::default(), (), EepromConfig::DEFAULT).unwrap();
        for &w in &widths {
            log.append_bits(value, w).unwrap();
        }

        prop_assert_eq!(log.eeprom().bytes.len(), total / 8);
        prop_assert_eq!(log.mem_addr() as usize, total / 8);
        prop_assert_eq!(log.pending_bits(), 0);
    }
}
