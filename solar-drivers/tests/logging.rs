//! End-to-end: bit-packed log over the I2C EEPROM driver over a simulated bus

use solar_core::config::EepromConfig;
use solar_core::record::Sample;
use solar_core::storage::{EepromLog, LogError};
use solar_core::traits::{StatusSignal, StorageSignal};
use solar_drivers::eeprom::{EepromError, I2cEeprom};
use solar_drivers::sim::{ManualClock, SimEeprom, SimError};
use solar_drivers::status::LedSignaller;
use solar_hal::{Clock, OutputPin};

#[derive(Default)]
struct SignalLog {
    signals: Vec<StorageSignal>,
}

impl StatusSignal for SignalLog {
    fn signal(&mut self, signal: StorageSignal) {
        self.signals.push(signal);
    }
}

#[derive(Default)]
struct Led {
    high: bool,
}

impl OutputPin for Led {
    fn set_state(&mut self, high: bool) {
        self.high = high;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

fn transport<const N: usize>(config: EepromConfig) -> I2cEeprom<SimEeprom<N>, ManualClock> {
    let sim = SimEeprom::new(config.device_address, usize::from(config.page_size));
    I2cEeprom::new(sim, ManualClock::default(), config).unwrap()
}

#[test]
fn nibbles_land_as_one_byte() {
    let config = EepromConfig::DEFAULT;
    let mut log = EepromLog::new(transport::<32_768>(config), (), config).unwrap();
    assert!(log.eeprom_mut().begin());

    log.append_bits(0b1011, 4).unwrap();
    log.append_bits(0b0110, 4).unwrap();

    assert_eq!(log.mem_addr(), 1);
    assert_eq!(log.eeprom().bus().memory()[0], 0xB6);
    assert_eq!(log.eeprom_mut().read_byte(0), Ok(0xB6));
}

#[test]
fn samples_read_back_through_block_reads() {
    let config = EepromConfig::DEFAULT;
    let mut log = EepromLog::new(transport::<32_768>(config), (), config).unwrap();

    let sample = Sample {
        solar_voltage: 812,
        battery_voltage: 655,
        temperature: 402,
        light: 1023,
        light_prescaler: true,
        humidity: 141,
        housing_temperature: 97,
        pressure: 40_211,
    };
    for _ in 0..8 {
        sample.append_to(&mut log).unwrap();
    }
    log.flush().unwrap();

    // 8 records * 73 bits = 584 bits = 73 bytes
    assert_eq!(log.mem_addr(), 73);

    let mut stream = [0u8; 73];
    assert_eq!(log.eeprom_mut().read_block(0, &mut stream), Ok(73));
    assert_eq!(&stream[..], &log.eeprom().bus().memory()[..73]);
    assert_eq!(stream[0], (812u16 >> 2) as u8);
}

#[test]
fn nearly_full_and_wraparound_on_small_device() {
    // 8 pages of 16 bytes, nearly full from page 6
    let config = EepromConfig::DEFAULT.with_geometry(16, 8, 6);
    let mut log = EepromLog::new(transport::<128>(config), SignalLog::default(), config).unwrap();

    for i in 0..96u16 {
        log.append_bits(i, 8).unwrap();
    }
    assert_eq!(log.new_pages(), 6);
    assert_eq!(log.signal().signals, [StorageSignal::NearlyFull]);

    for i in 96..130u16 {
        log.append_bits(i, 8).unwrap();
    }

    // Wrapped: the first two bytes were overwritten
    assert_eq!(log.mem_addr(), 2);
    let memory = log.eeprom().bus().memory();
    assert_eq!(memory[0], 128);
    assert_eq!(memory[1], 129);
    assert_eq!(memory[2], 2);
    assert_eq!(memory[127], 127);

    // Pages 6, 7, 8 each signalled once; counter capped and not reset by the wrap
    assert_eq!(log.new_pages(), 8);
    assert_eq!(log.signal().signals.len(), 3);
}

#[test]
fn stuck_device_reports_failures_and_keeps_logging() {
    let config = EepromConfig::DEFAULT;
    let led = LedSignaller::new_active_high(Led::default(), ManualClock::default());
    let mut log = EepromLog::new(transport::<32_768>(config), led, config).unwrap();
    log.eeprom_mut().bus_mut().set_busy_polls(u32::MAX);

    // First byte is latched but its write cycle never completes
    assert_eq!(
        log.append_bits(0xAB, 8),
        Err(LogError::Write {
            addr: 0,
            error: EepromError::Timeout
        })
    );
    assert_eq!(log.eeprom().clock().now_ms(), 100);

    // Now the device ignores the write itself
    assert_eq!(
        log.append_bits(0xCD, 8),
        Err(LogError::Write {
            addr: 1,
            error: EepromError::Bus(SimError::Nack)
        })
    );

    assert_eq!(log.mem_addr(), 2);
    // Two error patterns played, LED left dark
    assert_eq!(log.signal().clock().now_ms(), 2 * 1960);
    assert!(!log.signal().pin().is_set_high());
}

#[test]
fn missing_device_is_detected() {
    let config = EepromConfig::DEFAULT;
    let mut eeprom = transport::<32_768>(config);
    eeprom.bus_mut().set_present(false);
    assert!(!eeprom.begin());
}
