//! One measurement cycle as a packed record
//!
//! Field order and widths (73 bits):
//!
//! | Field               | Bits | Source                          |
//! |---------------------|------|---------------------------------|
//! | solar voltage       | 10   | raw ADC code                    |
//! | battery voltage     | 10   | raw ADC code                    |
//! | temperature         | 10   | raw ADC code                    |
//! | light               | 10   | raw ADC code                    |
//! | light prescaler     | 1    | 1 = prescaler was switched in   |
//! | humidity            | 8    | scaled by the environment sensor|
//! | housing temperature | 8    | scaled by the environment sensor|
//! | pressure            | 16   | scaled by the environment sensor|
//!
//! Records are not byte aligned; consecutive records share bytes.

use crate::storage::{EepromLog, LogError};
use crate::traits::{Eeprom, StatusSignal};

/// Record field, in stream order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Field {
    /// Solar panel voltage (ADC code)
    SolarVoltage,
    /// Battery voltage (ADC code)
    BatteryVoltage,
    /// Thermistor temperature (ADC code)
    Temperature,
    /// Light sensor reading (ADC code)
    Light,
    /// Light sensor prescaler switched in
    LightPrescaler,
    /// Relative humidity
    Humidity,
    /// Temperature inside the housing
    HousingTemperature,
    /// Barometric pressure
    Pressure,
}

/// Resolution of the analog front end
pub const ADC_BITS: u8 = 10;

impl Field {
    /// All fields in the order they are written
    pub const ORDER: [Field; 8] = [
        Field::SolarVoltage,
        Field::BatteryVoltage,
        Field::Temperature,
        Field::Light,
        Field::LightPrescaler,
        Field::Humidity,
        Field::HousingTemperature,
        Field::Pressure,
    ];

    /// Width of the field in the stream
    pub const fn bit_width(self) -> u8 {
        match self {
            Field::SolarVoltage | Field::BatteryVoltage | Field::Temperature | Field::Light => {
                ADC_BITS
            }
            Field::LightPrescaler => 1,
            Field::Humidity | Field::HousingTemperature => 8,
            Field::Pressure => 16,
        }
    }
}

/// Raw codes from one measurement cycle
///
/// Quantisation belongs to the sensor drivers; values wider than their
/// field are truncated to the low bits when appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    /// Solar panel voltage, 10-bit ADC code
    pub solar_voltage: u16,
    /// Battery voltage, 10-bit ADC code
    pub battery_voltage: u16,
    /// Thermistor temperature, 10-bit ADC code
    pub temperature: u16,
    /// Light sensor, 10-bit ADC code
    pub light: u16,
    /// Whether the light sensor prescaler was switched in
    pub light_prescaler: bool,
    /// Scaled relative humidity
    pub humidity: u8,
    /// Scaled housing temperature
    pub housing_temperature: u8,
    /// Scaled barometric pressure
    pub pressure: u16,
}

impl Sample {
    /// Total record width in bits
    pub const BITS: u32 = {
        let mut total = 0u32;
        let mut i = 0;
        while i < Field::ORDER.len() {
            total += Field::ORDER[i].bit_width() as u32;
            i += 1;
        }
        total
    };

    /// Value of one field
    pub fn get(&self, field: Field) -> u16 {
        match field {
            Field::SolarVoltage => self.solar_voltage,
            Field::BatteryVoltage => self.battery_voltage,
            Field::Temperature => self.temperature,
            Field::Light => self.light,
            Field::LightPrescaler => u16::from(self.light_prescaler),
            Field::Humidity => u16::from(self.humidity),
            Field::HousingTemperature => u16::from(self.housing_temperature),
            Field::Pressure => self.pressure,
        }
    }

    /// Append every field to the log in stream order
    ///
    /// All fields are appended even if a byte write fails, keeping the
    /// stream aligned with the schema. The first error is returned.
    pub fn append_to<E, S>(&self, log: &mut EepromLog<E, S>) -> Result<(), LogError<E::Error>>
    where
        E: Eeprom,
        S: StatusSignal,
    {
        let mut result = Ok(());

        for field in Field::ORDER {
            let appended = log.append_bits(self.get(field), field.bit_width());
            if result.is_ok() {
                result = appended;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EepromConfig;
    use heapless::Vec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct Nack;

    #[derive(Default)]
    struct ByteSink {
        bytes: Vec<u8, 32>,
        fail_at: Option<u16>,
    }

    impl Eeprom for ByteSink {
        type Error = Nack;

        fn write_byte(&mut self, addr: u16, value: u8) -> Result<(), Nack> {
            if self.fail_at == Some(addr) {
                return Err(Nack);
            }
            self.bytes.push(value).map_err(|_| Nack)
        }

        fn read_byte(&mut self, addr: u16) -> Result<u8, Nack> {
            self.bytes.get(addr as usize).copied().ok_or(Nack)
        }

        fn write_block(&mut self, addr: u16, data: &[u8]) -> Result<usize, Nack> {
            for (i, &b) in data.iter().enumerate() {
                self.write_byte(addr + i as u16, b)?;
            }
            Ok(data.len())
        }

        fn read_block(&mut self, addr: u16, buf: &mut [u8]) -> Result<usize, Nack> {
            for (i, b) in buf.iter_mut().enumerate() {
                *b = self.read_byte(addr + i as u16)?;
            }
            Ok(buf.len())
        }
    }

    #[test]
    fn test_record_width() {
        assert_eq!(Sample::BITS, 73);
        let sum: u32 = Field::ORDER.iter().map(|f| f.bit_width() as u32).sum();
        assert_eq!(sum, Sample::BITS);
    }

    #[test]
    fn test_sample_packing() {
        let sample = Sample {
            solar_voltage: 0x3FF,
            battery_voltage: 0,
            temperature: 0x3FF,
            light: 0,
            light_prescaler: true,
            humidity: 0xA5,
            housing_temperature: 0x0F,
            pressure: 0x1234,
        };

        let mut log = EepromLog::new(ByteSink::default(), (), EepromConfig::DEFAULT).unwrap();
        sample.append_to(&mut log).unwrap();
        assert_eq!(log.pending_bits(), 1); // 73 = 9 * 8 + 1
        log.flush().unwrap();

        // 1111111111 0000000000 1111111111 0000000000 1 10100101 00001111 0001001000110100 0000000
        let expected: [u8; 10] = [
            0b1111_1111,
            0b1100_0000,
            0b0000_1111,
            0b1111_1100,
            0b0000_0000,
            0b1101_0010,
            0b1000_0111,
            0b1000_1001,
            0b0001_1010,
            0b0000_0000,
        ];
        assert_eq!(log.eeprom().bytes.as_slice(), &expected);
        assert_eq!(u32::from(log.mem_addr()), Sample::BITS.div_ceil(8));
    }

    #[test]
    fn test_failed_field_keeps_stream_aligned() {
        let sink = ByteSink {
            fail_at: Some(1),
            ..ByteSink::default()
        };
        let mut log = EepromLog::new(sink, (), EepromConfig::DEFAULT).unwrap();

        let result = Sample::default().append_to(&mut log);
        assert_eq!(result, Err(LogError::Write { addr: 1, error: Nack }));
        // Every field was still appended
        assert_eq!(log.mem_addr(), 9);
        assert_eq!(log.pending_bits(), 1);
    }
}
