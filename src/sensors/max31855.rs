//! MAX31855 cold-junction-compensated thermocouple converter.
//!
//! Read-only SPI device: every transfer clocks out one 32-bit frame.
//!
//! ```text
//!  31        18 17 16 15       4  3  2   1   0
//!  ┌──────────┬──┬──┬──────────┬──┬───┬───┬──┐
//!  │ TC temp  │ -│F │ CJ temp  │ -│SCV│SCG│OC│
//!  │ 14b 0.25C│  │  │ 12b      │  │   │   │  │
//!  └──────────┴──┴──┴──────────┴──┴───┴───┴──┘
//! ```

use embedded_hal::spi::SpiDevice;

use crate::app::ports::SensorPort;
use crate::error::SensorError;

const FAULT_BIT: u32 = 1 << 16;
const OPEN_CIRCUIT: u32 = 1 << 0;
const SHORT_TO_GND: u32 = 1 << 1;
const SHORT_TO_VCC: u32 = 1 << 2;
const TC_LSB_C: f64 = 0.25;

/// Decode a raw frame to the thermocouple temperature in Celsius.
pub fn decode_frame(frame: u32) -> Result<f64, SensorError> {
    if frame & FAULT_BIT != 0 {
        return Err(if frame & OPEN_CIRCUIT != 0 {
            SensorError::OpenCircuit
        } else if frame & SHORT_TO_GND != 0 {
            SensorError::ShortToGround
        } else if frame & SHORT_TO_VCC != 0 {
            SensorError::ShortToVcc
        } else {
            SensorError::OutOfRange
        });
    }
    // Arithmetic shift sign-extends the 14-bit two's complement field.
    let counts = (frame as i32) >> 18;
    Ok(f64::from(counts) * TC_LSB_C)
}

pub struct Max31855<SPI> {
    spi: SPI,
}

impl<SPI: SpiDevice> Max31855<SPI> {
    pub fn new(spi: SPI) -> Self {
        Self { spi }
    }

    pub fn read_frame(&mut self) -> Result<u32, SensorError> {
        let mut buf = [0u8; 4];
        self.spi.read(&mut buf).map_err(|_| SensorError::Bus)?;
        Ok(u32::from_be_bytes(buf))
    }
}

impl<SPI: SpiDevice> SensorPort for Max31855<SPI> {
    fn read_celsius(&mut self) -> Result<f64, SensorError> {
        decode_frame(self.read_frame()?)
    }
}
