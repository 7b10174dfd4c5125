//! Sensor subsystem: the [`SensorReader`] wrapping the thermocouple port,
//! plus the MAX31855 converter driver.
//!
//! The reader produces one Fahrenheit sample per tick.  A faulted read is
//! reported as an error, never as a stale or zero value.

pub mod max31855;

use log::{debug, warn};

use crate::app::ports::SensorPort;
use crate::error::SensorError;
use crate::units::{Fahrenheit, celsius_to_fahrenheit};

/// Wraps a [`SensorPort`], converting to Fahrenheit and classifying faults.
pub struct SensorReader<S> {
    port: S,
    /// Last fault seen, so a persistent fault is logged once per episode.
    last_fault: Option<SensorError>,
}

impl<S: SensorPort> SensorReader<S> {
    pub fn new(port: S) -> Self {
        Self {
            port,
            last_fault: None,
        }
    }

    /// One conversion.  Faults are transient: callers record "no measurement".
    pub fn sample(&mut self) -> Result<Fahrenheit, SensorError> {
        let celsius = self.port.read_celsius().and_then(|c| {
            if c.is_finite() {
                Ok(c)
            } else {
                Err(SensorError::OutOfRange)
            }
        });

        match celsius {
            Ok(c) => {
                if let Some(fault) = self.last_fault.take() {
                    debug!("Sensor recovered after fault: {fault}");
                }
                Ok(celsius_to_fahrenheit(c))
            }
            Err(fault) => {
                if self.last_fault != Some(fault) {
                    warn!("Sensor fault: {fault}");
                }
                self.last_fault = Some(fault);
                Err(fault)
            }
        }
    }
}
