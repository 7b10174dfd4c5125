//! GPIO relay adapter for the heater.

use embedded_hal::digital::OutputPin;

use crate::app::ports::HeaterPort;
use crate::error::ActuatorError;

/// Heater relay on one active-high output pin.
pub struct RelayHeater<P> {
    pin: P,
}

impl<P: OutputPin> RelayHeater<P> {
    /// Take the pin and drive it low so the heater starts de-energised.
    pub fn new(mut pin: P) -> Result<Self, ActuatorError> {
        pin.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        Ok(Self { pin })
    }

    pub fn release(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> HeaterPort for RelayHeater<P> {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError> {
        let res = if on { self.pin.set_high() } else { self.pin.set_low() };
        res.map_err(|_| ActuatorError::GpioWriteFailed)
    }
}
