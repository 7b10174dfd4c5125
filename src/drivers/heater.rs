//! Heater relay actuator.
//!
//! Sole owner of the heater state.  Commands are debounced: asking for the
//! state the relay is already in touches no hardware and yields no
//! transition, so the control loop can re-issue its decision every tick.
//!
//! ## Safety contract
//!
//! The stored state only changes after the hardware write succeeded.  A
//! failed write leaves the stored state untouched and is reported to the
//! caller, which treats it as fatal to the session.

use log::info;
use serde::Serialize;

use crate::app::ports::HeaterPort;
use crate::error::ActuatorError;

/// An actual relay change, to be published as an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaterTransition {
    pub from: bool,
    pub to: bool,
}

pub struct HeaterActuator<H> {
    port: H,
    on: bool,
}

impl<H: HeaterPort> HeaterActuator<H> {
    /// Wrap `port`, assuming the relay starts de-energised.
    pub fn new(port: H) -> Self {
        Self { port, on: false }
    }

    /// Drive the relay to `desired`.  `Ok(None)` when nothing changed.
    pub fn set(&mut self, desired: bool) -> Result<Option<HeaterTransition>, ActuatorError> {
        if desired == self.on {
            return Ok(None);
        }

        self.port.set_heater(desired)?;

        let transition = HeaterTransition {
            from: self.on,
            to: desired,
        };
        self.on = desired;
        info!("Heater {}", if desired { "ON" } else { "OFF" });
        Ok(Some(transition))
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn port(&self) -> &H {
        &self.port
    }
}
