//! Actuator drivers.

pub mod heater;
