//! Heater control laws.

pub mod hysteresis;
