//! On/off (bang-bang) heater control with a dead zone below target.
//!
//! ```text
//!   heater ON  ◀── temp < target - band
//!   hold       ◀── target - band <= temp < target
//!   heater OFF ◀── temp >= target
//! ```
//!
//! The hold zone keeps the relay from chattering around the set point.

use crate::units::Fahrenheit;

/// Stateless hysteresis decision.  The previous heater state is an input,
/// not something the controller remembers.
#[derive(Debug, Clone, Copy)]
pub struct HysteresisController {
    band: f64,
}

impl HysteresisController {
    pub fn new(band: f64) -> Self {
        Self { band }
    }

    /// Desired heater state for this tick.
    ///
    /// * no target → off
    /// * no temperature (sensor fault) → hold `previous`
    pub fn decide(
        &self,
        temperature: Option<Fahrenheit>,
        target: Option<Fahrenheit>,
        previous: bool,
    ) -> bool {
        let Some(target) = target else {
            return false;
        };
        let Some(temperature) = temperature else {
            return previous;
        };

        if temperature.degrees() < target.degrees() - self.band {
            true
        } else if temperature >= target {
            false
        } else {
            previous
        }
    }
}

impl Default for HysteresisController {
    fn default() -> Self {
        Self::new(5.0)
    }
}
