//! Temperature unit handling.
//!
//! The converter reports Celsius; everything above the sensor layer
//! (targets, samples, profiles, events) is expressed in Fahrenheit.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A temperature in degrees Fahrenheit.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fahrenheit(pub f64);

impl Fahrenheit {
    pub const fn degrees(self) -> f64 {
        self.0
    }

    /// Finite and above absolute-zero-ish nonsense; usable as a control target.
    pub fn is_valid_target(self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }
}

impl fmt::Display for Fahrenheit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}\u{00b0}F", self.0)
    }
}

impl From<i32> for Fahrenheit {
    fn from(degrees: i32) -> Self {
        Self(f64::from(degrees))
    }
}

/// `f = c * 9/5 + 32`, rounded to two decimal places.
pub fn celsius_to_fahrenheit(celsius: f64) -> Fahrenheit {
    Fahrenheit(round2(celsius * 9.0 / 5.0 + 32.0))
}

/// Round to two decimal places (used for temperatures and elapsed seconds).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
