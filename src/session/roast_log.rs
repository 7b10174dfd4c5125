//! The time series recorded during a roast.

use serde::{Deserialize, Serialize};

use crate::units::Fahrenheit;

/// One tick's measurement.  `temperature` is `None` when the sensor faulted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoastSample {
    pub elapsed_seconds: f64,
    pub temperature: Option<Fahrenheit>,
}

/// Append-only log; insertion order is time order.
#[derive(Debug, Clone, Default)]
pub struct RoastLog {
    samples: Vec<RoastSample>,
}

impl RoastLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything recorded so far.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    pub fn push(&mut self, sample: RoastSample) {
        debug_assert!(
            self.samples
                .last()
                .is_none_or(|last| last.elapsed_seconds <= sample.elapsed_seconds),
            "roast log must stay in time order"
        );
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[RoastSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Whether at least one sample carries a real measurement.
    pub fn has_measurements(&self) -> bool {
        self.samples.iter().any(|s| s.temperature.is_some())
    }
}
