//! Simulated roaster drum for host runs.
//!
//! A first-order thermal model shared between a [`SimThermocouple`] and a
//! [`SimHeater`].  Each thermocouple read advances the model by one step:
//! the heater adds a fixed amount of heat and the drum loses heat to the
//! room in proportion to the temperature difference.
//!
//! State lives in atomics so the two halves can sit on the control thread
//! while a test or the console keeps a handle for inspection.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::app::ports::{HeaterPort, SensorPort};
use crate::error::{ActuatorError, SensorError};

/// Room temperature (Celsius).
pub const AMBIENT_C: f64 = 20.0;
/// Heat added per step while the element is on (Celsius).
const HEAT_PER_STEP_C: f64 = 4.0;
/// Fraction of the excess over ambient lost per step.
const LOSS_PER_STEP: f64 = 0.02;

#[derive(Debug)]
struct DrumState {
    temperature_bits: AtomicU64,
    heater_on: AtomicBool,
    sensor_fault: AtomicBool,
}

/// Handle to the shared drum model.
#[derive(Debug, Clone)]
pub struct SimulatedDrum {
    state: Arc<DrumState>,
}

impl Default for SimulatedDrum {
    fn default() -> Self {
        Self::new(AMBIENT_C)
    }
}

impl SimulatedDrum {
    pub fn new(initial_c: f64) -> Self {
        Self {
            state: Arc::new(DrumState {
                temperature_bits: AtomicU64::new(initial_c.to_bits()),
                heater_on: AtomicBool::new(false),
                sensor_fault: AtomicBool::new(false),
            }),
        }
    }

    /// Split into the sensor and actuator halves.
    pub fn ports(&self) -> (SimThermocouple, SimHeater) {
        (
            SimThermocouple {
                drum: self.clone(),
            },
            SimHeater { drum: self.clone() },
        )
    }

    pub fn temperature_c(&self) -> f64 {
        f64::from_bits(self.state.temperature_bits.load(Ordering::Acquire))
    }

    pub fn heater_on(&self) -> bool {
        self.state.heater_on.load(Ordering::Acquire)
    }

    /// Make subsequent reads report an open thermocouple.
    pub fn set_sensor_fault(&self, faulted: bool) {
        self.state.sensor_fault.store(faulted, Ordering::Release);
    }

    /// Advance the model one step and return the new temperature.
    fn step(&self) -> f64 {
        let t = self.temperature_c();
        let heat = if self.heater_on() { HEAT_PER_STEP_C } else { 0.0 };
        let next = t + heat - (t - AMBIENT_C) * LOSS_PER_STEP;
        self.state
            .temperature_bits
            .store(next.to_bits(), Ordering::Release);
        next
    }
}

/// Thermocouple half of the simulated drum.
pub struct SimThermocouple {
    drum: SimulatedDrum,
}

impl SensorPort for SimThermocouple {
    fn read_celsius(&mut self) -> Result<f64, SensorError> {
        let t = self.drum.step();
        if self.drum.state.sensor_fault.load(Ordering::Acquire) {
            return Err(SensorError::OpenCircuit);
        }
        Ok(t)
    }
}

/// Relay half of the simulated drum.
pub struct SimHeater {
    drum: SimulatedDrum,
}

impl HeaterPort for SimHeater {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.drum.state.heater_on.store(on, Ordering::Release);
        Ok(())
    }
}
