//! Mock hardware adapters for integration tests.
//!
//! Records every relay write so tests can assert on the full command
//! history.  State is held behind `Arc` so a test keeps a handle after
//! the mock has been moved into the service or the control thread.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use roastctl::app::events::RoastEvent;
use roastctl::app::ports::{EventSink, HeaterPort, SensorPort, TimePort};
use roastctl::error::{ActuatorError, SensorError};

/// Celsius reading that converts back to exactly `f` degrees Fahrenheit.
pub fn celsius(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

// ── Thermocouple ──────────────────────────────────────────────

/// Plays back a script of readings (given in Fahrenheit); once the script
/// runs out the last reading repeats.
#[derive(Clone, Default)]
pub struct ScriptedThermocouple {
    script: Arc<Mutex<VecDeque<Result<f64, SensorError>>>>,
    last: Arc<Mutex<Option<Result<f64, SensorError>>>>,
}

#[allow(dead_code)]
impl ScriptedThermocouple {
    pub fn new(readings_f: impl IntoIterator<Item = Result<f64, SensorError>>) -> Self {
        let s = Self::default();
        s.extend(readings_f);
        s
    }

    pub fn steady(f: f64) -> Self {
        Self::new([Ok(f)])
    }

    pub fn extend(&self, readings_f: impl IntoIterator<Item = Result<f64, SensorError>>) {
        self.script.lock().unwrap().extend(readings_f);
    }
}

impl SensorPort for ScriptedThermocouple {
    fn read_celsius(&mut self) -> Result<f64, SensorError> {
        let next = self.script.lock().unwrap().pop_front();
        let mut last = self.last.lock().unwrap();
        if let Some(reading) = next {
            *last = Some(reading);
        }
        last.unwrap_or(Err(SensorError::Bus)).map(celsius)
    }
}

// ── Heater relay ──────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockRelay {
    writes: Arc<Mutex<Vec<bool>>>,
    fail: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockRelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<bool> {
        self.writes.lock().unwrap().clone()
    }

    /// Physical relay state: last successful write, off before any.
    pub fn is_on(&self) -> bool {
        self.writes.lock().unwrap().last().copied().unwrap_or(false)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl HeaterPort for MockRelay {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.writes.lock().unwrap().push(on);
        Ok(())
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Clock the test advances by hand.
#[derive(Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl TimePort for ManualClock {
    fn uptime(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<RoastEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&RoastEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn heater_changes(&self) -> Vec<bool> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RoastEvent::HeaterChanged { heater_on } => Some(*heater_on),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &RoastEvent) {
        self.events.push(event.clone());
    }
}
