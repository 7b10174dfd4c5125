//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured roast events to the
//! `log` facade (stderr via `tracing-subscriber` on the host, UART on a
//! board).  The web and console adapters implement the same trait.

use log::{debug, info};

use crate::app::events::RoastEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`RoastEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &RoastEvent) {
        match event {
            RoastEvent::TemperatureUpdate { temperature } => match temperature {
                Some(t) => debug!("TEMP  | {}", t),
                None => debug!("TEMP  | no measurement"),
            },
            RoastEvent::HeaterChanged { heater_on } => {
                info!("HEAT  | {}", if *heater_on { "ON" } else { "OFF" });
            }
            RoastEvent::SessionStarted { mode } => {
                info!("START | mode={:?}", mode);
            }
            RoastEvent::StepStarted {
                index,
                target,
                duration_seconds,
            } => {
                info!("STEP  | #{} target={} for {:.1}s", index, target, duration_seconds);
            }
            RoastEvent::ProfileComplete { name } => {
                info!("DONE  | profile '{}'", name);
            }
            RoastEvent::SessionStopped => {
                info!("STOP  | session ended");
            }
        }
    }
}
