//! Outbound application events.
//!
//! The [`RoastService`](super::service::RoastService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, push to a web
//! socket, queue for subscribers, etc.

use serde::Serialize;

use crate::session::SessionMode;
use crate::units::Fahrenheit;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RoastEvent {
    /// One sample was taken (`None` = sensor fault this tick).
    TemperatureUpdate { temperature: Option<Fahrenheit> },

    /// The heater relay actually changed state.
    HeaterChanged { heater_on: bool },

    /// A manual or profile session began.
    SessionStarted { mode: SessionMode },

    /// A profile entered step `index`.
    StepStarted {
        index: usize,
        target: Fahrenheit,
        duration_seconds: f64,
    },

    /// The last profile step finished; heater is off.
    ProfileComplete { name: String },

    /// A session ended by command or by a heater fault.
    SessionStopped,
}

/// Point-in-time view of the session, for status replies.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStatus {
    pub mode: SessionMode,
    pub target: Option<Fahrenheit>,
    pub profile: Option<String>,
    pub step_index: Option<usize>,
    pub heater_on: bool,
    pub last_temperature: Option<Fahrenheit>,
    pub samples: usize,
}
