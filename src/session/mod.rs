//! Roast session state.
//!
//! ```text
//!            start-manual                 stop
//!   IDLE ─────────────────▶ MANUAL ──────────────┐
//!    ▲ ▲                                          ▼
//!    │ │     run-profile                      STOPPING ──▶ IDLE
//!    │ └──────────────── PROFILE_RUNNING ────────┘
//!    │                        │
//!    └────[last step done]────┘
//! ```
//!
//! Exactly one [`SessionState`] exists per [`RoastService`](crate::app::service::RoastService);
//! it is only mutated by the service's command handlers and its tick.

pub mod roast_log;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::profile::{Profile, Step};
use crate::units::Fahrenheit;

pub use roast_log::{RoastLog, RoastSample};

/// The session state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Manual {
        target: Option<Fahrenheit>,
    },
    ProfileRunning {
        profile: Profile,
        step_index: usize,
        /// Uptime at which the current step began.
        step_started_at: Duration,
    },
    /// Transient: heater is being forced off on the way back to `Idle`.
    Stopping,
}

impl SessionState {
    pub fn mode(&self) -> SessionMode {
        match self {
            Self::Idle => SessionMode::Idle,
            Self::Manual { .. } => SessionMode::Manual,
            Self::ProfileRunning { .. } => SessionMode::Profile,
            Self::Stopping => SessionMode::Stopping,
        }
    }

    /// A session (manual or profile) owns the tick loop.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Manual { .. } | Self::ProfileRunning { .. })
    }

    /// The target the controller should chase this tick.
    pub fn target(&self) -> Option<Fahrenheit> {
        match self {
            Self::Manual { target } => *target,
            Self::ProfileRunning { .. } => self.current_step().map(|s| s.target_temperature),
            Self::Idle | Self::Stopping => None,
        }
    }

    /// Current profile step, if a profile is running.
    pub fn current_step(&self) -> Option<&Step> {
        match self {
            Self::ProfileRunning {
                profile,
                step_index,
                ..
            } => profile.steps.get(*step_index),
            _ => None,
        }
    }
}

/// Field-less view of [`SessionState`] for status replies and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Idle,
    Manual,
    Profile,
    Stopping,
}
