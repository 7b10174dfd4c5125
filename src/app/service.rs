//! Application service: the hexagonal core.
//!
//! [`RoastService`] owns the session state machine, the roast log, the
//! hysteresis controller and the heater actuator.  It is the single
//! authority over all of them: commands and ticks are the only way in.
//! All I/O flows through port traits, making the entire service testable
//! with mock adapters and an injected clock (`now` arguments).
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │         RoastService          │
//!  HeaterPort ◀── │ Session · Hysteresis · Log    │ ◀─▶ ProfilePort
//!                 └──────────────────────────────┘
//! ```

use std::time::Duration;

use log::{debug, error, info, warn};

use crate::config::RoasterConfig;
use crate::control::hysteresis::HysteresisController;
use crate::drivers::heater::HeaterActuator;
use crate::error::{ActuatorError, Result, RoastError};
use crate::profile::{Profile, derive_steps};
use crate::sensors::SensorReader;
use crate::session::{RoastLog, RoastSample, SessionState};
use crate::units::{Fahrenheit, round2};

use super::commands::{CommandReply, RoastCommand};
use super::events::{RoastEvent, SessionStatus};
use super::ports::{EventSink, HeaterPort, ProfilePort, SensorPort};

// ───────────────────────────────────────────────────────────────
// RoastService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct RoastService<S, H> {
    sensor: SensorReader<S>,
    heater: HeaterActuator<H>,
    controller: HysteresisController,
    state: SessionState,
    /// Current or most recent session's samples.
    log: RoastLog,
    /// Uptime at which the current session began.
    session_started_at: Duration,
    last_temperature: Option<Fahrenheit>,
    max_target: Fahrenheit,
    tick_count: u64,
}

impl<S: SensorPort, H: HeaterPort> RoastService<S, H> {
    /// Construct an idle service; the heater relay is assumed off.
    pub fn new(config: &RoasterConfig, sensor: S, heater: H) -> Self {
        Self {
            sensor: SensorReader::new(sensor),
            heater: HeaterActuator::new(heater),
            controller: HysteresisController::new(config.hysteresis_band_f),
            state: SessionState::Idle,
            log: RoastLog::new(),
            session_started_at: Duration::ZERO,
            last_temperature: None,
            max_target: Fahrenheit(config.max_target_f),
            tick_count: 0,
        }
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one cycle: (profile step bookkeeping) → sample → decide →
    /// actuate → log → publish.
    ///
    /// While idle this is passive telemetry only: sample and publish.  The
    /// tick that completes a profile is idle by the time it samples.
    pub fn tick(&mut self, now: Duration, sink: &mut impl EventSink) {
        self.tick_count += 1;

        self.advance_profile(now, sink);

        let temperature = self.sensor.sample().ok();
        self.last_temperature = temperature;

        if self.state.is_active() {
            let desired =
                self.controller
                    .decide(temperature, self.state.target(), self.heater.is_on());

            if let Err(e) = self.apply_heater(desired, sink) {
                error!("Heater write failed ({e}), stopping session");
                self.stop(sink);
            } else {
                let elapsed = round2(now.saturating_sub(self.session_started_at).as_secs_f64());
                self.log.push(RoastSample {
                    elapsed_seconds: elapsed,
                    temperature,
                });
                debug!(
                    "{:>8.2}s | temp={:?} | target={:?} | heater={}",
                    elapsed,
                    temperature.map(Fahrenheit::degrees),
                    self.state.target().map(Fahrenheit::degrees),
                    if self.heater.is_on() { "ON" } else { "OFF" },
                );
            }
        } else if self.heater.is_on() {
            // A failed off-command left the relay energised; keep trying.
            self.force_heater_off(sink);
        }

        sink.emit(&RoastEvent::TemperatureUpdate { temperature });
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command.  The reply is the synchronous
    /// acknowledgment; rejected commands leave the session untouched.
    pub fn handle_command(
        &mut self,
        cmd: RoastCommand,
        now: Duration,
        store: &impl ProfilePort,
        sink: &mut impl EventSink,
    ) -> Result<CommandReply> {
        debug!("Command: {:?}", cmd);
        match cmd {
            RoastCommand::StartManual => {
                self.start_manual(now, sink);
                Ok(CommandReply::ManualStarted)
            }
            RoastCommand::SetTarget(target) => {
                let target = self.set_target(target)?;
                Ok(CommandReply::TargetSet { target })
            }
            RoastCommand::Stop => {
                self.stop(sink);
                Ok(CommandReply::Stopped)
            }
            RoastCommand::SaveProfile(name) => {
                let profile = self.save_profile(&name, store)?;
                Ok(CommandReply::ProfileSaved { profile })
            }
            RoastCommand::ListProfiles => Ok(CommandReply::Profiles {
                names: self.list_profiles(store)?,
            }),
            RoastCommand::RunProfile(name) => {
                self.start_profile(&name, now, store, sink)?;
                Ok(CommandReply::ProfileStarted { name })
            }
            RoastCommand::Status => Ok(CommandReply::Status(self.status())),
            RoastCommand::GetLog => Ok(CommandReply::Log {
                samples: self.log.samples().to_vec(),
            }),
        }
    }

    /// Begin a manual session with no target; any running session ends first.
    pub fn start_manual(&mut self, now: Duration, sink: &mut impl EventSink) {
        self.begin_session(now, SessionState::Manual { target: None }, sink);
    }

    /// Update the in-flight manual target.  Takes effect on the next tick.
    pub fn set_target(&mut self, target: Fahrenheit) -> Result<Fahrenheit> {
        if !target.is_valid_target() || target > self.max_target {
            return Err(RoastError::InvalidParameter("target out of range"));
        }
        match &mut self.state {
            SessionState::Manual { target: current } => {
                *current = Some(target);
                info!("Target temperature set to {}", target);
                Ok(target)
            }
            _ => Err(RoastError::NotInManualMode),
        }
    }

    /// Start replaying the stored profile `name`.
    pub fn start_profile(
        &mut self,
        name: &str,
        now: Duration,
        store: &impl ProfilePort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        let profile = store
            .load()?
            .remove(name)
            .ok_or_else(|| RoastError::ProfileNotFound(name.to_owned()))?;
        profile.validate()?;

        info!(
            "Running profile '{}' ({} steps, {:.0}s)",
            profile.name,
            profile.steps.len(),
            profile.total_duration_seconds()
        );
        let first = profile.steps.first().copied();
        self.begin_session(
            now,
            SessionState::ProfileRunning {
                profile,
                step_index: 0,
                step_started_at: now,
            },
            sink,
        );
        if let Some(step) = first {
            Self::announce_step(0, step.target_temperature, step.duration_seconds, sink);
        }
        // Zero-length steps (or an empty profile) resolve immediately.
        self.advance_profile(now, sink);
        Ok(())
    }

    /// End any session, heater off, target cleared.  No-op when idle.
    pub fn stop(&mut self, sink: &mut impl EventSink) {
        let was_active = self.state.is_active();
        self.state = SessionState::Stopping;
        self.force_heater_off(sink);
        self.state = SessionState::Idle;

        if was_active {
            info!("Roasting stopped ({} samples logged)", self.log.len());
            sink.emit(&RoastEvent::SessionStopped);
        }
    }

    /// Store the current/most recent roast as profile `name`.
    pub fn save_profile(&mut self, name: &str, store: &impl ProfilePort) -> Result<Profile> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoastError::MissingParameter("profile_name"));
        }
        if self.log.is_empty() {
            return Err(RoastError::EmptyLog);
        }

        if !self.log.has_measurements() {
            warn!("Roast log has {} samples but no measurements", self.log.len());
            return Err(RoastError::EmptyLog);
        }

        let steps = derive_steps(self.log.samples());
        if steps.is_empty() {
            return Err(RoastError::EmptyLog);
        }

        let profile = Profile {
            name: name.to_owned(),
            steps,
        };
        store.upsert(profile.clone())?;
        info!(
            "Profile '{}' saved ({} steps from {} samples)",
            profile.name,
            profile.steps.len(),
            self.log.len()
        );
        Ok(profile)
    }

    /// Stored profile names, sorted.
    pub fn list_profiles(&self, store: &impl ProfilePort) -> Result<Vec<String>> {
        Ok(store.load()?.into_keys().collect())
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn status(&self) -> SessionStatus {
        let (profile, step_index) = match &self.state {
            SessionState::ProfileRunning {
                profile,
                step_index,
                ..
            } => (Some(profile.name.clone()), Some(*step_index)),
            _ => (None, None),
        };
        SessionStatus {
            mode: self.state.mode(),
            target: self.state.target(),
            profile,
            step_index,
            heater_on: self.heater.is_on(),
            last_temperature: self.last_temperature,
            samples: self.log.len(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn log(&self) -> &RoastLog {
        &self.log
    }

    pub fn heater_on(&self) -> bool {
        self.heater.is_on()
    }

    /// Total ticks executed since construction.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn heater_port(&self) -> &H {
        self.heater.port()
    }

    // ── Internal ──────────────────────────────────────────────

    fn begin_session(&mut self, now: Duration, state: SessionState, sink: &mut impl EventSink) {
        if self.state.is_active() {
            info!("Cancelling {:?} session", self.state.mode());
            self.stop(sink);
        }
        self.log.reset();
        self.session_started_at = now;

        let mode = state.mode();
        self.state = state;
        info!("{:?} session started", mode);
        sink.emit(&RoastEvent::SessionStarted { mode });
    }

    /// Step bookkeeping for a running profile.
    fn advance_profile(&mut self, now: Duration, sink: &mut impl EventSink) {
        loop {
            let SessionState::ProfileRunning {
                profile,
                step_index,
                step_started_at,
            } = &mut self.state
            else {
                return;
            };

            let Some(step) = profile.steps.get(*step_index) else {
                let name = profile.name.clone();
                self.finish_profile(name, sink);
                return;
            };

            let in_step = now.saturating_sub(*step_started_at).as_secs_f64();
            if in_step < step.duration_seconds {
                return;
            }

            *step_index += 1;
            *step_started_at = now;
            if let Some(next) = profile.steps.get(*step_index) {
                Self::announce_step(
                    *step_index,
                    next.target_temperature,
                    next.duration_seconds,
                    sink,
                );
            }
        }
    }

    fn announce_step(
        index: usize,
        target: Fahrenheit,
        duration_seconds: f64,
        sink: &mut impl EventSink,
    ) {
        info!("Step {}: target {} for {}s", index, target, duration_seconds);
        sink.emit(&RoastEvent::StepStarted {
            index,
            target,
            duration_seconds,
        });
    }

    fn finish_profile(&mut self, name: String, sink: &mut impl EventSink) {
        self.state = SessionState::Stopping;
        self.force_heater_off(sink);
        self.state = SessionState::Idle;
        info!("Profile '{}' completed", name);
        sink.emit(&RoastEvent::ProfileComplete { name });
    }

    /// Command the relay and publish the change, if any.
    fn apply_heater(
        &mut self,
        desired: bool,
        sink: &mut impl EventSink,
    ) -> core::result::Result<(), ActuatorError> {
        if let Some(transition) = self.heater.set(desired)? {
            sink.emit(&RoastEvent::HeaterChanged {
                heater_on: transition.to,
            });
        }
        Ok(())
    }

    fn force_heater_off(&mut self, sink: &mut impl EventSink) {
        if let Err(e) = self.apply_heater(false, sink) {
            error!("Heater off command failed: {e}");
        }
    }
}
