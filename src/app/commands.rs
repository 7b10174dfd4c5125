//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (web routes,
//! the serial console, tests) that the
//! [`RoastService`](super::service::RoastService) interprets and acts upon.
//! Replies are the synchronous acknowledgment; effects on the heater play
//! out over the following ticks.

use serde::Serialize;

use crate::error::RoastError;
use crate::profile::Profile;
use crate::session::RoastSample;
use crate::units::Fahrenheit;

use super::events::SessionStatus;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum RoastCommand {
    /// Begin a manual session with no target.
    StartManual,

    /// Change the manual target; applies on the next tick.
    SetTarget(Fahrenheit),

    /// End any session and force the heater off.  Idempotent.
    Stop,

    /// Persist the current/most recent roast log as a profile.
    SaveProfile(String),

    /// Names of all stored profiles.
    ListProfiles,

    /// Start replaying a stored profile.
    RunProfile(String),

    /// Snapshot of the session.
    Status,

    /// Samples recorded by the current/most recent session.
    GetLog,
}

impl RoastCommand {
    /// Map a transport route and its single form field to a command.
    ///
    /// | route             | field            |
    /// |-------------------|------------------|
    /// | `start-manual`    | (none)           |
    /// | `set-temperature` | integer target   |
    /// | `stop`            | (none)           |
    /// | `save-profile`    | profile name     |
    /// | `list-profiles`   | (none)           |
    /// | `run-profile`     | profile name     |
    /// | `status`          | (none)           |
    /// | `log`             | (none)           |
    pub fn parse(route: &str, param: Option<&str>) -> Result<Self, RoastError> {
        let param = param.map(str::trim).filter(|p| !p.is_empty());
        match route {
            "start-manual" => Ok(Self::StartManual),
            "set-temperature" => {
                let raw = param.ok_or(RoastError::MissingParameter("temperature"))?;
                let degrees: i32 = raw
                    .parse()
                    .map_err(|_| RoastError::InvalidParameter("temperature must be an integer"))?;
                Ok(Self::SetTarget(Fahrenheit::from(degrees)))
            }
            "stop" => Ok(Self::Stop),
            "save-profile" => param
                .map(|name| Self::SaveProfile(name.to_owned()))
                .ok_or(RoastError::MissingParameter("profile_name")),
            "list-profiles" => Ok(Self::ListProfiles),
            "run-profile" => param
                .map(|name| Self::RunProfile(name.to_owned()))
                .ok_or(RoastError::MissingParameter("profile_name")),
            "status" => Ok(Self::Status),
            "log" => Ok(Self::GetLog),
            other => Err(RoastError::UnknownCommand(other.to_owned())),
        }
    }
}

/// Successful command outcomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum CommandReply {
    ManualStarted,
    TargetSet { target: Fahrenheit },
    Stopped,
    ProfileSaved { profile: Profile },
    Profiles { names: Vec<String> },
    ProfileStarted { name: String },
    Status(SessionStatus),
    Log { samples: Vec<RoastSample> },
}
