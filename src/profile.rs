//! Roast profiles: named, ordered plans of (target, duration) steps.
//!
//! Saved profiles always use the step schema
//! `{"target_temperature": f64, "duration_seconds": f64}`.  A recorded
//! roast is turned into steps by [`derive_steps`] rather than stored as
//! raw samples, so replaying it holds each plateau for as long as the
//! original roast did.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::RoastError;
use crate::session::RoastSample;
use crate::units::{Fahrenheit, round2};

/// Profile name → profile.  Ordered so the store file and listings are stable.
pub type ProfileMap = BTreeMap<String, Profile>;

/// Hold `target_temperature` for `duration_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub target_temperature: Fahrenheit,
    pub duration_seconds: f64,
}

impl Step {
    /// Build a validated step: finite positive target, finite non-negative duration.
    pub fn new(target_temperature: Fahrenheit, duration_seconds: f64) -> Result<Self, RoastError> {
        let step = Self {
            target_temperature,
            duration_seconds,
        };
        step.validate()?;
        Ok(step)
    }

    pub fn validate(&self) -> Result<(), RoastError> {
        if !self.target_temperature.is_valid_target() {
            return Err(RoastError::InvalidParameter(
                "step target must be finite and positive",
            ));
        }
        if !(self.duration_seconds.is_finite() && self.duration_seconds >= 0.0) {
            return Err(RoastError::InvalidParameter(
                "step duration must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub steps: Vec<Step>,
}

impl Profile {
    pub fn validate(&self) -> Result<(), RoastError> {
        if self.name.trim().is_empty() {
            return Err(RoastError::MissingParameter("profile_name"));
        }
        self.steps.iter().try_for_each(Step::validate)
    }

    /// Sum of all step durations.
    pub fn total_duration_seconds(&self) -> f64 {
        self.steps.iter().map(|s| s.duration_seconds).sum()
    }
}

/// Run-length encode a roast log into replayable steps.
///
/// Consecutive measured samples that round to the same whole degree form
/// one step, lasting until the next run begins (the final run lasts until
/// the last sample).  Faulted samples extend the current run.  Runs whose
/// target is not a valid control target are dropped.
pub fn derive_steps(samples: &[RoastSample]) -> Vec<Step> {
    struct Run {
        target: f64,
        started: f64,
    }

    fn close(run: &Run, until: f64, steps: &mut Vec<Step>) {
        let step = Step {
            target_temperature: Fahrenheit(run.target),
            duration_seconds: round2((until - run.started).max(0.0)),
        };
        if step.validate().is_err() {
            return;
        }
        // Dropped runs can leave equal neighbours behind.
        match steps.last_mut() {
            Some(prev) if prev.target_temperature == step.target_temperature => {
                prev.duration_seconds = round2(prev.duration_seconds + step.duration_seconds);
            }
            _ => steps.push(step),
        }
    }

    let mut steps: Vec<Step> = Vec::new();
    let mut current: Option<Run> = None;

    for sample in samples {
        let Some(temp) = sample.temperature else {
            continue;
        };
        let target = temp.degrees().round();
        if current.as_ref().is_some_and(|run| run.target == target) {
            continue;
        }
        if let Some(run) = current.take() {
            close(&run, sample.elapsed_seconds, &mut steps);
        }
        current = Some(Run {
            target,
            started: sample.elapsed_seconds,
        });
    }

    if let (Some(run), Some(last)) = (current, samples.last()) {
        close(&run, last.elapsed_seconds, &mut steps);
    }

    steps
}
