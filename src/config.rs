//! Roaster configuration parameters
//!
//! All tunable parameters for the control core.  Loaded from a JSON file
//! at startup; every field falls back to its default when absent.

use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core roaster configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoasterConfig {
    // --- Timing ---
    /// Sample/control tick period (milliseconds)
    pub tick_interval_ms: u32,

    // --- Control ---
    /// Width of the turn-on band below target (degrees F)
    pub hysteresis_band_f: f64,
    /// Highest target a client may request (degrees F)
    pub max_target_f: f64,

    // --- Storage ---
    /// Profile store backing file
    pub profiles_path: PathBuf,
}

impl Default for RoasterConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 2000,
            hysteresis_band_f: 5.0,
            max_target_f: 600.0,
            profiles_path: PathBuf::from("profiles.json"),
        }
    }
}

impl RoasterConfig {
    /// Load from `path`.  A missing file yields the defaults; an
    /// unparseable or out-of-range file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config {} not found, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Self =
            serde_json::from_str(&text).map_err(|e| ConfigError::Corrupted(e.to_string()))?;
        config.validate()?;
        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Range-check every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(100..=60_000).contains(&self.tick_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "tick_interval_ms must be 100–60000",
            ));
        }
        if !(self.hysteresis_band_f.is_finite() && (0.5..=50.0).contains(&self.hysteresis_band_f))
        {
            return Err(ConfigError::ValidationFailed(
                "hysteresis_band_f must be 0.5–50.0",
            ));
        }
        if !(self.max_target_f.is_finite() && (100.0..=1000.0).contains(&self.max_target_f)) {
            return Err(ConfigError::ValidationFailed(
                "max_target_f must be 100.0–1000.0",
            ));
        }
        if self.profiles_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed("profiles_path must not be empty"));
        }
        Ok(())
    }

    pub fn tick_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(u64::from(self.tick_interval_ms))
    }
}
