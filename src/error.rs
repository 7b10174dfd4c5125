//! Unified error types for the roaster control core.
//!
//! A single [`RoastError`] is what command handlers hand back to the
//! transport layer.  Hardware-facing errors ([`SensorError`],
//! [`ActuatorError`]) are `Copy` so they can travel through the tick path
//! without allocation.  Only the command-facing variants carry owned data.

use core::fmt;

// ---------------------------------------------------------------------------
// Command-level error
// ---------------------------------------------------------------------------

/// Every rejected command funnels into this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoastError {
    /// `run-profile` named a profile that is not in the store.
    ProfileNotFound(String),
    /// `save-profile` with no recorded (measured) samples.
    EmptyLog,
    /// A required request field was absent or blank.
    MissingParameter(&'static str),
    /// A request field was present but unusable.
    InvalidParameter(&'static str),
    /// `set-temperature` outside a manual session.
    NotInManualMode,
    /// The transport asked for a route this core does not serve.
    UnknownCommand(String),
    /// Profile persistence failed.
    Store(StoreError),
    /// The control thread is gone or its command queue is full.
    Unavailable,
}

impl fmt::Display for RoastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProfileNotFound(name) => write!(f, "profile not found: {name}"),
            Self::EmptyLog => write!(f, "no roasting data to save"),
            Self::MissingParameter(field) => write!(f, "missing parameter: {field}"),
            Self::InvalidParameter(why) => write!(f, "invalid parameter: {why}"),
            Self::NotInManualMode => write!(f, "target can only be set in manual mode"),
            Self::UnknownCommand(route) => write!(f, "unknown command: {route}"),
            Self::Store(e) => write!(f, "profile store: {e}"),
            Self::Unavailable => write!(f, "controller unavailable"),
        }
    }
}

impl std::error::Error for RoastError {}

impl From<StoreError> for RoastError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

/// Why a temperature sample could not be taken.  Always transient from the
/// control loop's point of view: the tick records "no measurement".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// Thermocouple wire is disconnected.
    OpenCircuit,
    /// Thermocouple shorted to ground.
    ShortToGround,
    /// Thermocouple shorted to supply.
    ShortToVcc,
    /// The bus transfer to the converter failed.
    Bus,
    /// The converter returned a value that is not a temperature.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenCircuit => write!(f, "thermocouple open circuit"),
            Self::ShortToGround => write!(f, "thermocouple shorted to GND"),
            Self::ShortToVcc => write!(f, "thermocouple shorted to VCC"),
            Self::Bus => write!(f, "SPI transfer failed"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl std::error::Error for SensorError {}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// Relay GPIO write failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl std::error::Error for ActuatorError {}

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors from the profile store backend.  Corrupt content is *not* an
/// error: the store resets itself and reports an empty mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io(std::io::ErrorKind),
    /// The mapping could not be serialised.
    Encode,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(kind) => write!(f, "I/O error: {kind}"),
            Self::Encode => write!(f, "encoding failed"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.kind())
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but is not valid JSON for [`RoasterConfig`](crate::config::RoasterConfig).
    Corrupted(String),
    /// A field failed range validation.
    ValidationFailed(&'static str),
    /// The config file could not be read.
    Io(std::io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted(why) => write!(f, "config corrupted: {why}"),
            Self::ValidationFailed(why) => write!(f, "config invalid: {why}"),
            Self::Io(e) => write!(f, "config I/O: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias for command handling.
pub type Result<T> = core::result::Result<T, RoastError>;
