//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ RoastService (domain)
//! ```
//!
//! Driven adapters (thermocouple, heater relay, event sinks, profile
//! storage, clock) implement these traits.  The
//! [`RoastService`](super::service::RoastService) consumes them via
//! generics, so the domain core never touches hardware directly.

use std::time::Duration;

use crate::error::{ActuatorError, SensorError, StoreError};
use crate::profile::{Profile, ProfileMap};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one thermocouple conversion per call.
pub trait SensorPort {
    /// Temperature in the converter's native unit (Celsius).
    fn read_celsius(&mut self) -> Result<f64, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Heater port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: drive the heater relay.
pub trait HeaterPort {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → transport / logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`RoastEvent`](super::events::RoastEvent)s
/// through this port.  Adapters decide where they go (serial log, web
/// socket, subscriber queues).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::RoastEvent);
}

// ───────────────────────────────────────────────────────────────
// Profile store port (driven adapter: domain ↔ persistent profiles)
// ───────────────────────────────────────────────────────────────

/// Loads and persists the whole profile mapping.
///
/// `load` is self-healing: unreadable *content* yields an empty mapping
/// and resets the backing store; only backend I/O failures are errors.
/// `save` rewrites the complete mapping.
pub trait ProfilePort {
    fn load(&self) -> Result<ProfileMap, StoreError>;

    fn save(&self, profiles: &ProfileMap) -> Result<(), StoreError>;

    /// Insert or replace one profile by name.
    ///
    /// Stores shared between threads override this to hold their lock
    /// across the read-modify-write.
    fn upsert(&self, profile: Profile) -> Result<(), StoreError> {
        let mut profiles = self.load()?;
        profiles.insert(profile.name.clone(), profile);
        self.save(&profiles)
    }
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic time since an arbitrary origin.
pub trait TimePort {
    fn uptime(&self) -> Duration;
}

// Blanket impls so callers can lend ports by reference.

impl<T: SensorPort + ?Sized> SensorPort for &mut T {
    fn read_celsius(&mut self) -> Result<f64, SensorError> {
        (**self).read_celsius()
    }
}

impl<T: HeaterPort + ?Sized> HeaterPort for &mut T {
    fn set_heater(&mut self, on: bool) -> Result<(), ActuatorError> {
        (**self).set_heater(on)
    }
}

impl<T: EventSink + ?Sized> EventSink for &mut T {
    fn emit(&mut self, event: &super::events::RoastEvent) {
        (**self).emit(event);
    }
}

impl<T: ProfilePort + ?Sized> ProfilePort for &T {
    fn load(&self) -> Result<ProfileMap, StoreError> {
        (**self).load()
    }

    fn save(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        (**self).save(profiles)
    }

    fn upsert(&self, profile: Profile) -> Result<(), StoreError> {
        (**self).upsert(profile)
    }
}
