//! Profile store adapters.
//!
//! - [`JsonProfileStore`]: one pretty-printed JSON file holding the whole
//!   `name → profile` mapping.  Access is serialised by an internal mutex
//!   so a read-modify-write ([`ProfilePort::upsert`]) cannot lose updates.
//! - [`MemoryProfileStore`]: in-memory, for tests and simulation.
//!
//! Both are self-healing: unreadable content is replaced with an empty
//! mapping, and individual entries that are malformed or fail validation
//! are skipped.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::app::ports::ProfilePort;
use crate::error::StoreError;
use crate::profile::{Profile, ProfileMap};

// ── JSON file store ──────────────────────────────────────────

pub struct JsonProfileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // The guarded data is `()`, so a poisoned lock holds nothing stale.
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load_locked(&self) -> Result<ProfileMap, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("Profile store {} missing, creating", self.path.display());
                let empty = ProfileMap::new();
                self.save_locked(&empty)?;
                return Ok(empty);
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Profile store {} is not UTF-8, resetting", self.path.display());
                return self.reset_locked();
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<BTreeMap<String, Value>>(&text) {
            Ok(entries) => Ok(retain_valid(decode_entries(entries))),
            Err(e) => {
                warn!(
                    "Profile store {} is corrupt ({e}), resetting",
                    self.path.display()
                );
                self.reset_locked()
            }
        }
    }

    fn reset_locked(&self) -> Result<ProfileMap, StoreError> {
        let empty = ProfileMap::new();
        self.save_locked(&empty)?;
        Ok(empty)
    }

    fn save_locked(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        let bytes = to_pretty_json(profiles)?;
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        // Write-then-rename so a crash mid-save never truncates the store.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl ProfilePort for JsonProfileStore {
    fn load(&self) -> Result<ProfileMap, StoreError> {
        let _guard = self.guard();
        self.load_locked()
    }

    fn save(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        let _guard = self.guard();
        self.save_locked(profiles)
    }

    fn upsert(&self, profile: Profile) -> Result<(), StoreError> {
        let _guard = self.guard();
        let mut profiles = self.load_locked()?;
        profiles.insert(profile.name.clone(), profile);
        self.save_locked(&profiles)
    }
}

/// Serialise with a stable 4-space indent and trailing newline.
fn to_pretty_json(profiles: &ProfileMap) -> Result<Vec<u8>, StoreError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    profiles
        .serialize(&mut ser)
        .map_err(|_| StoreError::Encode)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Decode each entry on its own so one malformed profile cannot take the
/// rest of the store down with it.
fn decode_entries(entries: BTreeMap<String, Value>) -> ProfileMap {
    entries
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value::<Profile>(value) {
            Ok(profile) => Some((key, profile)),
            Err(e) => {
                warn!("Skipping profile '{}': {}", key, e);
                None
            }
        })
        .collect()
}

/// Drop entries that fail validation or whose key disagrees with the name.
fn retain_valid(mut profiles: ProfileMap) -> ProfileMap {
    profiles.retain(|key, profile| {
        if *key != profile.name {
            warn!("Skipping profile '{}': stored under key '{}'", profile.name, key);
            return false;
        }
        match profile.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping profile '{}': {}", key, e);
                false
            }
        }
    });
    profiles
}

// ── In-memory store ──────────────────────────────────────────

/// Profile store kept in memory.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RefCell<ProfileMap>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: RefCell::new(profiles.into_iter().map(|p| (p.name.clone(), p)).collect()),
        }
    }
}

impl ProfilePort for MemoryProfileStore {
    fn load(&self) -> Result<ProfileMap, StoreError> {
        Ok(self.profiles.borrow().clone())
    }

    fn save(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        *self.profiles.borrow_mut() = retain_valid(profiles.clone());
        Ok(())
    }
}
