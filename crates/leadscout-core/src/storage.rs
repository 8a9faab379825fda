//! The durable slot holding the saved-leads list.
//!
//! A slot is read once when the store opens and overwritten in full after
//! every saved-list mutation. Reads are infallible by contract: a missing or
//! unparseable slot is an empty list.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::StorageError;
use crate::lead::Lead;

/// A single named slot for the serialized saved-leads list.
pub trait LeadStorage {
    /// Load the saved list, or an empty list if the slot is absent or corrupt.
    fn load(&self) -> Vec<Lead>;

    /// Replace the slot contents with `leads`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the list cannot be serialized or written.
    fn persist(&self, leads: &[Lead]) -> Result<(), StorageError>;
}

/// Decode a stored blob, treating anything unparseable as empty.
fn decode_slot(raw: &str, origin: &str) -> Vec<Lead> {
    match serde_json::from_str::<Vec<Lead>>(raw) {
        Ok(leads) => leads,
        Err(e) => {
            tracing::warn!(slot = %origin, error = %e, "saved leads are unreadable; starting empty");
            Vec::new()
        }
    }
}

/// JSON file on disk.
///
/// Writes go to a sibling temp file that is then renamed over the slot, so a
/// crash mid-write leaves the previous list intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl LeadStorage for JsonFileStorage {
    fn load(&self) -> Vec<Lead> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => decode_slot(&raw, &self.path.display().to_string()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no saved leads file yet");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not read saved leads; starting empty"
                );
                Vec::new()
            }
        }
    }

    fn persist(&self, leads: &[Lead]) -> Result<(), StorageError> {
        let body = serde_json::to_string_pretty(leads)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let tmp = self.temp_path();
        std::fs::write(&tmp, body).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), count = leads.len(), "saved leads written");
        Ok(())
    }
}

/// In-process slot holding the serialized JSON string.
///
/// Round-trips go through serde exactly as the file slot does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with a raw blob (which need not be valid JSON).
    #[must_use]
    pub fn with_contents(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    /// Current raw slot contents.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl LeadStorage for MemoryStorage {
    fn load(&self) -> Vec<Lead> {
        self.contents()
            .map(|raw| decode_slot(&raw, "memory"))
            .unwrap_or_default()
    }

    fn persist(&self, leads: &[Lead]) -> Result<(), StorageError> {
        let body = serde_json::to_string(leads)?;
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::lead::BusinessListing;

    fn lead(name: &str) -> Lead {
        Lead::from_listing(
            BusinessListing {
                name: name.to_string(),
                phone: "555-0100".to_string(),
                address: "1 Elm St".to_string(),
                cuisine: String::new(),
                maps_url: "https://maps.google.com/?cid=9".to_string(),
            },
            "Boise, ID",
            Utc::now(),
        )
    }

    #[test]
    fn memory_storage_starts_empty() {
        assert!(MemoryStorage::new().load().is_empty());
    }

    #[test]
    fn memory_storage_corrupt_slot_loads_empty() {
        let storage = MemoryStorage::with_contents("{not json");
        assert!(storage.load().is_empty());
    }

    #[test]
    fn memory_storage_round_trips() {
        let storage = MemoryStorage::new();
        let mut leads = vec![lead("Taqueria Sol"), lead("Pho 88")];
        leads[0].called = true;
        leads[1].notes = "ask for owner, after 3pm".to_string();

        storage.persist(&leads).unwrap();
        assert_eq!(storage.load(), leads);
    }

    #[test]
    fn file_storage_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("absent.json"));
        assert!(storage.load().is_empty());
    }

    #[test]
    fn file_storage_round_trips_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("resto_leads.json");
        let storage = JsonFileStorage::new(&path);
        let leads = vec![lead("Casa Verde")];

        storage.persist(&leads).unwrap();

        assert!(path.exists());
        assert!(!storage.temp_path().exists());
        assert_eq!(storage.load(), leads);
    }

    #[test]
    fn file_storage_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resto_leads.json");
        std::fs::write(&path, "[{\"id\": 42}]").unwrap();
        assert!(JsonFileStorage::new(path).load().is_empty());
    }

    #[test]
    fn file_storage_overwrites_in_full() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("resto_leads.json"));

        storage.persist(&[lead("A"), lead("B")]).unwrap();
        let only = vec![lead("C")];
        storage.persist(&only).unwrap();

        assert_eq!(storage.load(), only);
    }
}
