//! Key/blob persistence behind an injectable port.
//!
//! Callers hand a [`PersistencePort`] to the helpers below; nothing in the
//! domain layer reaches for ambient storage on its own.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Error as SerdeError;
use tracing::{debug, warn};

use crate::domain::{EquipmentItem, EstimatorSettings, PersistedJob};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "PavingEstimator";
const APP_NAME: &str = "PavingEstimator";

pub const SAVED_JOB_KEY: &str = "saved-job";
pub const LAST_QUOTE_NUMBER_KEY: &str = "last-quote-number";
pub const SAVED_EQUIPMENT_KEY: &str = "saved-equipment";
pub const SETTINGS_KEY: &str = "settings";

/// Quote numbers start above this value.
pub const FIRST_QUOTE_BASE: u64 = 1000;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage directory unavailable")]
    StorageUnavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serde(#[from] SerdeError),
}

pub trait PersistencePort {
    /// Best effort: missing or unreadable entries come back as `None`.
    fn load(&self, key: &str) -> Option<Vec<u8>>;
    fn save(&self, key: &str, blob: &[u8]) -> Result<(), PersistError>;
}

/// One JSON file per key inside a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform config directory, e.g. `~/.config/PavingEstimator`.
    pub fn platform() -> Result<Self, PersistError> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
            .map(|dirs| Self::at(dirs.config_dir()))
            .ok_or(PersistError::StorageUnavailable)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|ch| {
                if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                    ch
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file}.json"))
    }
}

impl PersistencePort for FileStore {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(data) => Some(data),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read stored entry");
                None
            }
        }
    }

    fn save(&self, key: &str, blob: &[u8]) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        fs::write(&path, blob)?;
        debug!(path = %path.display(), bytes = blob.len(), "stored entry");
        Ok(())
    }
}

/// In-process store for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Vec<u8>>>,
}

impl PersistencePort for MemoryStore {
    fn load(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.borrow().get(key).cloned()
    }

    fn save(&self, key: &str, blob: &[u8]) -> Result<(), PersistError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), blob.to_vec());
        Ok(())
    }
}

pub fn load_json<T: DeserializeOwned>(port: &dyn PersistencePort, key: &str) -> Option<T> {
    let data = port.load(key)?;
    match serde_json::from_slice(&data) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(key, error = %err, "ignoring unreadable stored entry");
            None
        }
    }
}

pub fn save_json<T: Serialize + ?Sized>(
    port: &dyn PersistencePort,
    key: &str,
    value: &T,
) -> Result<(), PersistError> {
    let json = serde_json::to_vec_pretty(value)?;
    port.save(key, &json)
}

pub fn load_saved_job(port: &dyn PersistencePort) -> Option<PersistedJob> {
    load_json(port, SAVED_JOB_KEY)
}

pub fn save_job(port: &dyn PersistencePort, job: &PersistedJob) -> Result<(), PersistError> {
    save_json(port, SAVED_JOB_KEY, job)
}

/// Reserves and returns the next quote number, e.g. `Q-1001`.
pub fn next_quote_number(port: &dyn PersistencePort) -> Result<String, PersistError> {
    let last = load_json::<u64>(port, LAST_QUOTE_NUMBER_KEY).unwrap_or(FIRST_QUOTE_BASE);
    let next = last.max(FIRST_QUOTE_BASE) + 1;
    save_json(port, LAST_QUOTE_NUMBER_KEY, &next)?;
    Ok(format!("Q-{next}"))
}

pub fn load_saved_equipment(port: &dyn PersistencePort) -> Vec<EquipmentItem> {
    load_json(port, SAVED_EQUIPMENT_KEY).unwrap_or_default()
}

pub fn save_saved_equipment(
    port: &dyn PersistencePort,
    items: &[EquipmentItem],
) -> Result<(), PersistError> {
    save_json(port, SAVED_EQUIPMENT_KEY, items)
}

pub fn load_settings(port: &dyn PersistencePort) -> EstimatorSettings {
    load_json(port, SETTINGS_KEY).unwrap_or_default()
}

pub fn save_settings(
    port: &dyn PersistencePort,
    settings: &EstimatorSettings,
) -> Result<(), PersistError> {
    save_json(port, SETTINGS_KEY, settings)
}
