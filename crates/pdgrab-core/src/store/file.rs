//! JSON file store under the XDG state dir so captures outlive one process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Result;

use crate::capture::Capture;

use super::{CaptureStore, StoreError};

type Entries = BTreeMap<String, Vec<Capture>>;

/// Temp file suffix used before the atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// All keys live in a single JSON object file. Every write goes to a `.part`
/// sibling that is renamed over the file, so readers never see a torn write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Default path: `~/.local/state/pdgrab/captures.json`.
    pub fn default_path() -> Result<PathBuf> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("pdgrab")?;
        Ok(xdg_dirs.get_state_home().join("pdgrab").join("captures.json"))
    }

    /// Open a store at `path`. The file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the temp file written before each rename.
    pub fn temp_path(&self) -> PathBuf {
        let mut o = self.path.as_os_str().to_owned();
        o.push(TEMP_SUFFIX);
        PathBuf::from(o)
    }

    fn read_entries(&self) -> Result<Entries, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Entries::new());
        }
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &Entries) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_vec_pretty(entries).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        let temp_path = self.temp_path();
        std::fs::write(&temp_path, json).map_err(|source| StoreError::Io {
            path: temp_path.clone(),
            source,
        })?;
        std::fs::rename(&temp_path, &self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl CaptureStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Vec<Capture>>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read_entries()?.remove(key))
    }

    fn save(&self, key: &str, captures: &[Capture]) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), captures.to_vec());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(self.read_entries()?.into_keys().collect())
    }
}
