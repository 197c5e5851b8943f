//! Key-value storage for per-tab capture sequences.
//!
//! Keys are `captures:<tabId>` (see [`crate::tab::TabId::storage_key`]); each
//! value is the ordered capture sequence of that tab. The store is what the
//! presentation side reads, so the registry writes through to it on every
//! change.

mod file;
mod memory;

use std::path::PathBuf;

use thiserror::Error;

use crate::capture::Capture;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Storage-layer failure. The capture core logs and swallows these.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store data at {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("store lock poisoned")]
    Poisoned,
}

/// Storage backend for capture sequences.
pub trait CaptureStore: Send + Sync {
    /// Sequence stored under `key`, or `None` if the key is absent.
    fn load(&self, key: &str) -> Result<Option<Vec<Capture>>, StoreError>;

    /// Replace the sequence stored under `key`.
    fn save(&self, key: &str, captures: &[Capture]) -> Result<(), StoreError>;

    /// Delete `key`. Deleting an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// All keys currently present, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}
