//! Storage backends for the field store
//!
//! A backend is a flat map from string keys to JSON values. The field store
//! does all read-modify-write logic on top of it, so backends only need to
//! load and persist whole records.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use super::error::StoreError;

/// Raw record storage
pub trait Backend {
    /// Read the record stored under `key`
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing any previous record
    fn write(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

/// Backend holding records in process memory
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    records: BTreeMap<String, Value>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.records.insert(key.to_string(), value);
        Ok(())
    }
}

/// Backend persisting every record in a single JSON document on disk.
///
/// The file is read once on open and rewritten in full on each write. A
/// missing file is an empty store.
#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    records: BTreeMap<String, Value>,
}

impl JsonFileBackend {
    /// Open the store at `path`, creating nothing until the first write
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), records = records.len(), "opened store");
        Ok(Self { path, records })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        let result = self
            .write_to(&tmp)
            .and_then(|()| fs::rename(&tmp, &self.path).map_err(StoreError::from));
        if result.is_err() {
            if let Err(e) = fs::remove_file(&tmp) {
                debug!(path = %tmp.display(), error = %e, "could not remove temp file");
            }
        }
        result
    }

    fn write_to(&self, path: &Path) -> Result<(), StoreError> {
        let mut file = fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, &self.records)?;
        file.write_all(b"\n")?;
        file.sync_all()?;
        Ok(())
    }
}

impl Backend for JsonFileBackend {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let previous = self.records.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            // Keep memory consistent with what is on disk.
            match previous {
                Some(v) => self.records.insert(key.to_string(), v),
                None => self.records.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }
}
