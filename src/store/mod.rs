//! Persistent field store
//!
//! The store keeps the ordered field list under the `layout` key together
//! with a bounded undo history, and opaque string records (such as the raw
//! template) under any other key.
//!
//! Every operation runs under a single lock around the backend, so a bulk
//! [`FieldStore::save_layout`] and a targeted [`FieldStore::update_field`]
//! issued from different threads are applied one after the other and never
//! overwrite each other's result.
//!
//! # Example
//!
//! ```rust
//! use template_editor::store::{Field, FieldStore};
//!
//! let store = FieldStore::in_memory();
//! assert!(store.get_all().unwrap().is_empty());
//!
//! store.save_layout(vec![Field::new("Name", "NAME")]).unwrap();
//! assert_eq!(store.get_all().unwrap().len(), 1);
//! ```

mod backend;
mod error;
mod layout;

pub use backend::{Backend, JsonFileBackend, MemoryBackend};
pub use error::StoreError;
pub use layout::{Field, History, Layout, HISTORY_LIMIT};

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use tracing::{debug, info};

/// Key of the layout record
pub const LAYOUT_KEY: &str = "layout";

/// Key of the raw template record
pub const TEMPLATE_KEY: &str = "template";

/// Field layout and string record storage over a [`Backend`]
#[derive(Debug)]
pub struct FieldStore<B = MemoryBackend> {
    backend: Mutex<B>,
}

impl FieldStore<MemoryBackend> {
    /// Create a store that lives only in memory
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl FieldStore<JsonFileBackend> {
    /// Open a store persisted to a JSON file
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self::new(JsonFileBackend::open(path)?))
    }
}

impl<B: Backend> FieldStore<B> {
    /// Wrap a backend
    pub fn new(backend: B) -> Self {
        Self {
            backend: Mutex::new(backend),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, B>, StoreError> {
        self.backend.lock().map_err(|_| StoreError::Poisoned)
    }

    fn read_layout(backend: &B) -> Result<Option<Layout>, StoreError> {
        match backend.read(LAYOUT_KEY)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn write_layout(backend: &mut B, layout: &Layout) -> Result<(), StoreError> {
        backend.write(LAYOUT_KEY, serde_json::to_value(layout)?)
    }

    /// Current field list, empty when no layout has been saved
    pub fn get_all(&self) -> Result<Vec<Field>, StoreError> {
        let backend = self.lock()?;
        Ok(Self::read_layout(&backend)?
            .map(|layout| layout.fields)
            .unwrap_or_default())
    }

    /// The whole layout record, including history
    pub fn layout(&self) -> Result<Option<Layout>, StoreError> {
        let backend = self.lock()?;
        Self::read_layout(&backend)
    }

    /// Replace the field list, pushing the previous list onto history
    pub fn save_layout(&self, fields: Vec<Field>) -> Result<(), StoreError> {
        let mut backend = self.lock()?;
        let mut layout = Self::read_layout(&backend)?.unwrap_or_default();
        layout.replace_fields(fields);
        Self::write_layout(&mut backend, &layout)?;
        debug!(
            fields = layout.fields.len(),
            history = layout.history.len(),
            "saved layout"
        );
        Ok(())
    }

    /// Overwrite the field bound to the same variable.
    ///
    /// Returns `Ok(false)` without writing when no field matches, and
    /// [`StoreError::LayoutNotFound`] when no layout exists at all.
    pub fn update_field(&self, field: Field) -> Result<bool, StoreError> {
        let mut backend = self.lock()?;
        let mut layout = Self::read_layout(&backend)?.ok_or(StoreError::LayoutNotFound)?;
        let variable = field.bind_to_variable.clone();
        if !layout.update_field(field) {
            debug!(variable = %variable, "no field bound to variable");
            return Ok(false);
        }
        Self::write_layout(&mut backend, &layout)?;
        debug!(variable = %variable, "updated field");
        Ok(true)
    }

    /// Restore the most recent history entry and return it
    pub fn undo(&self) -> Result<Option<Vec<Field>>, StoreError> {
        let mut backend = self.lock()?;
        let Some(mut layout) = Self::read_layout(&backend)? else {
            return Ok(None);
        };
        let restored = match layout.undo() {
            Some(fields) => fields.to_vec(),
            None => return Ok(None),
        };
        Self::write_layout(&mut backend, &layout)?;
        info!(
            fields = restored.len(),
            remaining = layout.history.len(),
            "restored previous layout"
        );
        Ok(Some(restored))
    }

    /// Read an opaque string record
    pub fn get(&self, key: &str) -> Result<String, StoreError> {
        let backend = self.lock()?;
        match backend.read(key)? {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(StoreError::invalid_record(key, "a string")),
            None => Err(StoreError::not_found(key)),
        }
    }

    /// Store an opaque string record
    pub fn put(&self, key: &str, value: impl Into<String>) -> Result<(), StoreError> {
        let mut backend = self.lock()?;
        backend.write(key, Value::String(value.into()))
    }
}
