//! Form/field synchronization
//!
//! [`TemplateForm`] owns the field list shown as form inputs. It keeps each
//! input flagged as satisfied or missing relative to the variables the
//! template references, and persists every change through a
//! [`FieldStore`].
//!
//! Structural edits (add, remove, reorder, edit, clear) rebuild the inputs
//! and save the whole layout. Live value edits go through
//! [`TemplateForm::set_input_value`], which patches a single field with
//! [`FieldStore::update_field`]. Either way the stored field list ends up
//! equal to [`TemplateForm::fields`].

mod input;

pub use input::{FieldEdit, FormInput, InputStatus};

use std::collections::HashMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::store::{Backend, Field, FieldStore, StoreError};

/// Errors that can occur while editing the form
#[derive(Debug, Error)]
pub enum FormError {
    /// Field position outside the current list
    #[error("field index {index} out of range (form has {len} fields)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Persisting the change failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fields used when nothing has been stored yet
pub fn default_fields() -> Vec<Field> {
    vec![
        Field::new("Name", "NAME").with_value("George Costanza"),
        Field::new("Message", "MESSAGE").with_value("All your base are belong to..."),
        Field::new("Base Owner", "OWNER").with_placeholder("You, me, them, us..."),
    ]
}

/// Field added by [`TemplateForm::add_field`]
pub fn new_field() -> Field {
    Field::new("New Field", "NEW_VARIABLE")
        .with_value("")
        .with_placeholder("")
}

/// Form of inputs bound to template variables
#[derive(Debug, Clone)]
pub struct TemplateForm {
    fields: Vec<Field>,
    inputs: Vec<FormInput>,
    template_variables: Vec<String>,
    defaults: Vec<Field>,
}

impl Default for TemplateForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateForm {
    /// Create an empty form using the built-in default fields
    pub fn new() -> Self {
        Self::with_defaults(default_fields())
    }

    /// Create an empty form with custom fallback fields
    pub fn with_defaults(defaults: Vec<Field>) -> Self {
        Self {
            fields: Vec::new(),
            inputs: Vec::new(),
            template_variables: Vec::new(),
            defaults,
        }
    }

    /// Current field list, in display order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Current inputs, in display order
    pub fn inputs(&self) -> &[FormInput] {
        &self.inputs
    }

    /// Variables most recently reported by the template
    pub fn template_variables(&self) -> &[String] {
        &self.template_variables
    }

    /// Load fields from the store, falling back to the defaults.
    ///
    /// A read failure is treated like an empty store. Defaults are saved so
    /// a layout record always exists afterwards; stored fields are only
    /// re-read, which keeps repeated loads out of the undo history.
    pub fn load<B: Backend>(&mut self, store: &FieldStore<B>) -> Result<(), FormError> {
        match store.get_all() {
            Ok(fields) if !fields.is_empty() => {
                self.fields = fields;
                self.rebuild();
                Ok(())
            }
            Ok(_) => self.set_fields(store, self.defaults.clone()),
            Err(e) => {
                warn!(error = %e, "could not read stored fields, using defaults");
                self.set_fields(store, self.defaults.clone())
            }
        }
    }

    /// Replace the field list, rebuild inputs and save the layout
    pub fn set_fields<B: Backend>(
        &mut self,
        store: &FieldStore<B>,
        fields: Vec<Field>,
    ) -> Result<(), FormError> {
        store.save_layout(fields.clone())?;
        self.fields = fields;
        self.rebuild();
        Ok(())
    }

    /// Flag each input by whether the template references its variable
    pub fn highlight(&mut self, variables: &[String]) {
        self.template_variables = variables.to_vec();
        for input in &mut self.inputs {
            input.status = InputStatus::for_variable(&input.variable, variables);
        }
    }

    /// Variables bound by some input but never used in the template
    pub fn missing(&self) -> Vec<&str> {
        self.inputs
            .iter()
            .filter(|input| input.status == InputStatus::Missing)
            .map(|input| input.variable.as_str())
            .collect()
    }

    /// Append the stock new field
    pub fn add_field<B: Backend>(&mut self, store: &FieldStore<B>) -> Result<(), FormError> {
        let mut fields = self.fields.clone();
        fields.push(new_field());
        self.set_fields(store, fields)
    }

    /// Remove the field at `index`
    pub fn remove_field<B: Backend>(
        &mut self,
        store: &FieldStore<B>,
        index: usize,
    ) -> Result<Field, FormError> {
        self.check_index(index)?;
        let mut fields = self.fields.clone();
        let removed = fields.remove(index);
        self.set_fields(store, fields)?;
        Ok(removed)
    }

    /// Move the field at `from` so it ends up at position `to`
    pub fn move_field<B: Backend>(
        &mut self,
        store: &FieldStore<B>,
        from: usize,
        to: usize,
    ) -> Result<(), FormError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }
        let mut fields = self.fields.clone();
        let moved = fields.remove(from);
        fields.insert(to, moved);
        self.set_fields(store, fields)
    }

    /// Apply an edit to the field at `index`
    pub fn edit_field<B: Backend>(
        &mut self,
        store: &FieldStore<B>,
        index: usize,
        edit: FieldEdit,
    ) -> Result<(), FormError> {
        self.edit_field_with(store, index, [edit])
    }

    /// Apply several edits to the field at `index` as one saved change
    pub fn edit_field_with<B: Backend>(
        &mut self,
        store: &FieldStore<B>,
        index: usize,
        edits: impl IntoIterator<Item = FieldEdit>,
    ) -> Result<(), FormError> {
        self.check_index(index)?;
        let mut fields = self.fields.clone();
        for edit in edits {
            edit.apply(&mut fields[index]);
        }
        self.set_fields(store, fields)
    }

    /// Empty every value, keeping labels, variables and placeholders
    pub fn clear_values<B: Backend>(&mut self, store: &FieldStore<B>) -> Result<(), FormError> {
        let fields = self
            .fields
            .iter()
            .map(|field| Field {
                value: Some(String::new()),
                ..field.clone()
            })
            .collect();
        self.set_fields(store, fields)
    }

    /// Set the value typed into the first input bound to `variable`.
    ///
    /// The store is patched first; the form only changes when the store
    /// accepted the update. Returns the store's answer, or `Ok(false)` when
    /// no input is bound to the variable.
    pub fn set_input_value<B: Backend>(
        &mut self,
        store: &FieldStore<B>,
        variable: &str,
        value: impl Into<String>,
    ) -> Result<bool, FormError> {
        let Some(position) = self
            .fields
            .iter()
            .position(|f| f.bind_to_variable == variable)
        else {
            debug!(variable, "no input bound to variable");
            return Ok(false);
        };

        let value = value.into();
        let mut updated = self.fields[position].clone();
        updated.value = Some(value.clone());
        if !store.update_field(updated.clone())? {
            warn!(variable, "stored layout has no field bound to variable");
            return Ok(false);
        }
        self.fields[position] = updated;
        self.inputs[position].value = value;
        Ok(true)
    }

    /// Current values keyed by variable, trimmed.
    ///
    /// When several inputs share a variable the last one wins.
    pub fn variables(&self) -> HashMap<String, String> {
        self.inputs
            .iter()
            .map(|input| (input.variable.clone(), input.value.trim().to_string()))
            .collect()
    }

    fn rebuild(&mut self) {
        self.inputs = self.fields.iter().map(FormInput::from_field).collect();
        let variables = std::mem::take(&mut self.template_variables);
        self.highlight(&variables);
        debug!(inputs = self.inputs.len(), "rebuilt form inputs");
    }

    fn check_index(&self, index: usize) -> Result<(), FormError> {
        if index < self.fields.len() {
            Ok(())
        } else {
            Err(FormError::IndexOutOfRange {
                index,
                len: self.fields.len(),
            })
        }
    }
}
