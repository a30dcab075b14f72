//! Field and layout records

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum number of previous field lists kept for undo
pub const HISTORY_LIMIT: usize = 10;

/// One form entry bound to a template variable
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Field {
    /// Display name
    pub label: String,
    /// Placeholder name this field supplies a value for
    pub bind_to_variable: String,
    /// Current value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Hint text shown when the value is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl Field {
    /// Create a field with no value or placeholder
    pub fn new(label: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            bind_to_variable: variable.into(),
            value: None,
            placeholder: None,
        }
    }

    /// Set the value
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the placeholder
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// The value, or an empty string when unset
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }
}

/// Bounded FIFO of previous field lists
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: VecDeque<Vec<Field>>,
}

impl History {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot, evicting the oldest entries past the limit
    pub fn push(&mut self, snapshot: Vec<Field>) {
        self.entries.push_back(snapshot);
        while self.entries.len() > HISTORY_LIMIT {
            self.entries.pop_front();
        }
    }

    /// Remove and return the most recent snapshot
    pub fn pop(&mut self) -> Option<Vec<Field>> {
        self.entries.pop_back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshots from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Vec<Field>> {
        self.entries.iter()
    }
}

/// The persisted `layout` record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Layout {
    pub fields: Vec<Field>,
    #[serde(default)]
    pub history: History,
}

impl Layout {
    /// Replace the field list, keeping the previous one for undo
    pub fn replace_fields(&mut self, fields: Vec<Field>) {
        let previous = std::mem::replace(&mut self.fields, fields);
        self.history.push(previous);
    }

    /// Overwrite the first field bound to the same variable.
    ///
    /// Returns `false` and leaves the layout untouched when no field matches.
    pub fn update_field(&mut self, field: Field) -> bool {
        match self
            .fields
            .iter_mut()
            .find(|f| f.bind_to_variable == field.bind_to_variable)
        {
            Some(slot) => {
                *slot = field;
                true
            }
            None => false,
        }
    }

    /// Restore the most recent snapshot
    pub fn undo(&mut self) -> Option<&[Field]> {
        let previous = self.history.pop()?;
        self.fields = previous;
        Some(&self.fields)
    }
}
