//! Template Editor - variable substitution and form synchronization for HTML templates
//!
//! This library parses `{NAME}` and `{NAME[index]}` placeholders out of a
//! template, keeps a form of fields bound to those variables in sync with a
//! persistent store, and substitutes the field values back into the template.
//!
//! # Example
//!
//! ```rust
//! use template_editor::{EditorConfig, FieldStore, TemplateEditor};
//!
//! let config = EditorConfig::new().with_default_template("Hi {NAME[0]}!");
//! let mut editor = TemplateEditor::new(FieldStore::in_memory(), config);
//! editor.start().unwrap();
//! assert_eq!(editor.rendered(), "Hi George!");
//!
//! editor.set_input_value("NAME", "Davey Grohley").unwrap();
//! assert_eq!(editor.rendered(), "Hi Davey!");
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod form;
pub mod parser;
pub mod renderer;
pub mod store;

pub use config::{ConfigError, EditorConfig};
pub use editor::{AppState, TemplateEditor};
pub use error::EditorError;
pub use events::{Event, EventBus};
pub use form::{FormError, TemplateForm};
pub use parser::{parse, unique_variables, variable_names, VariableRef};
pub use renderer::{render, unresolved, Export};
pub use store::{Field, FieldStore, StoreError};
