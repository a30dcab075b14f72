//! Form inputs and field edits

use crate::store::Field;

/// Whether the template references an input's variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputStatus {
    /// The variable appears in the template
    Satisfied,
    /// The template never uses the variable
    #[default]
    Missing,
}

impl InputStatus {
    /// Status of `variable` against the names parsed from a template
    pub fn for_variable(variable: &str, template_variables: &[String]) -> Self {
        if template_variables.iter().any(|v| v == variable) {
            Self::Satisfied
        } else {
            Self::Missing
        }
    }
}

/// A rendered form input bound to a variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormInput {
    pub label: String,
    pub variable: String,
    pub value: String,
    pub placeholder: String,
    pub status: InputStatus,
}

impl FormInput {
    /// Build the input for a field, initially flagged missing
    pub fn from_field(field: &Field) -> Self {
        Self {
            label: field.label.clone(),
            variable: field.bind_to_variable.clone(),
            value: field.value.clone().unwrap_or_default(),
            placeholder: field.placeholder.clone().unwrap_or_default(),
            status: InputStatus::Missing,
        }
    }
}

/// A single edit to one field's properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Label(String),
    BindToVariable(String),
    Value(String),
    Placeholder(String),
}

impl FieldEdit {
    /// Apply the edit in place
    pub fn apply(self, field: &mut Field) {
        match self {
            FieldEdit::Label(label) => field.label = label,
            FieldEdit::BindToVariable(variable) => field.bind_to_variable = variable,
            FieldEdit::Value(value) => field.value = Some(value),
            FieldEdit::Placeholder(placeholder) => field.placeholder = Some(placeholder),
        }
    }
}
