//! Parser for template placeholders

mod placeholder;

pub use placeholder::{parse, unique_variables, variable_names, Span, VariableRef};
