//! Variable substitution

use std::collections::HashMap;

use crate::parser::{parse, VariableRef};

/// Substitute variable values into a template.
///
/// Tokens whose name has no value are left exactly as written. Values are
/// trimmed. An indexed token (`{NAME[1]}`) picks one space-separated word of
/// the value, falling back to the whole trimmed value when the value has no
/// space or the index is out of range. No escaping is applied.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use template_editor::render;
///
/// let vars = HashMap::from([("NAME".to_string(), "Davey Grohley".to_string())]);
/// assert_eq!(render("Hi {NAME[0]}!", &vars), "Hi Davey!");
/// ```
pub fn render(template: &str, variables: &HashMap<String, String>) -> String {
    let mut output = String::with_capacity(template.len());
    let mut cursor = 0;

    for token in parse(template) {
        output.push_str(&template[cursor..token.span.start]);
        match variables.get(&token.name) {
            Some(value) => output.push_str(select(value, token.index)),
            None => output.push_str(token.text(template)),
        }
        cursor = token.span.end;
    }

    output.push_str(&template[cursor..]);
    output
}

/// Tokens in `template` that have no entry in `variables`
pub fn unresolved(template: &str, variables: &HashMap<String, String>) -> Vec<VariableRef> {
    parse(template)
        .into_iter()
        .filter(|token| !variables.contains_key(&token.name))
        .collect()
}

fn select(value: &str, index: Option<usize>) -> &str {
    let value = value.trim();
    let Some(index) = index else {
        return value;
    };
    if !value.contains(' ') {
        return value;
    }
    // Split on single spaces so consecutive spaces yield empty parts.
    value.split(' ').nth(index).unwrap_or(value)
}
