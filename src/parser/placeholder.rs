//! Placeholder scanner for `{NAME}` and `{NAME[index]}` tokens

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Placeholder pattern. Names are ASCII word characters only, so a hyphen
/// or any other character ends the token and the braces stay unmatched.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\s*([A-Za-z0-9_]+)(?:\[([0-9]+)\])?\s*\}").unwrap());

/// A placeholder found in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef {
    /// Variable name, used as the lookup key into the value map
    pub name: String,
    /// Positional index into the space-separated value, if requested.
    ///
    /// An index written in the template that does not fit in `usize` is kept
    /// as `Some(usize::MAX)`, which is always out of range.
    pub index: Option<usize>,
    /// Byte range of the whole token, braces included
    pub span: Span,
}

impl VariableRef {
    /// The literal token text as it appears in `source`
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

/// Scan a template for placeholders.
///
/// Matches are returned left to right, non-overlapping, and are not
/// de-duplicated. Anything that does not form a complete token is ignored.
pub fn parse(template: &str) -> Vec<VariableRef> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?.as_str().to_string();
            let index = caps
                .get(2)
                .map(|m| m.as_str().parse::<usize>().unwrap_or(usize::MAX));
            Some(VariableRef {
                name,
                index,
                span: whole.range(),
            })
        })
        .collect()
}

/// Names of every placeholder in order of appearance, duplicates included
pub fn variable_names(template: &str) -> Vec<String> {
    parse(template).into_iter().map(|r| r.name).collect()
}

/// Names of every placeholder, first occurrence only
pub fn unique_variables(template: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    variable_names(template)
        .into_iter()
        .filter(|name| seen.insert(name.clone()))
        .collect()
}
