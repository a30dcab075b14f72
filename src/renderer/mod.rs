//! Substitution engine producing rendered output from a template
//!
//! This module takes a template and a variable map and produces the
//! substituted string used for preview and export.

pub mod export;
pub mod substitute;

pub use export::Export;
pub use substitute::{render, unresolved};
