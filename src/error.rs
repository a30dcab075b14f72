//! Crate-level error type

use thiserror::Error;

use crate::config::ConfigError;
use crate::form::FormError;
use crate::store::StoreError;

/// Errors surfaced by the editor controller and the CLI
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("form error: {0}")]
    Form(#[from] FormError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
