//! Editor configuration loaded from TOML
//!
//! Every key is optional; anything left out falls back to the built-in
//! default.
//!
//! ```toml
//! store_path = "editor-store.json"
//! notification_ms = 5000
//! export_file_name = "newsletter.html"
//! default_template = "<h1>Hello {NAME}</h1>"
//!
//! [[default_fields]]
//! label = "Name"
//! bind_to_variable = "NAME"
//! value = "George Costanza"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::form::default_fields;
use crate::renderer::export::DEFAULT_FILE_NAME;
use crate::store::Field;

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Template shown when the store has none yet
pub const DEFAULT_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">

<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
</head>

<body style="
      margin: 0;
      padding: 0;
      background: {BACKGROUND_COLOR};
      font-family: 'Google Sans', Roboto, Arial, sans-serif;
      color: #3c4043!important;
    ">
  <main style="background-color: #3c4043; padding: 1rem 1.75rem;">
    <h1 style="color: #14986cff">Hello {NAME}</h1>
    <p>
      I have a message for you:
    </p>
    <p style="text-align: center;">
      {MESSAGE}
    </p>
    <p style="text-align: center;">
      {OWNER}
    </p>
  </main>
</body>

</html>
"#;

/// Default store location, relative to the working directory
pub const DEFAULT_STORE_PATH: &str = "template-editor.json";

/// Default time a notification stays visible
pub const DEFAULT_NOTIFICATION_MS: u64 = 3000;

/// Configuration for the editor
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// JSON file backing the field store
    pub store_path: PathBuf,
    /// How long notifications stay visible, in milliseconds
    pub notification_ms: u64,
    /// File name offered for downloads
    pub export_file_name: String,
    /// Template used when none is stored
    pub default_template: String,
    /// Fields used when none are stored
    pub default_fields: Vec<Field>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            notification_ms: DEFAULT_NOTIFICATION_MS,
            export_file_name: DEFAULT_FILE_NAME.to_string(),
            default_template: DEFAULT_TEMPLATE.to_string(),
            default_fields: default_fields(),
        }
    }
}

impl EditorConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the store path
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self
    }

    /// Set the notification duration in milliseconds
    pub fn with_notification_ms(mut self, ms: u64) -> Self {
        self.notification_ms = ms;
        self
    }

    /// Set the download file name
    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    /// Set the fallback template
    pub fn with_default_template(mut self, template: impl Into<String>) -> Self {
        self.default_template = template.into();
        self
    }

    /// Set the fallback fields
    pub fn with_default_fields(mut self, fields: Vec<Field>) -> Self {
        self.default_fields = fields;
        self
    }

    /// Notification duration
    pub fn notification_duration(&self) -> Duration {
        Duration::from_millis(self.notification_ms)
    }
}
