//! Export target for rendered output

/// Default file name for downloaded output
pub const DEFAULT_FILE_NAME: &str = "template.html";

/// MIME type of exported output
pub const HTML_MIME: &str = "text/html";

/// Describes where and how rendered HTML is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    /// Suggested file name
    pub file_name: String,
    /// Content type of the file
    pub mime_type: String,
}

impl Default for Export {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_FILE_NAME.to_string(),
            mime_type: HTML_MIME.to_string(),
        }
    }
}

impl Export {
    /// Create an HTML export with the default file name
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file name
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }
}
