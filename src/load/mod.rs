pub mod json;
pub mod walker;
pub mod yaml;

pub use walker::{discover_datasets, DatasetFile};

use std::path::Path;

use crate::error::{KbError, Result};
use crate::schema::raw::RawDataset;

/// Trait for dataset document formats
pub trait DocumentFormat {
    /// Check if this format handles the given file extension
    fn can_parse(&self, extension: &str) -> bool;

    /// Parse document text into a candidate dataset
    fn parse(&self, content: &str, path: &str) -> Result<RawDataset>;
}

/// Format registry that selects a document format by extension
pub struct FormatRegistry {
    formats: Vec<Box<dyn DocumentFormat>>,
}

impl FormatRegistry {
    /// Create a new registry with all built-in formats
    pub fn new() -> Self {
        let mut registry = Self {
            formats: Vec::new(),
        };

        registry.register(Box::new(json::JsonFormat));
        registry.register(Box::new(yaml::YamlFormat));

        registry
    }

    /// Register a format
    pub fn register(&mut self, format: Box<dyn DocumentFormat>) {
        self.formats.push(format);
    }

    /// Find a format that can handle the given extension
    pub fn find_format(&self, extension: &str) -> Option<&dyn DocumentFormat> {
        self.formats
            .iter()
            .find(|f| f.can_parse(extension))
            .map(|f| f.as_ref())
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.find_format(extension).is_some()
    }

    /// Parse content with the format registered for the extension.
    ///
    /// There is no fallback: a document that does not parse is not a dataset.
    pub fn parse(&self, content: &str, path: &str, extension: &str) -> Result<RawDataset> {
        let format = self
            .find_format(extension)
            .ok_or_else(|| KbError::UnsupportedFormat(format!("no format for extension '{}'", extension)))?;
        format.parse(content, path)
    }

    /// Read and parse a dataset file, picking the format from its extension.
    pub fn load_file(&self, path: &Path) -> Result<RawDataset> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        let content = std::fs::read_to_string(path)?;
        let dataset = self.parse(&content, &path.display().to_string(), &extension)?;
        log::debug!("Loaded {} sections from {}", dataset.sections.len(), path.display());
        Ok(dataset)
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a dataset file with the built-in formats.
pub fn load_file(path: &Path) -> Result<RawDataset> {
    FormatRegistry::new().load_file(path)
}
