use super::DocumentFormat;
use crate::error::{KbError, Result};
use crate::schema::raw::RawDataset;

/// YAML dataset documents, same shape as JSON
pub struct YamlFormat;

impl DocumentFormat for YamlFormat {
    fn can_parse(&self, extension: &str) -> bool {
        extension == "yaml" || extension == "yml"
    }

    fn parse(&self, content: &str, path: &str) -> Result<RawDataset> {
        serde_yaml_ng::from_str(content)
            .map_err(|e| KbError::Parse(format!("YAML parse error in {}: {}", path, e)))
    }
}
