//! Serialization of model definitions documents to YAML or JSON.

use crate::definitions_builder::DefinitionsDocument;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a definitions document to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use model_doclet::definitions_builder::DefinitionsBuilder;
/// use model_doclet::serializer::serialize_yaml;
///
/// let document = DefinitionsBuilder::new().build();
/// let yaml = serialize_yaml(&document).unwrap();
/// assert!(yaml.contains("swaggerVersion"));
/// ```
pub fn serialize_yaml(doc: &DefinitionsDocument) -> Result<String> {
    debug!("Serializing definitions document to YAML");
    serde_yaml::to_string(doc).context("Failed to serialize definitions document to YAML")
}

/// Serializes a definitions document to pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(doc: &DefinitionsDocument) -> Result<String> {
    debug!("Serializing definitions document to JSON");
    serde_json::to_string_pretty(doc).context("Failed to serialize definitions document to JSON")
}

/// Writes `content` to `path`, creating parent directories and replacing any existing file.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}
