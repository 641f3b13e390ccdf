//! Parser options.
//!
//! Options come from three places, later ones adding to earlier ones: the built-in
//! defaults, an optional YAML/JSON options file (`--config`), and command-line flags.
//!
//! ```yaml
//! types_to_treat_as_opaque: [com.acme.Money]
//! packages_to_treat_as_opaque: [com.vendor.]
//! conventions: [jackson]
//! ```

use crate::detector::Convention;
use crate::error::{Error, Result};
use crate::opacity::{OpacityPolicy, DEFAULT_BASE_OBJECT, DEFAULT_RESERVED_PREFIX};
use crate::translator::{FirstNotNullTranslator, NameBasedTranslator};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Conventions used when none are configured and none are detected
pub const DEFAULT_CONVENTIONS: &[Convention] = &[Convention::Jaxb, Convention::Jackson];

/// Options controlling model extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// Qualified type names never expanded into models
    pub types_to_treat_as_opaque: Vec<String>,
    /// Qualified name prefixes never expanded into models
    pub packages_to_treat_as_opaque: Vec<String>,
    /// Platform-reserved prefixes (always opaque)
    pub reserved_prefixes: Vec<String>,
    /// The universal base object type (always opaque)
    pub base_object: String,
    /// Naming conventions for the translator chain; empty means auto-detect
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conventions: Vec<Convention>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            types_to_treat_as_opaque: vec![
                "org.joda.time.DateTime".to_string(),
                "java.util.UUID".to_string(),
                "java.lang.Class".to_string(),
                "uuid::Uuid".to_string(),
                "serde_json::Value".to_string(),
            ],
            packages_to_treat_as_opaque: vec![
                "org.joda.time".to_string(),
                "java.math".to_string(),
                "chrono::".to_string(),
            ],
            reserved_prefixes: vec![DEFAULT_RESERVED_PREFIX.to_string()],
            base_object: DEFAULT_BASE_OBJECT.to_string(),
            conventions: Vec::new(),
        }
    }
}

impl ParserOptions {
    /// Load options from a file; `.json` is read as JSON, anything else as YAML.
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading options from {}", path.display());

        let content = fs::read_to_string(path)?;
        let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");
        let options: Self = if is_json {
            serde_json::from_str(&content)
                .map_err(|e| Error::InvalidArgument(format!("{}: {}", path.display(), e)))?
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| Error::InvalidArgument(format!("{}: {}", path.display(), e)))?
        };
        Ok(options)
    }

    /// Append comma-separated opaque type names
    pub fn add_opaque_types(&mut self, list: &str) {
        self.types_to_treat_as_opaque.extend(split_elements(list));
    }

    /// Append comma-separated opaque package prefixes
    pub fn add_opaque_packages(&mut self, list: &str) {
        self.packages_to_treat_as_opaque.extend(split_elements(list));
    }

    pub fn opacity_policy(&self) -> OpacityPolicy {
        OpacityPolicy::new(
            self.types_to_treat_as_opaque.clone(),
            self.packages_to_treat_as_opaque.clone(),
        )
        .with_reserved_prefixes(self.reserved_prefixes.clone())
        .with_base_object(self.base_object.clone())
    }

    /// Build the translator chain: configured conventions if any, otherwise `detected`,
    /// otherwise [`DEFAULT_CONVENTIONS`]; always ending with the name-based fallback.
    pub fn translator(&self, detected: &[Convention]) -> FirstNotNullTranslator {
        let conventions = self.effective_conventions(detected);
        debug!("Translator conventions: {:?}", conventions);

        conventions
            .iter()
            .fold(FirstNotNullTranslator::new(), |chain, convention| {
                chain.add_next(convention.translator())
            })
            .add_next(NameBasedTranslator)
    }

    pub fn effective_conventions<'a>(&'a self, detected: &'a [Convention]) -> &'a [Convention] {
        if !self.conventions.is_empty() {
            &self.conventions
        } else if !detected.is_empty() {
            detected
        } else {
            DEFAULT_CONVENTIONS
        }
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones
pub fn split_elements(list: &str) -> impl Iterator<Item = String> + '_ {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{Annotation, FieldDecl, TypeRef};
    use crate::translator::{OptionalName, Translator};
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let options = ParserOptions::default();
        assert!(options
            .types_to_treat_as_opaque
            .contains(&"java.util.UUID".to_string()));
        assert!(options
            .packages_to_treat_as_opaque
            .contains(&"java.math".to_string()));
        assert_eq!(options.reserved_prefixes, vec!["javax.".to_string()]);
        assert_eq!(options.base_object, "java.lang.Object");
        assert!(options.conventions.is_empty());
    }

    #[test]
    fn test_split_elements() {
        let elements: Vec<String> = split_elements(" a.B , ,c.D,").collect();
        assert_eq!(elements, vec!["a.B".to_string(), "c.D".to_string()]);
    }

    #[test]
    fn test_add_opaque_lists() {
        let mut options = ParserOptions::default();
        options.add_opaque_types("com.acme.Money, com.acme.Currency");
        options.add_opaque_packages("com.vendor.");

        assert!(options
            .types_to_treat_as_opaque
            .ends_with(&["com.acme.Money".to_string(), "com.acme.Currency".to_string()]));
        assert_eq!(
            options.packages_to_treat_as_opaque.last().map(String::as_str),
            Some("com.vendor.")
        );
    }

    #[test]
    fn test_load_partial_yaml_keeps_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("options.yaml");
        fs::write(
            &path,
            "types_to_treat_as_opaque: [com.acme.Money]\nconventions: [serde]\n",
        )
        .unwrap();

        let options = ParserOptions::load(&path).unwrap();
        assert_eq!(options.types_to_treat_as_opaque, vec!["com.acme.Money".to_string()]);
        assert_eq!(options.conventions, vec![Convention::Serde]);
        assert_eq!(options.base_object, "java.lang.Object");
    }

    #[test]
    fn test_load_invalid_options() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("options.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            ParserOptions::load(&path),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_effective_conventions() {
        let mut options = ParserOptions::default();
        assert_eq!(options.effective_conventions(&[]), DEFAULT_CONVENTIONS);
        assert_eq!(
            options.effective_conventions(&[Convention::Serde]),
            &[Convention::Serde]
        );

        options.conventions = vec![Convention::Jackson];
        assert_eq!(
            options.effective_conventions(&[Convention::Serde]),
            &[Convention::Jackson]
        );
    }

    #[test]
    fn test_translator_chain_ends_with_name_fallback() {
        let options = ParserOptions::default();
        let translator = options.translator(&[Convention::Serde]);
        assert_eq!(translator.len(), 2);

        let renamed = FieldDecl {
            annotations: vec![Annotation::marker("serde").with_value("rename", "userName")],
            ..FieldDecl::new("name", TypeRef::new("String"))
        };
        assert_eq!(
            translator.field_name(&renamed),
            OptionalName::Present("userName".to_string())
        );
        assert_eq!(
            translator.field_name(&FieldDecl::new("plain", TypeRef::new("String"))),
            OptionalName::Present("plain".to_string())
        );
    }
}
