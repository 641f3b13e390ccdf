//! Declarative type catalogs.
//!
//! A catalog describes the declarations of a type system in YAML or JSON, which makes it
//! possible to document types from any language whose reflection data can be dumped:
//!
//! ```yaml
//! types:
//!   - name: com.acme.Order
//!     annotations:
//!       - name: javax.xml.bind.annotation.XmlRootElement
//!         values: { name: order }
//!     fields:
//!       - name: id
//!         type: java.util.UUID
//!         doc: Order identifier
//!       - name: items
//!         type: java.util.List<com.acme.LineItem>
//!   - name: com.acme.Status
//!     kind: enum
//!     constants: [ACTIVE, CLOSED]
//! ```

use crate::error::{Error, Result};
use crate::oracle::{
    simple_name, Annotation, DeclarationKind, FieldDecl, MethodDecl, Superclass,
    TypeDeclaration, TypeOracle, TypeRef,
};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// In-memory type catalog keyed by qualified name, in declaration order
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    declarations: IndexMap<String, TypeDeclaration>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    types: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EntryKind {
    Class,
    Enum,
}

#[derive(Debug, Deserialize)]
struct CatalogEntry {
    name: String,
    #[serde(default)]
    kind: Option<EntryKind>,
    #[serde(default)]
    superclass: Option<TypeRef>,
    #[serde(default)]
    annotations: Vec<Annotation>,
    #[serde(default)]
    fields: Vec<FieldDecl>,
    #[serde(default)]
    methods: Vec<MethodDecl>,
    #[serde(default)]
    constants: Vec<String>,
}

impl From<CatalogEntry> for TypeDeclaration {
    fn from(entry: CatalogEntry) -> Self {
        let is_enum = match entry.kind {
            Some(EntryKind::Enum) => true,
            Some(EntryKind::Class) => false,
            None => !entry.constants.is_empty(),
        };
        let kind = if is_enum {
            DeclarationKind::Enum {
                constants: entry.constants,
            }
        } else {
            DeclarationKind::Class
        };

        TypeDeclaration {
            qualified_name: entry.name,
            kind,
            fields: entry.fields,
            methods: entry.methods,
            superclass: entry.superclass.map_or(Superclass::Root, Superclass::Extends),
            annotations: entry.annotations,
        }
    }
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog file; `.json` files are read as JSON, anything else as YAML
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading type catalog: {}", path.display());

        let content = fs::read_to_string(path)?;
        let is_json = path.extension().and_then(|s| s.to_str()) == Some("json");

        let file: std::result::Result<CatalogFile, String> = if is_json {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };

        let file = file.map_err(|message| Error::CatalogError {
            file: path.to_path_buf(),
            message,
        })?;

        let catalog = Self::from_entries(file.types);
        debug!("Loaded {} declarations from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse a YAML catalog document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_yaml::from_str(content)?;
        Ok(Self::from_entries(file.types))
    }

    /// Parse a JSON catalog document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(content)?;
        Ok(Self::from_entries(file.types))
    }

    fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry.into());
        }
        catalog
    }

    /// Add a declaration. Returns false, keeping the existing one, if the name is taken.
    pub fn insert(&mut self, declaration: TypeDeclaration) -> bool {
        if self.declarations.contains_key(&declaration.qualified_name) {
            warn!(
                "Duplicate declaration of {}, keeping the first one",
                declaration.qualified_name
            );
            return false;
        }
        self.declarations
            .insert(declaration.qualified_name.clone(), declaration);
        true
    }

    /// Merge another catalog into this one; first declaration of a name wins
    pub fn extend(&mut self, other: TypeCatalog) {
        for (_, declaration) in other.declarations {
            self.insert(declaration);
        }
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// All declarations in the order they were added
    pub fn declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.declarations.values()
    }

    /// Look up a declaration by qualified name, then by unique simple name
    pub fn find(&self, name: &str) -> Option<&TypeDeclaration> {
        if let Some(declaration) = self.declarations.get(name) {
            return Some(declaration);
        }

        let mut matches = self
            .declarations
            .values()
            .filter(|d| simple_name(&d.qualified_name) == name);
        let first = matches.next();
        if matches.next().is_some() {
            warn!("Type name {} is ambiguous, use the qualified name", name);
            return None;
        }
        first
    }
}

impl TypeOracle for TypeCatalog {
    fn declaration(&self, ty: &TypeRef) -> Option<&TypeDeclaration> {
        self.declarations.get(&ty.qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Annotated;
    use std::io::Write;
    use tempfile::TempDir;

    const ORDER_CATALOG: &str = r#"
types:
  - name: com.acme.Order
    superclass: com.acme.Entity
    annotations:
      - name: javax.xml.bind.annotation.XmlRootElement
        values: { name: order }
    fields:
      - name: id
        type: java.util.UUID
        doc: Order identifier
      - name: items
        type: java.util.List<com.acme.LineItem>
      - name: COUNTER
        type: int
        static: true
    methods:
      - name: getTotal
        returns: java.math.BigDecimal
        return_doc: the order total
  - name: com.acme.Status
    constants: [ACTIVE, CLOSED]
"#;

    #[test]
    fn test_load_yaml_catalog() {
        let catalog = TypeCatalog::from_yaml_str(ORDER_CATALOG).unwrap();
        assert_eq!(catalog.len(), 2);

        let order = catalog.declaration(&TypeRef::new("com.acme.Order")).unwrap();
        assert_eq!(order.fields.len(), 3);
        assert!(order.fields[2].is_static);
        assert_eq!(order.fields[0].doc, "Order identifier");
        assert_eq!(
            order.fields[1].declared_type,
            TypeRef::parse("java.util.List<com.acme.LineItem>")
        );
        assert_eq!(
            order.superclass,
            Superclass::Extends(TypeRef::new("com.acme.Entity"))
        );
        assert_eq!(order.methods[0].return_doc.as_deref(), Some("the order total"));
        assert_eq!(
            order.annotation_value("javax.xml.bind.annotation.XmlRootElement", "name"),
            Some("order")
        );
    }

    #[test]
    fn test_enum_inferred_from_constants() {
        let catalog = TypeCatalog::from_yaml_str(ORDER_CATALOG).unwrap();
        let status = catalog.declaration(&TypeRef::new("com.acme.Status")).unwrap();
        assert!(status.is_enum());
        assert_eq!(status.enum_constants(), &["ACTIVE".to_string(), "CLOSED".to_string()]);
    }

    #[test]
    fn test_load_json_catalog_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("model.types.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(
            br#"{"types": [{"name": "Point", "fields": [{"name": "x", "type": "int"}]}]}"#,
        )
        .unwrap();

        let catalog = TypeCatalog::load(&path).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.declaration(&TypeRef::new("Point")).is_some());
    }

    #[test]
    fn test_load_invalid_catalog_reports_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.types.yaml");
        fs::write(&path, "types:\n  - fields: []\n").unwrap();

        let err = TypeCatalog::load(&path).unwrap_err();
        match err {
            Error::CatalogError { file, .. } => assert_eq!(file, path),
            other => panic!("Expected catalog error, got {:?}", other),
        }
    }

    #[test]
    fn test_insert_keeps_first_declaration() {
        let mut catalog = TypeCatalog::new();
        assert!(catalog.insert(TypeDeclaration::class("Order")));
        assert!(!catalog.insert(TypeDeclaration::enumeration("Order", vec![])));
        assert!(!catalog.find("Order").unwrap().is_enum());
    }

    #[test]
    fn test_find_by_simple_name() {
        let mut catalog = TypeCatalog::new();
        catalog.insert(TypeDeclaration::class("com.acme.Order"));
        catalog.insert(TypeDeclaration::class("com.acme.Item"));
        catalog.insert(TypeDeclaration::class("org.other.Item"));

        assert_eq!(
            catalog.find("Order").map(|d| d.qualified_name.as_str()),
            Some("com.acme.Order")
        );
        assert!(catalog.find("Item").is_none());
        assert!(catalog.find("org.other.Item").is_some());
    }

    #[test]
    fn test_extend_merges_in_order() {
        let mut first = TypeCatalog::new();
        first.insert(TypeDeclaration::class("A"));
        let mut second = TypeCatalog::new();
        second.insert(TypeDeclaration::class("B"));
        second.insert(TypeDeclaration::enumeration("A", vec![]));

        first.extend(second);
        let names: Vec<&str> = first
            .declarations()
            .map(|d| d.qualified_name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert!(!first.find("A").unwrap().is_enum());
    }
}
