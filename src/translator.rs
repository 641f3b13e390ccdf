//! Name translation - deciding what a type, field or accessor is called in the output.
//!
//! Naming conventions are pluggable. Each [`Translator`] either gives a definite opinion
//! about a name ([`OptionalName::Present`] or [`OptionalName::Ignored`]) or abstains
//! ([`OptionalName::Missing`]). A [`FirstNotNullTranslator`] chains translators in order
//! and returns the first definite opinion, so annotation-driven conventions can sit in
//! front of a [`NameBasedTranslator`] fallback:
//!
//! ```
//! use model_doclet::translator::{AnnotationAwareTranslator, FirstNotNullTranslator, NameBasedTranslator};
//!
//! let translator = FirstNotNullTranslator::new()
//!     .add_next(
//!         AnnotationAwareTranslator::new()
//!             .ignore("com.fasterxml.jackson.annotation.JsonIgnore")
//!             .element("com.fasterxml.jackson.annotation.JsonProperty", "value")
//!             .root_element("com.fasterxml.jackson.annotation.JsonRootName", "value"),
//!     )
//!     .add_next(NameBasedTranslator);
//! # let _ = translator;
//! ```

use crate::oracle::{Annotated, FieldDecl, MethodDecl, TypeDeclaration, TypeRef};
use log::debug;

/// Outcome of a name lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionalName {
    /// The element has this name
    Present(String),
    /// The element must be left out of the output entirely
    Ignored,
    /// No opinion; let the next translator decide
    Missing,
}

impl OptionalName {
    /// `Present` for non-empty names, `Missing` otherwise
    pub fn present_or_missing(name: Option<&str>) -> Self {
        match name {
            Some(name) if !name.is_empty() => OptionalName::Present(name.to_string()),
            _ => OptionalName::Missing,
        }
    }

    /// Whether this is a definite opinion (a name or an explicit ignore)
    pub fn is_decided(&self) -> bool {
        !matches!(self, OptionalName::Missing)
    }

    /// The resolved name, if any
    pub fn value(&self) -> Option<&str> {
        match self {
            OptionalName::Present(name) => Some(name),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<String> {
        match self {
            OptionalName::Present(name) => Some(name),
            _ => None,
        }
    }
}

/// Naming strategy for types, fields and accessor methods.
///
/// Translators must be pure functions of their inputs and configuration.
pub trait Translator {
    /// Name of a type; `declaration` is `None` for types the oracle does not know
    fn type_name(&self, ty: &TypeRef, declaration: Option<&TypeDeclaration>) -> OptionalName;

    fn field_name(&self, field: &FieldDecl) -> OptionalName;

    fn method_name(&self, method: &MethodDecl) -> OptionalName;
}

/// JAXB's placeholder for "use the default name"
const JAXB_DEFAULT: &str = "##default";

/// Table-driven translator reading names from annotations.
#[derive(Debug, Clone, Default)]
pub struct AnnotationAwareTranslator {
    ignore: Vec<String>,
    element: Vec<(String, String)>,
    root_element: Vec<(String, String)>,
}

impl AnnotationAwareTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members (or types) carrying `annotation` are ignored
    pub fn ignore(mut self, annotation: impl Into<String>) -> Self {
        self.ignore.push(annotation.into());
        self
    }

    /// `attribute` of `annotation` supplies a field or accessor name
    pub fn element(mut self, annotation: impl Into<String>, attribute: impl Into<String>) -> Self {
        self.element.push((annotation.into(), attribute.into()));
        self
    }

    /// `attribute` of `annotation` supplies a type name
    pub fn root_element(
        mut self,
        annotation: impl Into<String>,
        attribute: impl Into<String>,
    ) -> Self {
        self.root_element.push((annotation.into(), attribute.into()));
        self
    }

    fn is_ignored(&self, element: &dyn Annotated) -> bool {
        self.ignore.iter().any(|name| element.has_annotation(name))
    }

    fn name_from(element: &dyn Annotated, table: &[(String, String)]) -> OptionalName {
        table
            .iter()
            .filter_map(|(annotation, attribute)| element.annotation_value(annotation, attribute))
            .find(|value| !value.is_empty() && *value != JAXB_DEFAULT)
            .map_or(OptionalName::Missing, |value| {
                OptionalName::Present(value.to_string())
            })
    }

    fn member_name(&self, member: &dyn Annotated) -> OptionalName {
        if self.is_ignored(member) {
            return OptionalName::Ignored;
        }
        Self::name_from(member, &self.element)
    }
}

impl Translator for AnnotationAwareTranslator {
    fn type_name(&self, _ty: &TypeRef, declaration: Option<&TypeDeclaration>) -> OptionalName {
        let Some(declaration) = declaration else {
            return OptionalName::Missing;
        };
        if self.is_ignored(declaration) {
            return OptionalName::Ignored;
        }
        Self::name_from(declaration, &self.root_element)
    }

    fn field_name(&self, field: &FieldDecl) -> OptionalName {
        self.member_name(field)
    }

    fn method_name(&self, method: &MethodDecl) -> OptionalName {
        self.member_name(method)
    }
}

/// Fallback translator deriving names from declared names.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameBasedTranslator;

impl NameBasedTranslator {
    /// `getTotal` -> `total`, `isActive` -> `active`; other names unchanged
    fn accessor_property_name(name: &str) -> String {
        for prefix in ["get", "is"] {
            if let Some(rest) = name.strip_prefix(prefix) {
                let mut chars = rest.chars();
                if let Some(first) = chars.next() {
                    if first.is_uppercase() {
                        return first.to_lowercase().chain(chars).collect();
                    }
                }
            }
        }
        name.to_string()
    }
}

impl Translator for NameBasedTranslator {
    fn type_name(&self, ty: &TypeRef, _declaration: Option<&TypeDeclaration>) -> OptionalName {
        OptionalName::present_or_missing(Some(ty.simple_name()))
    }

    fn field_name(&self, field: &FieldDecl) -> OptionalName {
        OptionalName::present_or_missing(Some(&field.name))
    }

    fn method_name(&self, method: &MethodDecl) -> OptionalName {
        let name = Self::accessor_property_name(&method.name);
        OptionalName::present_or_missing(Some(&name))
    }
}

/// Ordered chain of translators; the first definite opinion wins.
#[derive(Default)]
pub struct FirstNotNullTranslator {
    chain: Vec<Box<dyn Translator + Send + Sync>>,
}

impl FirstNotNullTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a translator to the end of the chain
    pub fn add_next(mut self, translator: impl Translator + Send + Sync + 'static) -> Self {
        self.chain.push(Box::new(translator));
        self
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    fn first_decided(&self, lookup: impl Fn(&dyn Translator) -> OptionalName) -> OptionalName {
        self.chain
            .iter()
            .map(|translator| lookup(translator.as_ref()))
            .find(OptionalName::is_decided)
            .unwrap_or(OptionalName::Missing)
    }
}

impl Translator for FirstNotNullTranslator {
    fn type_name(&self, ty: &TypeRef, declaration: Option<&TypeDeclaration>) -> OptionalName {
        let name = self.first_decided(|t| t.type_name(ty, declaration));
        debug!("Type {} translated to {:?}", ty, name);
        name
    }

    fn field_name(&self, field: &FieldDecl) -> OptionalName {
        self.first_decided(|t| t.field_name(field))
    }

    fn method_name(&self, method: &MethodDecl) -> OptionalName {
        self.first_decided(|t| t.method_name(method))
    }
}
