//! Type oracle - the read-only view of a source type system.
//!
//! The model parser never inspects source code directly. It asks a [`TypeOracle`] for the
//! structural facts it needs about a [`TypeRef`]: whether the type is a built-in scalar,
//! and, when the type is declared somewhere in the inputs, its [`TypeDeclaration`] with
//! fields, accessor methods, superclass link, enum constants and doc text.
//!
//! The crate's oracle is [`crate::catalog::TypeCatalog`], filled either from a YAML/JSON
//! catalog file or from Rust sources by [`crate::type_resolver::TypeResolver`].

use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

/// Names treated as built-in scalars regardless of what the oracle declares.
const BUILTIN_TYPES: &[&str] = &[
    // Java primitives and their boxed forms
    "boolean",
    "byte",
    "char",
    "short",
    "int",
    "long",
    "float",
    "double",
    "void",
    "java.lang.String",
    "java.lang.Boolean",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
    "java.lang.Void",
    "java.util.Date",
    // Rust primitives
    "bool",
    "str",
    "String",
    "i8",
    "i16",
    "i32",
    "i64",
    "i128",
    "isize",
    "u8",
    "u16",
    "u32",
    "u64",
    "u128",
    "usize",
    "f32",
    "f64",
    "()",
];

/// Returns true if `qualified_name` names a built-in scalar type.
pub fn is_builtin_type(qualified_name: &str) -> bool {
    BUILTIN_TYPES.contains(&qualified_name)
}

/// A reference to a type as it is written at a use site.
///
/// `java.util.List<com.acme.LineItem>` becomes a `TypeRef` named `java.util.List` with one
/// type argument. Array suffixes (`LineItem[]`) are represented as an `array` type with the
/// element as its argument.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub struct TypeRef {
    /// Fully qualified name without type arguments
    pub qualified_name: String,
    /// Type arguments in declaration order
    pub type_arguments: Vec<TypeRef>,
}

impl TypeRef {
    /// Create a reference to a non-parameterized type
    pub fn new(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            type_arguments: Vec::new(),
        }
    }

    /// Create a reference to a parameterized type
    pub fn generic(qualified_name: impl Into<String>, type_arguments: Vec<TypeRef>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            type_arguments,
        }
    }

    /// Parse a written type such as `java.util.Map<java.lang.String, com.acme.Item>`.
    ///
    /// Parsing is lenient: unbalanced brackets simply end the argument list, and an empty
    /// input yields a reference named `unknown`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if let Some(element) = text.strip_suffix("[]") {
            return Self::generic("array", vec![Self::parse(element)]);
        }

        let Some(open) = text.find('<') else {
            if text.is_empty() {
                return Self::new("unknown");
            }
            return Self::new(text);
        };

        let name = text[..open].trim();
        let inner = match text.rfind('>') {
            Some(close) if close > open => &text[open + 1..close],
            _ => &text[open + 1..],
        };

        let type_arguments = split_top_level(inner)
            .into_iter()
            .filter(|arg| !arg.trim().is_empty())
            .map(Self::parse)
            .collect();

        Self::generic(name, type_arguments)
    }

    /// The first type argument, if this type is parameterized
    pub fn type_argument(&self) -> Option<&TypeRef> {
        self.type_arguments.first()
    }

    /// The last segment of the qualified name (`com.acme.Order` -> `Order`)
    pub fn simple_name(&self) -> &str {
        simple_name(&self.qualified_name)
    }
}

/// The last segment of a `.` or `::` separated name
pub fn simple_name(qualified_name: &str) -> &str {
    let after_path = qualified_name.rsplit("::").next().unwrap_or(qualified_name);
    after_path.rsplit('.').next().unwrap_or(after_path)
}

/// Split generic arguments on commas that are not nested inside `<...>`
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&text[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

impl From<String> for TypeRef {
    fn from(text: String) -> Self {
        Self::parse(&text)
    }
}

impl From<&str> for TypeRef {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name)?;
        if !self.type_arguments.is_empty() {
            let args: Vec<String> = self.type_arguments.iter().map(|a| a.to_string()).collect();
            write!(f, "<{}>", args.join(", "))?;
        }
        Ok(())
    }
}

/// An annotation (or attribute) attached to a type or member.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Annotation {
    /// Qualified annotation name, e.g. `javax.xml.bind.annotation.XmlElement` or `serde`
    pub name: String,
    /// Attribute values by attribute name
    #[serde(default)]
    pub values: IndexMap<String, String>,
}

impl Annotation {
    /// Create an annotation without attribute values
    pub fn marker(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    /// Add an attribute value
    pub fn with_value(mut self, attribute: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(attribute.into(), value.into());
        self
    }
}

/// Anything that carries annotations.
pub trait Annotated {
    /// The annotations attached to this element
    fn annotations(&self) -> &[Annotation];

    /// Whether an annotation with the given name is present
    fn has_annotation(&self, name: &str) -> bool {
        self.annotations().iter().any(|a| a.name == name)
    }

    /// The value of `attribute` on the first annotation named `name` that defines it
    fn annotation_value(&self, name: &str, attribute: &str) -> Option<&str> {
        self.annotations()
            .iter()
            .filter(|a| a.name == name)
            .find_map(|a| a.values.get(attribute))
            .map(String::as_str)
    }
}

/// A data member declared on a type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(rename = "type")]
    pub declared_type: TypeRef,
    /// Raw doc comment text
    #[serde(default)]
    pub doc: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, declared_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            declared_type,
            doc: String::new(),
            annotations: Vec::new(),
        }
    }
}

impl Annotated for FieldDecl {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// A method declared on a type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(rename = "returns")]
    pub return_type: TypeRef,
    /// Text of the documented return value (`@return` tag), if any
    #[serde(default)]
    pub return_doc: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            return_type,
            return_doc: None,
            annotations: Vec::new(),
        }
    }
}

impl Annotated for MethodDecl {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// The superclass link of a declaration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Superclass {
    /// Top of the chain
    #[default]
    Root,
    /// Inherits the data members of another type
    Extends(TypeRef),
}

/// Whether a declaration is a regular class or an enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclarationKind {
    Class,
    /// Enumeration with its constant names in declaration order
    Enum { constants: Vec<String> },
}

/// Class-level declaration of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub qualified_name: String,
    pub kind: DeclarationKind,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub superclass: Superclass,
    pub annotations: Vec<Annotation>,
}

impl TypeDeclaration {
    /// Create an empty class declaration
    pub fn class(qualified_name: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            kind: DeclarationKind::Class,
            fields: Vec::new(),
            methods: Vec::new(),
            superclass: Superclass::Root,
            annotations: Vec::new(),
        }
    }

    /// Create an enum declaration with the given constants
    pub fn enumeration(qualified_name: impl Into<String>, constants: Vec<String>) -> Self {
        Self {
            kind: DeclarationKind::Enum { constants },
            ..Self::class(qualified_name)
        }
    }

    pub fn with_field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_superclass(mut self, superclass: TypeRef) -> Self {
        self.superclass = Superclass::Extends(superclass);
        self
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn is_enum(&self) -> bool {
        matches!(self.kind, DeclarationKind::Enum { .. })
    }

    /// Enum constant names in declaration order; empty for classes
    pub fn enum_constants(&self) -> &[String] {
        match &self.kind {
            DeclarationKind::Enum { constants } => constants,
            DeclarationKind::Class => &[],
        }
    }

    /// A reference to the declared type itself
    pub fn type_ref(&self) -> TypeRef {
        TypeRef::new(self.qualified_name.clone())
    }
}

impl Annotated for TypeDeclaration {
    fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }
}

/// Read-only provider of structural facts about types.
///
/// Implementations must be side-effect free: the model parser may ask about the same type
/// many times during one parse.
pub trait TypeOracle {
    /// The class-level declaration for `ty`, or `None` when the type is not declared in
    /// the inputs (primitive arrays, library types, unresolvable references).
    fn declaration(&self, ty: &TypeRef) -> Option<&TypeDeclaration>;

    /// Whether `ty` is a built-in scalar
    fn is_primitive(&self, ty: &TypeRef) -> bool {
        is_builtin_type(&ty.qualified_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_type() {
        let ty = TypeRef::parse("com.acme.Order");
        assert_eq!(ty.qualified_name, "com.acme.Order");
        assert!(ty.type_arguments.is_empty());
        assert_eq!(ty.simple_name(), "Order");
    }

    #[test]
    fn test_parse_generic_type() {
        let ty = TypeRef::parse("java.util.List<com.acme.LineItem>");
        assert_eq!(ty.qualified_name, "java.util.List");
        assert_eq!(ty.type_argument(), Some(&TypeRef::new("com.acme.LineItem")));
    }

    #[test]
    fn test_parse_nested_generic_arguments() {
        let ty = TypeRef::parse("java.util.Map<java.lang.String, java.util.List<com.acme.Tag>>");
        assert_eq!(ty.qualified_name, "java.util.Map");
        assert_eq!(ty.type_arguments.len(), 2);
        assert_eq!(ty.type_arguments[0].qualified_name, "java.lang.String");
        assert_eq!(ty.type_arguments[1].qualified_name, "java.util.List");
        assert_eq!(
            ty.type_arguments[1].type_argument().map(|t| t.qualified_name.as_str()),
            Some("com.acme.Tag")
        );
    }

    #[test]
    fn test_parse_array_suffix() {
        let ty = TypeRef::parse("com.acme.LineItem[]");
        assert_eq!(ty.qualified_name, "array");
        assert_eq!(ty.type_argument(), Some(&TypeRef::new("com.acme.LineItem")));
    }

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!(TypeRef::parse("").qualified_name, "unknown");

        let unbalanced = TypeRef::parse("Vec<Item");
        assert_eq!(unbalanced.qualified_name, "Vec");
        assert_eq!(unbalanced.type_argument(), Some(&TypeRef::new("Item")));
    }

    #[test]
    fn test_display_round_trips_written_form() {
        let written = "java.util.Map<java.lang.String, java.util.List<com.acme.Tag>>";
        assert_eq!(TypeRef::parse(written).to_string(), written);
    }

    #[test]
    fn test_simple_name_handles_rust_paths() {
        assert_eq!(simple_name("chrono::DateTime"), "DateTime");
        assert_eq!(simple_name("Order"), "Order");
        assert_eq!(simple_name("com.acme.Order"), "Order");
    }

    #[test]
    fn test_builtin_types() {
        assert!(is_builtin_type("int"));
        assert!(is_builtin_type("java.lang.String"));
        assert!(is_builtin_type("u64"));
        assert!(!is_builtin_type("com.acme.Order"));
        assert!(!is_builtin_type("java.util.List"));
    }

    #[test]
    fn test_annotation_value_lookup() {
        let field = FieldDecl {
            annotations: vec![
                Annotation::marker("javax.xml.bind.annotation.XmlTransient"),
                Annotation::marker("javax.xml.bind.annotation.XmlElement")
                    .with_value("name", "order_id"),
            ],
            ..FieldDecl::new("id", TypeRef::new("long"))
        };

        assert!(field.has_annotation("javax.xml.bind.annotation.XmlTransient"));
        assert_eq!(
            field.annotation_value("javax.xml.bind.annotation.XmlElement", "name"),
            Some("order_id")
        );
        assert_eq!(
            field.annotation_value("javax.xml.bind.annotation.XmlElement", "namespace"),
            None
        );
    }

    #[test]
    fn test_enum_declaration() {
        let decl = TypeDeclaration::enumeration(
            "com.acme.Status",
            vec!["ACTIVE".to_string(), "CLOSED".to_string()],
        );
        assert!(decl.is_enum());
        assert_eq!(decl.enum_constants(), &["ACTIVE".to_string(), "CLOSED".to_string()]);
        assert_eq!(decl.superclass, Superclass::Root);

        let class = TypeDeclaration::class("com.acme.Order");
        assert!(!class.is_enum());
        assert!(class.enum_constants().is_empty());
    }
}
