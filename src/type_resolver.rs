use crate::catalog::TypeCatalog;
use crate::oracle::{Annotation, FieldDecl, MethodDecl, Superclass, TypeDeclaration, TypeRef};
use crate::parser::ParsedFile;
use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;

/// Type resolver - builds a [`TypeCatalog`] from parsed Rust source files.
///
/// Rust items are mapped onto the declaration model as follows:
///
/// - a struct with named fields becomes a class; its `///` comments become field docs
///   and its attributes become annotations (`#[serde(rename = "x")]` is an annotation
///   `serde` with value `rename = x`, a bare flag like `#[serde(skip)]` is a marker
///   annotation `serde::skip`)
/// - the first `#[serde(flatten)]` field becomes the superclass link
/// - an enum becomes an enumeration of its variant names (honouring `serde(rename)`)
/// - public `&self` methods without further arguments in inherent `impl` blocks become
///   accessors; receiver-less functions are recorded as static
pub struct TypeResolver {
    parsed_files: Vec<ParsedFile>,
}

impl TypeResolver {
    pub fn new(parsed_files: Vec<ParsedFile>) -> Self {
        debug!("Initializing TypeResolver with {} files", parsed_files.len());
        Self { parsed_files }
    }

    /// Resolve every struct and enum in the parsed files into a catalog
    pub fn resolve(&self) -> TypeCatalog {
        let declared = self.declared_names();
        let mut declarations: IndexMap<String, TypeDeclaration> = IndexMap::new();

        for parsed_file in &self.parsed_files {
            for item in &parsed_file.syntax_tree.items {
                let declaration = match item {
                    syn::Item::Struct(item_struct) => {
                        Some(Self::resolve_struct(item_struct, &declared))
                    }
                    syn::Item::Enum(item_enum) => Some(Self::resolve_enum(item_enum)),
                    _ => None,
                };
                if let Some(declaration) = declaration {
                    declarations
                        .entry(declaration.qualified_name.clone())
                        .or_insert(declaration);
                }
            }
        }

        for parsed_file in &self.parsed_files {
            for item in &parsed_file.syntax_tree.items {
                if let syn::Item::Impl(item_impl) = item {
                    Self::resolve_impl(item_impl, &declared, &mut declarations);
                }
            }
        }

        let mut catalog = TypeCatalog::new();
        for (_, declaration) in declarations {
            catalog.insert(declaration);
        }
        debug!("Resolved {} declarations", catalog.len());
        catalog
    }

    fn declared_names(&self) -> HashSet<String> {
        self.parsed_files
            .iter()
            .flat_map(|f| f.syntax_tree.items.iter())
            .filter_map(|item| match item {
                syn::Item::Struct(s) => Some(s.ident.unraw().to_string()),
                syn::Item::Enum(e) => Some(e.ident.unraw().to_string()),
                _ => None,
            })
            .collect()
    }

    fn resolve_struct(item_struct: &syn::ItemStruct, declared: &HashSet<String>) -> TypeDeclaration {
        let name = item_struct.ident.unraw().to_string();
        debug!("Resolving struct: {}", name);

        let mut declaration = TypeDeclaration::class(name.as_str());
        declaration.annotations = Self::annotations(&item_struct.attrs);

        if let syn::Fields::Named(named_fields) = &item_struct.fields {
            for field in &named_fields.named {
                let Some(ident) = &field.ident else {
                    continue;
                };
                let annotations = Self::annotations(&field.attrs);
                let declared_type = Self::type_ref(&field.ty, declared, Some(name.as_str()));

                let is_flatten = annotations.iter().any(|a| a.name == "serde::flatten");
                if is_flatten && declaration.superclass == Superclass::Root {
                    debug!("Field {} of {} is flattened, using it as superclass", ident, name);
                    declaration.superclass = Superclass::Extends(declared_type);
                    continue;
                }

                declaration.fields.push(FieldDecl {
                    name: ident.unraw().to_string(),
                    is_static: false,
                    declared_type,
                    doc: doc_text(&field.attrs),
                    annotations,
                });
            }
        }

        debug!("Resolved {} fields", declaration.fields.len());
        declaration
    }

    fn resolve_enum(item_enum: &syn::ItemEnum) -> TypeDeclaration {
        let name = item_enum.ident.unraw().to_string();
        debug!("Resolving enum: {}", name);

        let constants = item_enum
            .variants
            .iter()
            .map(|variant| {
                let annotations = Self::annotations(&variant.attrs);
                annotations
                    .iter()
                    .filter(|a| a.name == "serde")
                    .find_map(|a| a.values.get("rename").cloned())
                    .unwrap_or_else(|| variant.ident.unraw().to_string())
            })
            .collect();

        TypeDeclaration {
            annotations: Self::annotations(&item_enum.attrs),
            ..TypeDeclaration::enumeration(name, constants)
        }
    }

    /// Attach the accessors of an inherent impl block to the declaration it implements
    fn resolve_impl(
        item_impl: &syn::ItemImpl,
        declared: &HashSet<String>,
        declarations: &mut IndexMap<String, TypeDeclaration>,
    ) {
        if item_impl.trait_.is_some() {
            return;
        }
        let syn::Type::Path(self_ty) = item_impl.self_ty.as_ref() else {
            return;
        };
        let Some(segment) = self_ty.path.segments.last() else {
            return;
        };
        let type_name = segment.ident.unraw().to_string();
        let Some(declaration) = declarations.get_mut(&type_name) else {
            debug!("Impl block for undeclared type {}, skipping", type_name);
            return;
        };

        for impl_item in &item_impl.items {
            let syn::ImplItem::Fn(method) = impl_item else {
                continue;
            };
            if let Some(accessor) = Self::resolve_accessor(method, declared, &type_name) {
                declaration.methods.push(accessor);
            }
        }
    }

    /// A public, non-generic function taking at most a receiver and returning a value
    fn resolve_accessor(
        method: &syn::ImplItemFn,
        declared: &HashSet<String>,
        self_name: &str,
    ) -> Option<MethodDecl> {
        let sig = &method.sig;
        if !matches!(method.vis, syn::Visibility::Public(_)) || !sig.generics.params.is_empty() {
            return None;
        }
        let has_arguments = sig
            .inputs
            .iter()
            .any(|input| matches!(input, syn::FnArg::Typed(_)));
        if has_arguments {
            return None;
        }
        let syn::ReturnType::Type(_, return_type) = &sig.output else {
            return None;
        };

        Some(MethodDecl {
            name: sig.ident.unraw().to_string(),
            is_static: sig.receiver().is_none(),
            return_type: Self::type_ref(return_type, declared, Some(self_name)),
            return_doc: return_doc(&doc_lines(&method.attrs)),
            annotations: Self::annotations(&method.attrs),
        })
    }

    /// Map a written Rust type onto a [`TypeRef`].
    ///
    /// Paths to types declared in the inputs are named by their identifier alone so the
    /// catalog lookup matches however the path was written; other paths keep all segments.
    fn type_ref(ty: &syn::Type, declared: &HashSet<String>, self_name: Option<&str>) -> TypeRef {
        match ty {
            syn::Type::Path(type_path) if type_path.qself.is_none() => {
                let path = &type_path.path;
                let Some(last) = path.segments.last() else {
                    return TypeRef::new("unknown");
                };
                let ident = last.ident.unraw().to_string();

                let name = match self_name {
                    Some(self_name) if ident == "Self" => self_name.to_string(),
                    _ if declared.contains(&ident) => ident,
                    _ => path
                        .segments
                        .iter()
                        .map(|s| s.ident.unraw().to_string())
                        .collect::<Vec<_>>()
                        .join("::"),
                };

                let mut type_arguments = Vec::new();
                if let syn::PathArguments::AngleBracketed(args) = &last.arguments {
                    for arg in &args.args {
                        if let syn::GenericArgument::Type(inner) = arg {
                            type_arguments.push(Self::type_ref(inner, declared, self_name));
                        }
                    }
                }

                TypeRef::generic(name, type_arguments)
            }
            syn::Type::Reference(reference) => Self::type_ref(&reference.elem, declared, self_name),
            syn::Type::Paren(paren) => Self::type_ref(&paren.elem, declared, self_name),
            syn::Type::Group(group) => Self::type_ref(&group.elem, declared, self_name),
            syn::Type::Slice(slice) => {
                TypeRef::generic("array", vec![Self::type_ref(&slice.elem, declared, self_name)])
            }
            syn::Type::Array(array) => {
                TypeRef::generic("array", vec![Self::type_ref(&array.elem, declared, self_name)])
            }
            syn::Type::Tuple(tuple) if tuple.elems.is_empty() => TypeRef::new("()"),
            syn::Type::Tuple(_) => TypeRef::new("tuple"),
            _ => TypeRef::new("unknown"),
        }
    }

    /// Convert attributes (other than doc comments) into annotations
    fn annotations(attrs: &[syn::Attribute]) -> Vec<Annotation> {
        let mut annotations = Vec::new();

        for attr in attrs {
            if attr.path().is_ident("doc") {
                continue;
            }
            let name = path_string(attr.path());

            match &attr.meta {
                syn::Meta::Path(_) => annotations.push(Annotation::marker(name)),
                syn::Meta::NameValue(name_value) => {
                    let mut annotation = Annotation::marker(name);
                    if let Some(value) = expr_string(&name_value.value) {
                        annotation.values.insert("value".to_string(), value);
                    }
                    annotations.push(annotation);
                }
                syn::Meta::List(_) => {
                    let mut annotation = Annotation::marker(name.as_str());
                    let mut flags = Vec::new();

                    let parsed = attr.parse_nested_meta(|meta| {
                        let key = path_string(&meta.path);
                        if meta.input.peek(syn::Token![=]) {
                            let value: syn::Expr = meta.value()?.parse()?;
                            if let Some(value) = expr_string(&value) {
                                annotation.values.insert(key, value);
                            }
                        } else if meta.input.peek(syn::token::Paren) {
                            meta.parse_nested_meta(skip_nested_meta)?;
                        } else {
                            flags.push(Annotation::marker(format!("{}::{}", name, key)));
                        }
                        Ok(())
                    });
                    if let Err(e) = parsed {
                        debug!("Attribute {} only partially understood: {}", name, e);
                    }

                    annotations.push(annotation);
                    annotations.extend(flags);
                }
            }
        }

        annotations
    }
}

fn skip_nested_meta(meta: ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.parse_nested_meta(skip_nested_meta)?;
    }
    Ok(())
}

fn path_string(path: &syn::Path) -> String {
    path.segments
        .iter()
        .map(|s| s.ident.unraw().to_string())
        .collect::<Vec<_>>()
        .join("::")
}

/// String form of a literal expression
fn expr_string(expr: &syn::Expr) -> Option<String> {
    let syn::Expr::Lit(expr_lit) = expr else {
        return None;
    };
    match &expr_lit.lit {
        syn::Lit::Str(s) => Some(s.value()),
        syn::Lit::Int(i) => Some(i.base10_digits().to_string()),
        syn::Lit::Float(f) => Some(f.base10_digits().to_string()),
        syn::Lit::Bool(b) => Some(b.value.to_string()),
        syn::Lit::Char(c) => Some(c.value().to_string()),
        _ => None,
    }
}

/// Doc comment lines, with the single space after `///` removed
fn doc_lines(attrs: &[syn::Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            syn::Meta::NameValue(name_value) => expr_string(&name_value.value),
            _ => None,
        })
        .flat_map(|text| {
            text.lines()
                .map(|line| line.strip_prefix(' ').unwrap_or(line).to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn doc_text(attrs: &[syn::Attribute]) -> String {
    doc_lines(attrs).join("\n").trim().to_string()
}

/// Text documenting a return value: an `@return` line, or the paragraph under a
/// `# Returns` heading
fn return_doc(lines: &[String]) -> Option<String> {
    if let Some(text) = lines
        .iter()
        .find_map(|line| line.trim().strip_prefix("@return"))
    {
        return Some(text.trim().to_string());
    }

    let heading = lines
        .iter()
        .position(|line| line.trim().eq_ignore_ascii_case("# returns"))?;
    let paragraph: Vec<&str> = lines[heading + 1..]
        .iter()
        .map(|line| line.trim())
        .skip_while(|line| line.is_empty())
        .take_while(|line| !line.is_empty() && !line.starts_with('#'))
        .collect();

    if paragraph.is_empty() {
        None
    } else {
        Some(paragraph.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{Annotated, TypeOracle};
    use crate::parser::AstParser;
    use std::path::Path;

    fn resolve(code: &str) -> TypeCatalog {
        let parsed = AstParser::parse_str(Path::new("test.rs"), code).unwrap();
        TypeResolver::new(vec![parsed]).resolve()
    }

    fn declaration<'a>(catalog: &'a TypeCatalog, name: &str) -> &'a TypeDeclaration {
        catalog
            .declaration(&TypeRef::new(name))
            .unwrap_or_else(|| panic!("{} not resolved", name))
    }

    #[test]
    fn test_resolve_simple_struct() {
        let catalog = resolve(
            r#"
            pub struct User {
                /// Unique id
                pub id: u32,
                /// Display name
                /// shown in the UI
                pub name: String,
                active: bool,
            }
            "#,
        );

        let user = declaration(&catalog, "User");
        let names: Vec<&str> = user.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "active"]);
        assert_eq!(user.fields[0].declared_type, TypeRef::new("u32"));
        assert_eq!(user.fields[0].doc, "Unique id");
        assert_eq!(user.fields[1].doc, "Display name\nshown in the UI");
        assert_eq!(user.fields[2].doc, "");
        assert_eq!(user.superclass, Superclass::Root);
    }

    #[test]
    fn test_type_paths_and_generics() {
        let catalog = resolve(
            r#"
            pub struct Post {
                pub tags: Vec<String>,
                pub author: Option<Box<crate::models::User>>,
                pub created: chrono::DateTime<chrono::Utc>,
                pub scores: [f32; 4],
                pub title: &'static str,
            }
            pub struct User { pub id: u32 }
            "#,
        );

        let post = declaration(&catalog, "Post");
        let types: Vec<String> = post.fields.iter().map(|f| f.declared_type.to_string()).collect();
        assert_eq!(
            types,
            vec![
                "Vec<String>",
                "Option<Box<User>>",
                "chrono::DateTime<chrono::Utc>",
                "array<f32>",
                "str",
            ]
        );
    }

    #[test]
    fn test_serde_attributes_become_annotations() {
        let catalog = resolve(
            r#"
            #[derive(Serialize)]
            #[serde(rename = "user")]
            pub struct User {
                #[serde(rename = "userName", default)]
                pub name: String,
                #[serde(skip)]
                pub password: String,
                #[validate(length(min = 1, max = 20))]
                pub nick: String,
            }
            "#,
        );

        let user = declaration(&catalog, "User");
        assert_eq!(user.annotation_value("serde", "rename"), Some("user"));
        assert!(user.has_annotation("derive::Serialize"));

        let name = &user.fields[0];
        assert_eq!(name.annotation_value("serde", "rename"), Some("userName"));
        assert!(name.has_annotation("serde::default"));

        assert!(user.fields[1].has_annotation("serde::skip"));
        assert!(user.fields[2].has_annotation("validate"));
    }

    #[test]
    fn test_flatten_becomes_superclass() {
        let catalog = resolve(
            r#"
            pub struct Employee {
                #[serde(flatten)]
                pub person: Person,
                pub salary: u64,
            }
            pub struct Person { pub name: String }
            "#,
        );

        let employee = declaration(&catalog, "Employee");
        assert_eq!(employee.superclass, Superclass::Extends(TypeRef::new("Person")));
        assert_eq!(employee.fields.len(), 1);
        assert_eq!(employee.fields[0].name, "salary");
    }

    #[test]
    fn test_resolve_enum() {
        let catalog = resolve(
            r#"
            pub enum Status {
                Active,
                #[serde(rename = "CLOSED")]
                Closed,
                Pending { since: u64 },
            }
            "#,
        );

        let status = declaration(&catalog, "Status");
        assert!(status.is_enum());
        assert_eq!(
            status.enum_constants(),
            &["Active".to_string(), "CLOSED".to_string(), "Pending".to_string()]
        );
    }

    #[test]
    fn test_impl_accessors() {
        let catalog = resolve(
            r#"
            pub struct Invoice { lines: Vec<u64> }

            impl Invoice {
                /// Sum of all lines.
                ///
                /// # Returns
                ///
                /// the invoice total
                /// in cents
                pub fn total(&self) -> u64 { 0 }

                /// @return a copy
                pub fn copy(&self) -> Self { todo!() }

                pub fn new() -> Self { todo!() }

                pub fn line(&self, index: usize) -> u64 { 0 }

                pub fn clear(&mut self) {}

                fn secret(&self) -> u64 { 0 }
            }

            impl Clone for Invoice {
                fn clone(&self) -> Self { todo!() }
            }
            "#,
        );

        let invoice = declaration(&catalog, "Invoice");
        let methods: Vec<(&str, bool)> = invoice
            .methods
            .iter()
            .map(|m| (m.name.as_str(), m.is_static))
            .collect();
        assert_eq!(methods, vec![("total", false), ("copy", false), ("new", true)]);

        assert_eq!(
            invoice.methods[0].return_doc.as_deref(),
            Some("the invoice total in cents")
        );
        assert_eq!(invoice.methods[1].return_doc.as_deref(), Some("a copy"));
        assert_eq!(invoice.methods[1].return_type, TypeRef::new("Invoice"));
        assert_eq!(invoice.methods[2].return_doc, None);
    }

    #[test]
    fn test_first_declaration_wins_across_files() {
        let first = AstParser::parse_str(Path::new("a.rs"), "pub struct Item { pub a: u8 }").unwrap();
        let second = AstParser::parse_str(Path::new("b.rs"), "pub enum Item { X }").unwrap();

        let catalog = TypeResolver::new(vec![first, second]).resolve();
        assert_eq!(catalog.len(), 1);
        assert!(!declaration(&catalog, "Item").is_enum());
    }

    #[test]
    fn test_return_doc_without_returns_section() {
        let lines = vec!["Just a description.".to_string()];
        assert_eq!(return_doc(&lines), None);
    }
}
