//! Model parser - walks the type graph reachable from a root type.
//!
//! Starting at the root, every non-terminal type contributes one [`Model`] whose properties
//! are its own non-static fields, the fields inherited along its superclass chain, and its
//! non-static accessor methods. Every member type (and the element type of a parameterized
//! member type) is visited in turn.
//!
//! Models are deduplicated by their *translated name*, not by type identity: two distinct
//! types that translate to the same name produce a single model, the first one visited.
//! The same check is what makes self-referential and mutually-referential type graphs
//! terminate, together with the [`OpacityPolicy`].

use crate::model::{Model, ModelSet, Property};
use crate::opacity::OpacityPolicy;
use crate::oracle::{FieldDecl, Superclass, TypeDeclaration, TypeOracle, TypeRef};
use crate::translator::Translator;
use indexmap::IndexMap;
use log::debug;
use std::collections::HashSet;

/// Recursive model extractor.
///
/// The parser holds no per-parse state; every call to [`ApiModelParser::parse`] starts
/// from an empty [`ModelSet`].
pub struct ApiModelParser<'a> {
    policy: &'a OpacityPolicy,
    translator: &'a dyn Translator,
    oracle: &'a dyn TypeOracle,
}

/// A discovered member's declared type together with its doc text
struct TypeHolder<'a> {
    ty: &'a TypeRef,
    description: String,
}

impl<'a> ApiModelParser<'a> {
    pub fn new(
        policy: &'a OpacityPolicy,
        translator: &'a dyn Translator,
        oracle: &'a dyn TypeOracle,
    ) -> Self {
        Self {
            policy,
            translator,
            oracle,
        }
    }

    /// Collect the models reachable from `root`, in discovery order
    pub fn parse(&self, root: &TypeRef) -> ModelSet {
        debug!("Parsing models reachable from {}", root);
        let mut models = ModelSet::new();
        self.parse_model(root, &mut models);
        debug!("Found {} models for {}", models.len(), root);
        models
    }

    fn parse_model(&self, ty: &TypeRef, models: &mut ModelSet) {
        if self.policy.is_terminal(ty, self.oracle) {
            return;
        }
        let oracle = self.oracle;
        let Some(declaration) = oracle.declaration(ty) else {
            return;
        };
        let Some(id) = self.type_name(ty) else {
            debug!("Type {} has no name, skipping", ty);
            return;
        };
        if models.contains_id(&id) {
            return;
        }

        let types = self.find_referenced_types(declaration);
        let elements = self.find_referenced_elements(&types);
        if elements.is_empty() {
            debug!("Type {} has no documented properties", ty);
            return;
        }

        debug!("Registering model {} for {}", id, ty);
        models.insert(Model::new(id, elements));
        self.parse_nested_models(&types, models);
    }

    /// Members by resolved name: fields first (own, then inherited), then accessors.
    /// The first member claiming a name keeps it.
    fn find_referenced_types(
        &self,
        declaration: &'a TypeDeclaration,
    ) -> IndexMap<String, TypeHolder<'a>> {
        let mut elements = IndexMap::new();

        for field in self.all_fields(declaration) {
            if field.is_static {
                continue;
            }
            let Some(name) = self.translator.field_name(field).into_value() else {
                continue;
            };
            if elements.contains_key(&name) || !self.is_nameable(&field.declared_type) {
                continue;
            }
            elements.insert(
                name,
                TypeHolder {
                    ty: &field.declared_type,
                    description: field.doc.clone(),
                },
            );
        }

        for method in &declaration.methods {
            if method.is_static {
                continue;
            }
            let Some(name) = self.translator.method_name(method).into_value() else {
                continue;
            };
            if elements.contains_key(&name) || !self.is_nameable(&method.return_type) {
                continue;
            }
            elements.insert(
                name,
                TypeHolder {
                    ty: &method.return_type,
                    description: method.return_doc.clone().unwrap_or_default(),
                },
            );
        }

        elements
    }

    /// Own fields followed by the fields of every ancestor
    fn all_fields(&self, declaration: &'a TypeDeclaration) -> Vec<&'a FieldDecl> {
        let oracle = self.oracle;
        let mut fields = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(declaration);

        while let Some(declaration) = current {
            // stop on cyclic superclass links
            if !seen.insert(declaration.qualified_name.as_str()) {
                break;
            }
            fields.extend(declaration.fields.iter());
            current = match &declaration.superclass {
                Superclass::Root => None,
                Superclass::Extends(parent) => oracle.declaration(parent),
            };
        }

        fields
    }

    fn find_referenced_elements(
        &self,
        types: &IndexMap<String, TypeHolder<'a>>,
    ) -> IndexMap<String, Property> {
        types
            .iter()
            .map(|(name, holder)| (name.clone(), self.classify(holder)))
            .collect()
    }

    fn classify(&self, holder: &TypeHolder<'a>) -> Property {
        match self.oracle.declaration(holder.ty) {
            Some(declaration) if declaration.is_enum() => Property::enumeration(
                declaration.enum_constants().to_vec(),
                holder.description.clone(),
            ),
            _ => {
                let container_of = holder
                    .ty
                    .type_argument()
                    .and_then(|argument| self.type_name(argument));
                let type_name = self
                    .type_name(holder.ty)
                    .unwrap_or_else(|| holder.ty.simple_name().to_string());
                Property::typed(type_name, holder.description.clone(), container_of)
            }
        }
    }

    fn parse_nested_models(&self, types: &IndexMap<String, TypeHolder<'a>>, models: &mut ModelSet) {
        for holder in types.values() {
            self.parse_model(holder.ty, models);
            if let Some(argument) = holder.ty.type_argument() {
                self.parse_model(argument, models);
            }
        }
    }

    fn type_name(&self, ty: &TypeRef) -> Option<String> {
        self.translator
            .type_name(ty, self.oracle.declaration(ty))
            .into_value()
    }

    fn is_nameable(&self, ty: &TypeRef) -> bool {
        let nameable = self.type_name(ty).is_some();
        if !nameable {
            debug!("Member type {} has no name, dropping member", ty);
        }
        nameable
    }
}
