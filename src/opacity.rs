use crate::oracle::{TypeOracle, TypeRef};
use log::debug;

/// Default platform-reserved package prefix
pub const DEFAULT_RESERVED_PREFIX: &str = "javax.";
/// Default universal base object type
pub const DEFAULT_BASE_OBJECT: &str = "java.lang.Object";

/// Why a type is treated as terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalReason {
    Primitive,
    ReservedPrefix,
    BaseObject,
    OpaqueType,
    OpaquePackage,
    Undeclared,
}

/// Opacity policy - decides which types the model parser never descends into.
///
/// Opaque types still appear as property types in the output, by name, but never get a
/// model of their own.
#[derive(Debug, Clone)]
pub struct OpacityPolicy {
    reserved_prefixes: Vec<String>,
    base_object: String,
    opaque_types: Vec<String>,
    opaque_packages: Vec<String>,
}

impl OpacityPolicy {
    /// Create a policy with the given opaque lists and the default platform rules
    pub fn new(opaque_types: Vec<String>, opaque_packages: Vec<String>) -> Self {
        Self {
            reserved_prefixes: vec![DEFAULT_RESERVED_PREFIX.to_string()],
            base_object: DEFAULT_BASE_OBJECT.to_string(),
            opaque_types,
            opaque_packages,
        }
    }

    pub fn with_reserved_prefixes(mut self, reserved_prefixes: Vec<String>) -> Self {
        self.reserved_prefixes = reserved_prefixes;
        self
    }

    pub fn with_base_object(mut self, base_object: impl Into<String>) -> Self {
        self.base_object = base_object.into();
        self
    }

    /// Whether `ty` must not be expanded into a model
    pub fn is_terminal(&self, ty: &TypeRef, oracle: &dyn TypeOracle) -> bool {
        match self.terminal_reason(ty, oracle) {
            Some(reason) => {
                debug!("Type {} is terminal: {:?}", ty.qualified_name, reason);
                true
            }
            None => false,
        }
    }

    /// The first rule that makes `ty` terminal, in evaluation order
    pub fn terminal_reason(&self, ty: &TypeRef, oracle: &dyn TypeOracle) -> Option<TerminalReason> {
        let name = ty.qualified_name.as_str();

        if oracle.is_primitive(ty) {
            Some(TerminalReason::Primitive)
        } else if starts_with_any(&self.reserved_prefixes, name) {
            Some(TerminalReason::ReservedPrefix)
        } else if name == self.base_object {
            Some(TerminalReason::BaseObject)
        } else if self.opaque_types.iter().any(|t| t == name) {
            Some(TerminalReason::OpaqueType)
        } else if starts_with_any(&self.opaque_packages, name) {
            Some(TerminalReason::OpaquePackage)
        } else if oracle.declaration(ty).is_none() {
            Some(TerminalReason::Undeclared)
        } else {
            None
        }
    }
}

/// Empty prefixes never match
fn starts_with_any(prefixes: &[String], name: &str) -> bool {
    prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && name.starts_with(prefix.as_str()))
}
