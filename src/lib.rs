//! Model doclet - document the data models reachable from API types.
//!
//! Given a root type, the library walks every type reachable through its fields,
//! inherited fields and accessor methods, and records one [`model::Model`] per
//! non-opaque type it meets, with one property per documented member.
//!
//! # Architecture
//!
//! 1. [`oracle`] - declaration model and the [`oracle::TypeOracle`] lookup trait
//! 2. [`catalog`] - declarative YAML/JSON type catalogs implementing the oracle
//! 3. [`scanner`], [`parser`], [`type_resolver`] - build a catalog from Rust sources
//! 4. [`detector`] - detects which naming annotation conventions the types use
//! 5. [`translator`] - maps types and members to their documented names
//! 6. [`opacity`] - decides which types are never expanded
//! 7. [`model_parser`] - the recursive type-graph walker producing a [`model::ModelSet`]
//! 8. [`definitions_builder`], [`serializer`] - the YAML/JSON definitions document
//! 9. [`config`], [`cli`] - options and the command-line front end
//!
//! # Example Usage
//!
//! ```
//! use model_doclet::{
//!     catalog::TypeCatalog,
//!     config::ParserOptions,
//!     model_parser::ApiModelParser,
//!     oracle::TypeRef,
//! };
//!
//! let catalog = TypeCatalog::from_yaml_str(
//!     r#"
//! types:
//!   - name: com.acme.Order
//!     fields:
//!       - { name: id, type: java.util.UUID }
//!       - { name: items, type: "java.util.List<com.acme.LineItem>" }
//!   - name: com.acme.LineItem
//!     fields:
//!       - { name: sku, type: java.lang.String }
//! "#,
//! )
//! .unwrap();
//!
//! let options = ParserOptions::default();
//! let policy = options.opacity_policy();
//! let translator = options.translator(&[]);
//! let parser = ApiModelParser::new(&policy, &translator, &catalog);
//!
//! let models = parser.parse(&TypeRef::new("com.acme.Order"));
//! assert_eq!(models.ids(), vec!["Order", "LineItem"]);
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod definitions_builder;
pub mod detector;
pub mod error;
pub mod model;
pub mod model_parser;
pub mod opacity;
pub mod oracle;
pub mod parser;
pub mod scanner;
pub mod serializer;
pub mod translator;
pub mod type_resolver;
