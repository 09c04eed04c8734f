//! Schema generation for Elasticsearch/OpenSearch-backed GraphQL types.
//!
//! The crate turns document schemas into output-type declarations:
//!
//! - [`dsl`] resolves which document-modeling backend is in use (modern
//!   Elasticsearch, the legacy standalone package, or OpenSearch) and
//!   exposes a uniform primitive namespace over it.
//! - [`mapper`] converts declared field objects and raw index mappings
//!   into [`GraphType`] descriptors, including nested shapes,
//!   multi-valued fields and optionality.
//! - [`inspector`] classifies a declared type by where its fields should
//!   come from: a document class, manual annotations, live mapping
//!   introspection, or a hybrid.
//! - [`scalars`] handles values of the custom scalar types (geo points
//!   and shapes, IP addresses, completion suggestions, token counts).

pub mod dsl;
pub mod error;
pub mod fields;
pub mod inspector;
pub mod mapper;
pub mod scalars;
pub mod types;

pub use dsl::{DslBackend, DslNamespace, DslResolver, FieldClass, ProviderCandidate, DSL_ENV_VAR};
pub use error::{Result, SchemaError};
pub use fields::{
    merge_fields, CustomField, CustomFieldKind, DocumentSchema, DslField, TypeDecl,
};
pub use inspector::{TypeInfo, TypeInspector, TypeSource};
pub use mapper::FieldMapper;
pub use scalars::GeoPointValue;
pub use types::{GraphScalar, GraphType};
