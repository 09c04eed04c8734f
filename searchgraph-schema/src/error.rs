use thiserror::Error;

use crate::dsl::DslBackend;

/// Schema-layer errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error(
        "no document-modeling backend available; enable one of the cargo features: \
         `es-dsl` (Elasticsearch 8.18+, DSL built into the client), \
         `es-dsl-legacy` (Elasticsearch 7.x-8.17, separate DSL package), or \
         `os-dsl` (OpenSearch document/field helpers)"
    )]
    DslUnavailable,

    #[error("{backend} backend has no primitive named '{name}'")]
    UnknownPrimitive { backend: DslBackend, name: String },

    #[error("cannot map field of class '{class}': {reason}")]
    UnmappableField { class: String, reason: String },

    #[error("invalid {scalar} value: {reason}")]
    InvalidScalar {
        scalar: &'static str,
        reason: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;
