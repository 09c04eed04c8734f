//! Document-modeling backend resolution.
//!
//! Several mutually incompatible document-modeling packages can provide the
//! declarative field primitives (`Document`, `Text`, `Keyword`, ...). This
//! module discovers which one is present and exposes a single stable
//! namespace regardless of which was found. Which backend "is present" is a
//! compile-time fact here (cargo features), probed in a fixed priority
//! order at resolver construction, optionally overridden by the
//! `SEARCHGRAPH_DSL` environment variable.

mod namespace;
mod provider;
mod resolver;

pub use namespace::{ClassId, DslNamespace, FieldClass};
pub use provider::{default_candidates, ProviderCandidate};
pub use resolver::{parse_override, DslResolver, DSL_ENV_VAR};

use std::fmt;

use serde::Serialize;

/// Identifier of a document-modeling backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DslBackend {
    /// Elasticsearch 8.18+, DSL shipped with the client package.
    ElasticsearchDsl,
    /// Elasticsearch 7.x-8.17, separate DSL package.
    ElasticsearchDslLegacy,
    /// OpenSearch document/field helper modules.
    OpenSearchDsl,
}

impl DslBackend {
    /// Canonical identifier string.
    pub fn identifier(&self) -> &'static str {
        match self {
            DslBackend::ElasticsearchDsl => "elasticsearch.dsl",
            DslBackend::ElasticsearchDslLegacy => "elasticsearch_dsl",
            DslBackend::OpenSearchDsl => "opensearchpy",
        }
    }

    pub fn is_elasticsearch(&self) -> bool {
        matches!(
            self,
            DslBackend::ElasticsearchDsl | DslBackend::ElasticsearchDslLegacy
        )
    }

    pub fn is_opensearch(&self) -> bool {
        matches!(self, DslBackend::OpenSearchDsl)
    }
}

impl fmt::Display for DslBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}
