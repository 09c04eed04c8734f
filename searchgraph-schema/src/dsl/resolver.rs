//! First-success-wins backend resolution with environment override.

use crate::error::{Result, SchemaError};

use super::namespace::DslNamespace;
use super::provider::{default_candidates, ProviderCandidate};
use super::DslBackend;

/// Environment variable naming a preferred backend, bypassing auto-probe.
pub const DSL_ENV_VAR: &str = "SEARCHGRAPH_DSL";

/// Parse an override directive. Each backend family accepts two spellings.
pub fn parse_override(value: &str) -> Option<DslBackend> {
    match value.trim().to_lowercase().as_str() {
        "elasticsearch" | "elasticsearch.dsl" => Some(DslBackend::ElasticsearchDsl),
        "elasticsearch_dsl" => Some(DslBackend::ElasticsearchDslLegacy),
        "opensearch" | "opensearchpy" => Some(DslBackend::OpenSearchDsl),
        _ => None,
    }
}

fn override_from_env() -> Option<DslBackend> {
    std::env::var(DSL_ENV_VAR)
        .ok()
        .as_deref()
        .and_then(parse_override)
}

/// Resolves which document-modeling backend to use.
///
/// Resolution runs once at construction and is cached for the resolver's
/// lifetime; independently constructed resolvers arrive at the same answer
/// given the same build. The cached result is read-only and safe to share.
#[derive(Debug, Clone)]
pub struct DslResolver {
    resolved: Option<DslNamespace>,
}

impl DslResolver {
    /// Resolve using the built-in candidates and the environment override.
    pub fn new() -> Self {
        Self::resolve(default_candidates(), override_from_env())
    }

    /// Resolve with an explicit override directive (tests, embedding).
    pub fn with_override(directive: Option<&str>) -> Self {
        Self::resolve(default_candidates(), directive.and_then(parse_override))
    }

    /// Resolve against an explicit candidate list (tests, embedding).
    pub fn with_candidates(candidates: Vec<ProviderCandidate>) -> Self {
        Self::resolve(candidates, None)
    }

    /// Resolve against an explicit candidate list and override.
    pub fn with_candidates_and_override(
        candidates: Vec<ProviderCandidate>,
        override_backend: Option<DslBackend>,
    ) -> Self {
        Self::resolve(candidates, override_backend)
    }

    fn resolve(
        candidates: Vec<ProviderCandidate>,
        override_backend: Option<DslBackend>,
    ) -> Self {
        if let Some(backend) = override_backend {
            let forced = candidates
                .iter()
                .find(|c| c.backend == backend)
                .and_then(ProviderCandidate::probe);
            if let Some(namespace) = forced {
                tracing::debug!(backend = %namespace.backend(), "dsl backend forced by override");
                return Self {
                    resolved: Some(namespace),
                };
            }
            // Forced backend not present: fall through to auto-probe.
            tracing::warn!(%backend, "overridden dsl backend unavailable, probing candidates");
        }

        let resolved = candidates.iter().find_map(ProviderCandidate::probe);
        match &resolved {
            Some(namespace) => {
                tracing::debug!(backend = %namespace.backend(), "dsl backend resolved")
            }
            None => tracing::debug!("no dsl backend available"),
        }
        Self { resolved }
    }

    /// Whether any backend was resolved.
    pub fn available(&self) -> bool {
        self.resolved.is_some()
    }

    /// The resolved backend kind, if any.
    pub fn backend(&self) -> Option<DslBackend> {
        self.resolved.as_ref().map(DslNamespace::backend)
    }

    /// The resolved namespace, with installation guidance when absent.
    pub fn namespace(&self) -> Result<&DslNamespace> {
        self.resolved.as_ref().ok_or(SchemaError::DslUnavailable)
    }

    pub fn ensure_available(&self) -> Result<()> {
        self.namespace().map(|_| ())
    }
}

impl Default for DslResolver {
    fn default() -> Self {
        Self::new()
    }
}
