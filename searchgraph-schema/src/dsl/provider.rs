//! Candidate document-modeling providers and their member catalogs.

use super::namespace::DslNamespace;
use super::DslBackend;

/// Field primitives shared by every backend.
const COMMON_MEMBERS: &[&str] = &[
    "Text",
    "Keyword",
    "Integer",
    "Long",
    "Short",
    "Byte",
    "Double",
    "Float",
    "HalfFloat",
    "ScaledFloat",
    "Boolean",
    "Date",
    "Binary",
    "Ip",
    "Completion",
    "GeoPoint",
    "GeoShape",
    "TokenCount",
    "IntegerRange",
    "FloatRange",
    "LongRange",
    "DoubleRange",
    "DateRange",
    "IpRange",
    "Object",
    "Nested",
    "Percolator",
    "Join",
    "RankFeature",
    "RankFeatures",
    "SearchAsYouType",
];

/// Additions present only in the modern Elasticsearch DSL.
const ES_MODERN_EXTRAS: &[&str] = &["ConstantKeyword", "Wildcard", "DenseVector", "MatchOnlyText"];

/// The legacy package still carries dense vectors but predates the
/// 7.9+/7.10+ text field variants.
const ES_LEGACY_EXTRAS: &[&str] = &["DenseVector"];

fn with_extras(
    base: &[&'static str],
    doc_members: &[&'static str],
    extras: &[&'static str],
) -> Vec<&'static str> {
    doc_members
        .iter()
        .chain(base.iter())
        .chain(extras.iter())
        .copied()
        .collect()
}

pub(crate) fn build_namespace(backend: DslBackend) -> DslNamespace {
    match backend {
        DslBackend::ElasticsearchDsl => {
            let members = with_extras(COMMON_MEMBERS, &["Document", "InnerDoc"], ES_MODERN_EXTRAS);
            DslNamespace::bind(backend, &members, &[])
        }
        DslBackend::ElasticsearchDslLegacy => {
            let members = with_extras(COMMON_MEMBERS, &["Document", "InnerDoc"], ES_LEGACY_EXTRAS);
            DslNamespace::bind(backend, &members, &[])
        }
        DslBackend::OpenSearchDsl => {
            // Document primitives and field primitives live in separate
            // helper modules; OpenSearch has no dense_vector field class
            // (it uses knn_vector, outside this catalog).
            let fields = with_extras(COMMON_MEMBERS, &[], &[]);
            DslNamespace::bind(backend, &["Document", "InnerDoc"], &fields)
        }
    }
}

/// One probe candidate: a backend and whether its package is present in
/// this build.
#[derive(Debug, Clone, Copy)]
pub struct ProviderCandidate {
    pub backend: DslBackend,
    pub available: bool,
}

impl ProviderCandidate {
    /// Probe the candidate: present and exposing a Document-like class.
    pub fn probe(&self) -> Option<DslNamespace> {
        if !self.available {
            return None;
        }
        let namespace = build_namespace(self.backend);
        namespace.contains("Document").then_some(namespace)
    }
}

/// Built-in candidates in fixed priority order.
pub fn default_candidates() -> Vec<ProviderCandidate> {
    vec![
        ProviderCandidate {
            backend: DslBackend::ElasticsearchDsl,
            available: cfg!(feature = "es-dsl"),
        },
        ProviderCandidate {
            backend: DslBackend::ElasticsearchDslLegacy,
            available: cfg!(feature = "es-dsl-legacy"),
        },
        ProviderCandidate {
            backend: DslBackend::OpenSearchDsl,
            available: cfg!(feature = "os-dsl"),
        },
    ]
}
