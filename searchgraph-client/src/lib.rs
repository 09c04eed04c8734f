//! Capability-aware adapter over Elasticsearch and OpenSearch clients.
//!
//! This crate presents one normalized operation surface over the two
//! backend families, hiding per-version differences in capability
//! availability and request-shape conventions. The wrapped client stays
//! opaque: it implements one of the transport traits and the adapter
//! validates only its [`ClientDescriptor`].
//!
//! # Capabilities
//!
//! Adapter construction never touches the network. The first operation (or
//! an explicit [`ElasticAdapter::capabilities`] call) probes cluster info
//! once and derives feature flags from per-family version thresholds.
//! Before detection, flag accessors return conservative defaults instead
//! of failing, so capabilities can be queried speculatively.
//!
//! # Calling conventions
//!
//! Natively asynchronous clients are awaited directly; blocking clients
//! are dispatched off the runtime per call, so a slow blocking call never
//! stalls a cooperative scheduler.

pub mod adapter;
pub mod capabilities;
pub mod error;
pub mod factory;
pub mod transport;

#[cfg(test)]
mod test_util;

pub use adapter::{
    BulkOptions, CreateIndexOptions, ElasticAdapter, IndexOptions, IndexSpec, Refresh,
    SearchOptions, SourceFilter, TrackTotalHits, UpdateOptions,
};
pub use capabilities::{BackendFamily, Capabilities};
pub use error::{AdapterError, TransportError};
pub use factory::create_adapter;
pub use transport::{
    AsyncSearchClient, BlockingSearchClient, CallingConvention, ClientCall, ClientDescriptor,
    ClientHandle, ClientMethod, IndicesCall, IndicesMethod,
};

/// Result type for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
