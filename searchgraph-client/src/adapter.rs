//! Version-agnostic adapter over Elasticsearch and OpenSearch clients.
//!
//! The adapter normalizes *invocation*, not response shape: every operation
//! assembles the request the way the backend expects and returns the
//! backend's raw response unmodified.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};

use crate::capabilities::{BackendFamily, Capabilities};
use crate::error::{AdapterError, Result};
use crate::transport::{
    CallingConvention, ClientCall, ClientHandle, ClientMethod, IndicesCall, IndicesMethod,
};

/// One or more index names; multiple names are sent comma-joined.
#[derive(Debug, Clone)]
pub enum IndexSpec {
    One(String),
    Many(Vec<String>),
}

impl IndexSpec {
    pub fn normalized(&self) -> String {
        match self {
            IndexSpec::One(name) => name.clone(),
            IndexSpec::Many(names) => names.join(","),
        }
    }
}

impl From<&str> for IndexSpec {
    fn from(name: &str) -> Self {
        IndexSpec::One(name.to_string())
    }
}

impl From<String> for IndexSpec {
    fn from(name: String) -> Self {
        IndexSpec::One(name)
    }
}

impl From<Vec<String>> for IndexSpec {
    fn from(names: Vec<String>) -> Self {
        IndexSpec::Many(names)
    }
}

impl From<&[&str]> for IndexSpec {
    fn from(names: &[&str]) -> Self {
        IndexSpec::Many(names.iter().map(|n| n.to_string()).collect())
    }
}

/// `_source` filtering: enable/disable, or an include list.
#[derive(Debug, Clone)]
pub enum SourceFilter {
    Enabled(bool),
    Fields(Vec<String>),
}

impl SourceFilter {
    fn to_value(&self) -> Value {
        match self {
            SourceFilter::Enabled(enabled) => Value::Bool(*enabled),
            SourceFilter::Fields(fields) => {
                Value::Array(fields.iter().map(|f| Value::String(f.clone())).collect())
            }
        }
    }
}

/// `track_total_hits`: accurate boolean tracking or a count ceiling.
#[derive(Debug, Clone, Copy)]
pub enum TrackTotalHits {
    Bool(bool),
    Count(u64),
}

impl Default for TrackTotalHits {
    fn default() -> Self {
        TrackTotalHits::Bool(true)
    }
}

impl TrackTotalHits {
    fn to_value(&self) -> Value {
        match self {
            TrackTotalHits::Bool(b) => Value::Bool(*b),
            TrackTotalHits::Count(n) => Value::from(*n),
        }
    }
}

/// Index refresh behavior for write operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Refresh {
    #[default]
    False,
    True,
    WaitFor,
}

impl Refresh {
    /// Request parameter value; `False` is the backend default and is not
    /// sent at all.
    fn as_param(&self) -> Option<Value> {
        match self {
            Refresh::False => None,
            Refresh::True => Some(Value::Bool(true)),
            Refresh::WaitFor => Some(Value::String("wait_for".to_string())),
        }
    }
}

/// Options for [`ElasticAdapter::search`].
///
/// Recognized body keys in `extra` (`aggs`, `aggregations`, `highlight`,
/// `suggest`, `_source`) are merged into the request body; everything else
/// is passed as a request parameter.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub source: Option<SourceFilter>,
    pub size: Option<u64>,
    pub from: Option<u64>,
    pub sort: Option<Value>,
    pub search_after: Option<Vec<Value>>,
    pub track_total_hits: TrackTotalHits,
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct IndexOptions {
    pub id: Option<String>,
    pub refresh: Refresh,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
    /// Partial document, sent under the backend's `doc` envelope.
    pub document: Option<Value>,
    pub script: Option<Value>,
    pub refresh: Refresh,
}

#[derive(Debug, Clone, Default)]
pub struct BulkOptions {
    pub index: Option<String>,
    pub refresh: Refresh,
}

#[derive(Debug, Clone, Default)]
pub struct CreateIndexOptions {
    pub mappings: Option<Value>,
    pub settings: Option<Value>,
}

const REQUIRED_METHODS: [ClientMethod; 5] = [
    ClientMethod::Search,
    ClientMethod::Get,
    ClientMethod::Index,
    ClientMethod::Delete,
    ClientMethod::Info,
];

/// Body keys recognized in `SearchOptions::extra`.
const BODY_PASSTHROUGH_KEYS: [&str; 5] = ["aggs", "aggregations", "highlight", "suggest", "_source"];

/// Adapter around one concrete client.
///
/// Construction validates the client's descriptor synchronously and never
/// performs I/O; capabilities are detected lazily on the first operation or
/// explicit [`capabilities`](Self::capabilities) call. The adapter borrows
/// the client: it never closes or reconnects it, and a new client requires
/// a new adapter.
pub struct ElasticAdapter {
    client: ClientHandle,
    family: BackendFamily,
    capabilities: RwLock<Option<Capabilities>>,
    detected: AtomicBool,
}

impl ElasticAdapter {
    /// Validate the client and wrap it.
    ///
    /// Fails if the client's originating module does not match `family` or
    /// if the advertised method surface is missing any of `search`, `get`,
    /// `index`, `delete`, `info`.
    pub fn new(client: ClientHandle, family: BackendFamily) -> Result<Self> {
        let descriptor = client.descriptor();

        if !descriptor
            .module
            .to_lowercase()
            .contains(family.module_token())
        {
            return Err(AdapterError::WrongBackend {
                family,
                module: descriptor.module.clone(),
                class_name: descriptor.class_name.clone(),
            });
        }

        let missing: Vec<&'static str> = REQUIRED_METHODS
            .iter()
            .filter(|m| !descriptor.methods.contains(m))
            .map(|m| m.name())
            .collect();
        if !missing.is_empty() {
            return Err(AdapterError::MissingMethods { missing });
        }

        Ok(Self {
            client,
            family,
            capabilities: RwLock::new(None),
            detected: AtomicBool::new(false),
        })
    }

    pub fn family(&self) -> BackendFamily {
        self.family
    }

    pub fn convention(&self) -> CallingConvention {
        self.client.convention()
    }

    // ========================================================================
    // Capabilities
    // ========================================================================

    /// Detected capabilities, triggering detection on first call.
    pub async fn capabilities(&self) -> Capabilities {
        self.ensure_capabilities().await;
        self.capabilities
            .read()
            .clone()
            .unwrap_or_else(|| Capabilities::conservative(self.is_async()))
    }

    /// Capabilities if already detected, without triggering detection.
    pub fn capabilities_if_detected(&self) -> Option<Capabilities> {
        self.capabilities.read().clone()
    }

    /// Point in Time API support. Reads false until detection has run.
    pub fn supports_pit(&self) -> bool {
        self.capabilities
            .read()
            .as_ref()
            .is_some_and(|c| c.supports_pit)
    }

    /// search_after pagination support. Reads true until detection has run.
    pub fn supports_search_after(&self) -> bool {
        self.capabilities
            .read()
            .as_ref()
            .map_or(true, |c| c.supports_search_after)
    }

    /// Async search API support. Reads false until detection has run.
    pub fn supports_async_search(&self) -> bool {
        self.capabilities
            .read()
            .as_ref()
            .is_some_and(|c| c.supports_async_search)
    }

    /// Backend-reported version. Unset until detection has run.
    pub fn version(&self) -> Option<String> {
        self.capabilities.read().as_ref().and_then(|c| c.version.clone())
    }

    fn is_async(&self) -> bool {
        matches!(self.convention(), CallingConvention::Async)
    }

    async fn ensure_capabilities(&self) {
        // Benign race: two concurrent callers may both probe; both write
        // equivalent records. No lock is held across the network call.
        if self.detected.load(Ordering::Acquire) {
            return;
        }
        self.detect_capabilities().await;
        self.detected.store(true, Ordering::Release);
    }

    /// Probe cluster info and derive the capability record.
    ///
    /// Probes through the handle directly rather than the public `info()`
    /// operation, so one detection issues exactly one info call. A failed
    /// probe keeps conservative feature defaults but still records the
    /// calling convention, which needs no network access.
    async fn detect_capabilities(&self) {
        let is_async = self.is_async();
        let caps = match self.dispatch(ClientCall::new(ClientMethod::Info)).await {
            Ok(info) => {
                let number = info
                    .pointer("/version/number")
                    .and_then(Value::as_str)
                    .unwrap_or("");
                Capabilities::from_version(self.family, number, is_async)
            }
            Err(err) => {
                tracing::warn!(
                    family = %self.family,
                    error = %err,
                    "capability probe failed, using conservative defaults"
                );
                Capabilities::conservative(is_async)
            }
        };
        tracing::debug!(family = %self.family, version = ?caps.version, "capabilities detected");
        *self.capabilities.write() = Some(caps);
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    /// Delegate one top-level call, honoring the calling convention.
    ///
    /// Blocking clients are dispatched off the runtime via `spawn_blocking`
    /// per call; there is no queueing or cancellation layer here, timeouts
    /// are the wrapped client's responsibility.
    async fn dispatch(&self, call: ClientCall) -> Result<Value> {
        match &self.client {
            ClientHandle::Async(client) => Ok(client.request(call).await?),
            ClientHandle::Blocking(client) => {
                let client = Arc::clone(client);
                let result = tokio::task::spawn_blocking(move || client.request(call))
                    .await
                    .map_err(|e| AdapterError::Internal(format!("blocking dispatch failed: {e}")))?;
                Ok(result?)
            }
        }
    }

    /// Delegate one index-management call via the client's indices
    /// namespace. Does not go through the capability hook.
    async fn dispatch_indices(&self, call: IndicesCall) -> Result<Value> {
        match &self.client {
            ClientHandle::Async(client) => Ok(client.indices_request(call).await?),
            ClientHandle::Blocking(client) => {
                let client = Arc::clone(client);
                let result = tokio::task::spawn_blocking(move || client.indices_request(call))
                    .await
                    .map_err(|e| AdapterError::Internal(format!("blocking dispatch failed: {e}")))?;
                Ok(result?)
            }
        }
    }

    /// Capability-dependent delegation: first use triggers detection.
    async fn execute(&self, call: ClientCall) -> Result<Value> {
        self.ensure_capabilities().await;
        self.dispatch(call).await
    }

    // ========================================================================
    // Search Operations
    // ========================================================================

    /// Execute a search query.
    ///
    /// search_after and point-in-time token plumbing stay with the caller;
    /// the adapter only shapes the request and reports via capabilities
    /// whether the backend supports them at all.
    pub async fn search(
        &self,
        index: impl Into<IndexSpec>,
        query: Value,
        options: SearchOptions,
    ) -> Result<Value> {
        let mut body = Map::new();
        body.insert("query".to_string(), query);

        if let Some(source) = &options.source {
            body.insert("_source".to_string(), source.to_value());
        }
        if let Some(size) = options.size {
            body.insert("size".to_string(), Value::from(size));
        }
        if let Some(from) = options.from {
            body.insert("from".to_string(), Value::from(from));
        }
        if let Some(sort) = options.sort {
            body.insert("sort".to_string(), sort);
        }
        if let Some(search_after) = options.search_after {
            body.insert("search_after".to_string(), Value::Array(search_after));
        }
        body.insert(
            "track_total_hits".to_string(),
            options.track_total_hits.to_value(),
        );

        let mut params = Map::new();
        for (key, value) in options.extra {
            if BODY_PASSTHROUGH_KEYS.contains(&key.as_str()) {
                body.insert(key, value);
            } else {
                params.insert(key, value);
            }
        }

        let mut call = ClientCall::new(ClientMethod::Search);
        call.index = Some(index.into().normalized());
        call.body = Some(Value::Object(body));
        call.params = params;
        self.execute(call).await
    }

    /// Get a single document by ID.
    pub async fn get(
        &self,
        index: &str,
        id: &str,
        source: Option<SourceFilter>,
    ) -> Result<Value> {
        let mut call = ClientCall::new(ClientMethod::Get);
        call.index = Some(index.to_string());
        call.id = Some(id.to_string());
        if let Some(source) = source {
            call.params.insert("_source".to_string(), source.to_value());
        }
        self.execute(call).await
    }

    /// Get multiple documents by ID in one round trip.
    pub async fn mget(
        &self,
        index: &str,
        ids: Vec<String>,
        source: Option<SourceFilter>,
    ) -> Result<Value> {
        let mut body = Map::new();
        body.insert(
            "ids".to_string(),
            Value::Array(ids.into_iter().map(Value::String).collect()),
        );
        if let Some(source) = source {
            body.insert("_source".to_string(), source.to_value());
        }

        let mut call = ClientCall::new(ClientMethod::Mget);
        call.index = Some(index.to_string());
        call.body = Some(Value::Object(body));
        self.execute(call).await
    }

    /// Count documents matching a query, unwrapping the count envelope.
    pub async fn count(
        &self,
        index: impl Into<IndexSpec>,
        query: Option<Value>,
    ) -> Result<u64> {
        let mut call = ClientCall::new(ClientMethod::Count);
        call.index = Some(index.into().normalized());
        if let Some(query) = query {
            let mut body = Map::new();
            body.insert("query".to_string(), query);
            call.body = Some(Value::Object(body));
        }

        let response = self.execute(call).await?;
        response
            .get("count")
            .and_then(Value::as_u64)
            .ok_or_else(|| {
                AdapterError::InvalidResponse("count response missing 'count' field".to_string())
            })
    }

    // ========================================================================
    // Write Operations
    // ========================================================================

    /// Index a document, letting the backend assign an ID unless one is
    /// given.
    pub async fn index_document(
        &self,
        index: &str,
        document: Value,
        options: IndexOptions,
    ) -> Result<Value> {
        let mut call = ClientCall::new(ClientMethod::Index);
        call.index = Some(index.to_string());
        call.id = options.id;
        call.body = Some(document);
        if let Some(refresh) = options.refresh.as_param() {
            call.params.insert("refresh".to_string(), refresh);
        }
        self.execute(call).await
    }

    /// Update a document with a partial document and/or a script.
    pub async fn update(
        &self,
        index: &str,
        id: &str,
        options: UpdateOptions,
    ) -> Result<Value> {
        let mut body = Map::new();
        if let Some(document) = options.document {
            body.insert("doc".to_string(), document);
        }
        if let Some(script) = options.script {
            body.insert("script".to_string(), script);
        }

        let mut call = ClientCall::new(ClientMethod::Update);
        call.index = Some(index.to_string());
        call.id = Some(id.to_string());
        call.body = Some(Value::Object(body));
        if let Some(refresh) = options.refresh.as_param() {
            call.params.insert("refresh".to_string(), refresh);
        }
        self.execute(call).await
    }

    /// Delete a document by ID.
    pub async fn delete(&self, index: &str, id: &str, refresh: Refresh) -> Result<Value> {
        let mut call = ClientCall::new(ClientMethod::Delete);
        call.index = Some(index.to_string());
        call.id = Some(id.to_string());
        if let Some(refresh) = refresh.as_param() {
            call.params.insert("refresh".to_string(), refresh);
        }
        self.execute(call).await
    }

    /// Execute bulk operations (action lines with optional documents).
    pub async fn bulk(&self, operations: Vec<Value>, options: BulkOptions) -> Result<Value> {
        let mut call = ClientCall::new(ClientMethod::Bulk);
        call.index = options.index;
        call.body = Some(Value::Array(operations));
        if let Some(refresh) = options.refresh.as_param() {
            call.params.insert("refresh".to_string(), refresh);
        }
        self.execute(call).await
    }

    // ========================================================================
    // Index Management
    // ========================================================================

    /// Check whether an index exists.
    pub async fn exists(&self, index: &str) -> Result<bool> {
        let mut call = IndicesCall::new(IndicesMethod::Exists);
        call.index = Some(index.to_string());
        let response = self.dispatch_indices(call).await?;
        response.as_bool().ok_or_else(|| {
            AdapterError::InvalidResponse("exists response is not a boolean".to_string())
        })
    }

    /// Create an index with optional mappings and settings.
    pub async fn create_index(
        &self,
        index: &str,
        options: CreateIndexOptions,
    ) -> Result<Value> {
        let mut body = Map::new();
        if let Some(mappings) = options.mappings {
            body.insert("mappings".to_string(), mappings);
        }
        if let Some(settings) = options.settings {
            body.insert("settings".to_string(), settings);
        }

        let mut call = IndicesCall::new(IndicesMethod::Create);
        call.index = Some(index.to_string());
        call.body = Some(Value::Object(body));
        self.dispatch_indices(call).await
    }

    /// Delete an index.
    pub async fn delete_index(&self, index: &str) -> Result<Value> {
        let mut call = IndicesCall::new(IndicesMethod::Delete);
        call.index = Some(index.to_string());
        self.dispatch_indices(call).await
    }

    /// Get mapping for one or more indices.
    pub async fn get_mapping(&self, index: impl Into<IndexSpec>) -> Result<Value> {
        let mut call = IndicesCall::new(IndicesMethod::GetMapping);
        call.index = Some(index.into().normalized());
        self.dispatch_indices(call).await
    }

    /// Update mapping properties for an index.
    pub async fn put_mapping(&self, index: &str, properties: Value) -> Result<Value> {
        let mut body = Map::new();
        body.insert("properties".to_string(), properties);

        let mut call = IndicesCall::new(IndicesMethod::PutMapping);
        call.index = Some(index.to_string());
        call.body = Some(Value::Object(body));
        self.dispatch_indices(call).await
    }

    /// Refresh one or more indices, or all of them.
    pub async fn refresh_index(&self, index: Option<IndexSpec>) -> Result<Value> {
        let mut call = IndicesCall::new(IndicesMethod::Refresh);
        call.index = index.map(|i| i.normalized());
        self.dispatch_indices(call).await
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Raw cluster/client info. Plain delegation; does not itself trigger
    /// capability detection.
    pub async fn info(&self) -> Result<Value> {
        self.dispatch(ClientCall::new(ClientMethod::Info)).await
    }
}

impl std::fmt::Debug for ElasticAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticAdapter")
            .field("family", &self.family)
            .field("convention", &self.convention())
            .field("version", &self.version())
            .finish()
    }
}
