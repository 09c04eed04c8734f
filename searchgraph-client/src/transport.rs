//! Transport traits and request records for concrete search-engine clients.
//!
//! The adapter treats the client as opaque: a client implements one of the
//! two transport traits (natively asynchronous or blocking) and reports a
//! [`ClientDescriptor`] describing where it comes from and which methods it
//! supports. The adapter validates the descriptor, never the transport.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::TransportError;

/// Top-level client methods the adapter can delegate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClientMethod {
    Search,
    Get,
    Mget,
    Count,
    Index,
    Update,
    Delete,
    Bulk,
    Info,
}

impl ClientMethod {
    pub const ALL: [ClientMethod; 9] = [
        ClientMethod::Search,
        ClientMethod::Get,
        ClientMethod::Mget,
        ClientMethod::Count,
        ClientMethod::Index,
        ClientMethod::Update,
        ClientMethod::Delete,
        ClientMethod::Bulk,
        ClientMethod::Info,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ClientMethod::Search => "search",
            ClientMethod::Get => "get",
            ClientMethod::Mget => "mget",
            ClientMethod::Count => "count",
            ClientMethod::Index => "index",
            ClientMethod::Update => "update",
            ClientMethod::Delete => "delete",
            ClientMethod::Bulk => "bulk",
            ClientMethod::Info => "info",
        }
    }
}

/// Index-management methods, exposed by clients as a nested sub-surface
/// rather than top-level methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicesMethod {
    Exists,
    Create,
    Delete,
    GetMapping,
    PutMapping,
    Refresh,
}

/// What a concrete client reports about itself.
///
/// `module` is the originating module path of the client implementation
/// (e.g. `elasticsearch8::client`), `class_name` the concrete type name
/// (useful when the module path is hidden behind a wrapper or proxy).
#[derive(Debug, Clone)]
pub struct ClientDescriptor {
    pub module: String,
    pub class_name: String,
    pub methods: BTreeSet<ClientMethod>,
}

impl ClientDescriptor {
    /// Descriptor advertising the full method surface.
    pub fn new(module: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            class_name: class_name.into(),
            methods: ClientMethod::ALL.into_iter().collect(),
        }
    }

    /// Restrict the advertised method surface (partial clients, proxies).
    pub fn with_methods(mut self, methods: impl IntoIterator<Item = ClientMethod>) -> Self {
        self.methods = methods.into_iter().collect();
        self
    }
}

/// One delegated top-level call.
#[derive(Debug, Clone)]
pub struct ClientCall {
    pub method: ClientMethod,
    pub index: Option<String>,
    pub id: Option<String>,
    pub body: Option<Value>,
    pub params: Map<String, Value>,
}

impl ClientCall {
    pub fn new(method: ClientMethod) -> Self {
        Self {
            method,
            index: None,
            id: None,
            body: None,
            params: Map::new(),
        }
    }
}

/// One delegated index-management call.
#[derive(Debug, Clone)]
pub struct IndicesCall {
    pub method: IndicesMethod,
    pub index: Option<String>,
    pub body: Option<Value>,
    pub params: Map<String, Value>,
}

impl IndicesCall {
    pub fn new(method: IndicesMethod) -> Self {
        Self {
            method,
            index: None,
            body: None,
            params: Map::new(),
        }
    }
}

/// A client whose methods return results natively asynchronously.
#[async_trait]
pub trait AsyncSearchClient: Send + Sync {
    fn descriptor(&self) -> &ClientDescriptor;

    /// Execute a top-level call, returning the backend's raw response.
    async fn request(&self, call: ClientCall) -> Result<Value, TransportError>;

    /// Execute an index-management call via the client's indices namespace.
    async fn indices_request(&self, call: IndicesCall) -> Result<Value, TransportError>;
}

/// A client whose methods block the calling thread.
pub trait BlockingSearchClient: Send + Sync {
    fn descriptor(&self) -> &ClientDescriptor;

    fn request(&self, call: ClientCall) -> Result<Value, TransportError>;

    fn indices_request(&self, call: IndicesCall) -> Result<Value, TransportError>;
}

/// Whether a wrapped client is natively asynchronous or blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallingConvention {
    Async,
    Blocking,
}

/// Handle to a concrete client; the variant carries the calling convention,
/// which is therefore known without any network access.
#[derive(Clone)]
pub enum ClientHandle {
    Async(Arc<dyn AsyncSearchClient>),
    Blocking(Arc<dyn BlockingSearchClient>),
}

impl ClientHandle {
    pub fn descriptor(&self) -> &ClientDescriptor {
        match self {
            ClientHandle::Async(client) => client.descriptor(),
            ClientHandle::Blocking(client) => client.descriptor(),
        }
    }

    pub fn convention(&self) -> CallingConvention {
        match self {
            ClientHandle::Async(_) => CallingConvention::Async,
            ClientHandle::Blocking(_) => CallingConvention::Blocking,
        }
    }
}

impl std::fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let descriptor = self.descriptor();
        f.debug_struct("ClientHandle")
            .field("convention", &self.convention())
            .field("module", &descriptor.module)
            .field("class_name", &descriptor.class_name)
            .finish()
    }
}
