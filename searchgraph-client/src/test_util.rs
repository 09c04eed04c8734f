//! Mock clients shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::error::TransportError;
use crate::transport::{
    AsyncSearchClient, BlockingSearchClient, ClientCall, ClientDescriptor, ClientMethod,
    IndicesCall, IndicesMethod,
};

/// Canned cluster info payload for a given version.
pub fn es_info(version: &str) -> Value {
    json!({
        "name": "node-1",
        "cluster_name": "test-cluster",
        "version": {"number": version}
    })
}

/// Recording client core wrapped by both mock flavors.
pub struct MockCore {
    pub descriptor: ClientDescriptor,
    /// Info payload; `None` makes the info call fail.
    pub info: Option<Value>,
    pub info_calls: AtomicUsize,
    pub calls: Mutex<Vec<ClientCall>>,
    pub indices_calls: Mutex<Vec<IndicesCall>>,
}

impl MockCore {
    pub fn new(module: &str, class_name: &str, info: Value) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ClientDescriptor::new(module, class_name),
            info: Some(info),
            info_calls: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            indices_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn elasticsearch(info: Value) -> Arc<Self> {
        Self::new("elasticsearch8::client", "Elasticsearch", info)
    }

    pub fn failing(module: &str, class_name: &str) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ClientDescriptor::new(module, class_name),
            info: None,
            info_calls: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
            indices_calls: Mutex::new(Vec::new()),
        })
    }

    fn handle_request(&self, call: ClientCall) -> Result<Value, TransportError> {
        if call.method == ClientMethod::Info {
            self.info_calls.fetch_add(1, Ordering::SeqCst);
            return self
                .info
                .clone()
                .ok_or_else(|| TransportError::Connection("connection refused".to_string()));
        }

        let method = call.method;
        self.calls.lock().push(call);
        Ok(match method {
            ClientMethod::Count => json!({"count": 7}),
            _ => json!({"acknowledged": true}),
        })
    }

    fn handle_indices(&self, call: IndicesCall) -> Result<Value, TransportError> {
        let method = call.method;
        self.indices_calls.lock().push(call);
        Ok(match method {
            IndicesMethod::Exists => json!(true),
            _ => json!({"acknowledged": true}),
        })
    }
}

pub struct AsyncMockClient(pub Arc<MockCore>);

#[async_trait]
impl AsyncSearchClient for AsyncMockClient {
    fn descriptor(&self) -> &ClientDescriptor {
        &self.0.descriptor
    }

    async fn request(&self, call: ClientCall) -> Result<Value, TransportError> {
        self.0.handle_request(call)
    }

    async fn indices_request(&self, call: IndicesCall) -> Result<Value, TransportError> {
        self.0.handle_indices(call)
    }
}

pub struct BlockingMockClient(pub Arc<MockCore>);

impl BlockingSearchClient for BlockingMockClient {
    fn descriptor(&self) -> &ClientDescriptor {
        &self.0.descriptor
    }

    fn request(&self, call: ClientCall) -> Result<Value, TransportError> {
        self.0.handle_request(call)
    }

    fn indices_request(&self, call: IndicesCall) -> Result<Value, TransportError> {
        self.0.handle_indices(call)
    }
}
