//! Auto-detection of the adapter family for an opaque client.

use crate::adapter::ElasticAdapter;
use crate::capabilities::BackendFamily;
use crate::error::{AdapterError, Result};
use crate::transport::ClientHandle;

/// Detect the client's backend family and wrap it in an adapter.
///
/// The originating module path is checked first; the concrete type name is
/// a fallback for wrapped or proxied clients whose module path does not
/// reveal the family.
///
/// # Examples
///
/// ```no_run
/// # use std::sync::Arc;
/// # use searchgraph_client::{create_adapter, AsyncSearchClient, ClientHandle};
/// # fn client() -> Arc<dyn AsyncSearchClient> { unimplemented!() }
/// let adapter = create_adapter(ClientHandle::Async(client()))?;
/// # Ok::<(), searchgraph_client::AdapterError>(())
/// ```
pub fn create_adapter(client: ClientHandle) -> Result<ElasticAdapter> {
    let (module, class_name) = {
        let descriptor = client.descriptor();
        (
            descriptor.module.to_lowercase(),
            descriptor.class_name.to_lowercase(),
        )
    };

    let family = if module.contains("elasticsearch") {
        Some(BackendFamily::Elasticsearch)
    } else if module.contains("opensearch") {
        Some(BackendFamily::OpenSearch)
    } else if class_name.contains("elasticsearch") {
        Some(BackendFamily::Elasticsearch)
    } else if class_name.contains("opensearch") {
        Some(BackendFamily::OpenSearch)
    } else {
        None
    };

    match family {
        Some(family) => ElasticAdapter::new(client, family),
        None => {
            let descriptor = client.descriptor();
            Err(AdapterError::UnknownClient {
                module: descriptor.module.clone(),
                class_name: descriptor.class_name.clone(),
            })
        }
    }
}
