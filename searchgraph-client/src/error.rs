use thiserror::Error;

use crate::capabilities::BackendFamily;

/// Errors surfaced by a concrete client implementation.
///
/// Network transport (pooling, retries, timeouts) belongs to the wrapped
/// client; its failures arrive here as ordinary errors.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("authentication failed (status {status})")]
    Auth { status: u16 },

    #[error("request failed (status {status}): {reason}")]
    Http { status: u16, reason: String },

    #[error("{0}")]
    Other(String),
}

/// Adapter-level errors.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(
        "expected an {family} client, got {class_name} (module: {module}); \
         pass a client from the {family} package"
    )]
    WrongBackend {
        family: BackendFamily,
        module: String,
        class_name: String,
    },

    #[error("client missing required methods: {missing:?}")]
    MissingMethods { missing: Vec<&'static str> },

    #[error(
        "unknown client type {class_name} (module: {module}); \
         supported clients: elasticsearch, opensearch"
    )]
    UnknownClient { module: String, class_name: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
