//! Error types for the document store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The server could not be reached when opening the store.
    #[error("unable to connect to {host}:{port}: {source}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: mongodb::error::Error,
    },

    /// The insert payload was neither a document nor a list of documents.
    #[error("invalid payload: expected a document or a list of documents, got {0}")]
    InvalidPayload(String),

    /// A multi-document delete was requested with a query that matches everything.
    #[error(
        "query cannot be empty when deleting many documents, use DeleteScope::All to delete every document"
    )]
    EmptyDeleteQuery,

    /// BSON serialization failed.
    #[error("bson encode error: {0}")]
    Encode(#[from] bson::ser::Error),

    /// Errors returned by the MongoDB driver, passed through unchanged.
    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    /// The operation log could not be opened or written.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
