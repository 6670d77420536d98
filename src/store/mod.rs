//! A thin client around a single MongoDB collection: insert, find,
//! delete, document sizing, and duplicate detection via aggregation.

mod client;
pub mod error;
mod models;
pub mod oplog;
mod pipeline;

pub use client::{DocumentStore, client_options, document_size, exceeds_max_size};
pub use error::StoreError;
pub use models::{
    DeleteScope, Documents, FindOptions, InsertOutcome, MAX_DOCUMENT_SIZE, SortDirection,
};
pub use oplog::{FileLog, NoopLog, OpLog};
pub use pipeline::duplicates_pipeline;
