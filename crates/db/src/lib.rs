//! Document persistence for libris.
//!
//! Controllers talk to a [`Storage`] facade, which wraps an injected [`Store`]
//! backend. Backends only see JSON documents keyed by `_id`; typing happens in
//! the facade through the [`Model`] trait.

use std::error::Error as StdError;

use thiserror::Error;

mod id;
mod memory;
#[cfg(feature = "mongo")]
mod mongo;
mod query;
mod storage;

pub use id::Id;
pub use memory::MemoryStore;
#[cfg(feature = "mongo")]
pub use mongo::MongoStore;
pub use query::{Filter, Order, Query, Sort};
pub use storage::{Model, Storage, Store};

/// A stored document. The store-assigned identifier lives under [`ID_FIELD`].
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Field name holding a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Errors surfaced by the persistence layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to encode {collection} document")]
    Encode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {collection} document")]
    Decode {
        collection: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid store configuration: {0}")]
    Config(String),

    /// Displays the backend's own message unchanged.
    #[error("{0}")]
    Backend(Box<dyn StdError + Send + Sync>),
}

impl StoreError {
    /// Wrap a backend-specific failure.
    pub fn backend(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Backend(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
