//! Document store - Pluggable storage for catalog documents.
//!
//! Everything the engine persists (books, reviews, counters) is a
//! [`Document`]: a serializable value with a collection name and a unique
//! key within that collection. A [`DocumentStore`] provides CRUD plus the
//! one special operation the identity engine depends on,
//! [`DocumentStore::increment_counter`], which must be a single atomic
//! store operation.
//!
//! ## Example
//!
//! ```ignore
//! use librarium::{Document, DocumentsExt, InMemoryStore};
//!
//! #[derive(Serialize, Deserialize, Clone)]
//! struct Shelf {
//!     pub key: String,
//!     pub label: String,
//! }
//!
//! impl Document for Shelf {
//!     const COLLECTION: &'static str = "shelves";
//!     fn key(&self) -> &str { &self.key }
//! }
//!
//! let store = InMemoryStore::new();
//! store.documents::<Shelf>().save(&shelf)?;
//! let loaded = store.documents::<Shelf>().get("shelf-1")?;
//! ```

mod counter;
mod documents;
mod in_memory;
mod store;

use serde::{de::DeserializeOwned, Serialize};
use std::fmt;

/// Trait for types persisted as documents.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// The collection this document type lives in (e.g., "books").
    /// Maps to a collection in MongoDB, a table in SQL, a key prefix in
    /// KV stores, etc.
    const COLLECTION: &'static str;

    /// Returns the document's unique key within its collection.
    fn key(&self) -> &str;
}

/// A document paired with its storage version, for optimistic concurrency.
#[derive(Debug, Clone)]
pub struct Versioned<T> {
    pub data: T,
    pub version: u64,
}

/// Error type for document store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Version mismatch on update, or insert of an existing key.
    Conflict {
        collection: String,
        key: String,
        expected: u64,
        actual: u64,
    },
    /// Serialization/deserialization error.
    Serde(String),
    /// Storage-level error (connectivity, lock poisoned, counter overflow).
    Storage(String),
    /// Document not found where one was required.
    NotFound { collection: String, key: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Conflict {
                collection,
                key,
                expected,
                actual,
            } => write!(
                f,
                "write conflict on {}:{} (expected version {}, actual {})",
                collection, key, expected, actual
            ),
            StoreError::Serde(msg) => write!(f, "document serialization error: {}", msg),
            StoreError::Storage(msg) => write!(f, "storage error: {}", msg),
            StoreError::NotFound { collection, key } => {
                write!(f, "document not found: {}:{}", collection, key)
            }
        }
    }
}

impl std::error::Error for StoreError {}

pub use counter::Counter;
pub use documents::{Documents, DocumentsExt};
pub use in_memory::InMemoryStore;
pub use store::DocumentStore;
