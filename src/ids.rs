//! Sequential ID allocation.
//!
//! Books carry two identifiers: the store's opaque internal key and a
//! human-friendly sequential integer. The sequential side is minted here,
//! by driving the store's atomic counter. Multiple service instances share
//! the same counter document, so the allocator never keeps counter state
//! in process memory.

use std::fmt;

use crate::store::{DocumentStore, StoreError};

/// Counter name for the book entity class.
pub const BOOK_COUNTER: &str = "book";

/// Issues unique, monotonically increasing integer IDs for a named entity
/// class.
///
/// Guarantee: no two calls for the same counter name ever return the same
/// value, however concurrent. The increment-and-fetch is a single atomic
/// operation on the store, never a caller-side read followed by a write.
pub struct IdAllocator<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> IdAllocator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Allocate the next sequential ID for the given entity class.
    ///
    /// Returns the post-increment value, so allocated IDs start at 1. On
    /// failure the caller must not persist the entity being numbered; a
    /// consumed value with no matching entity is an accepted gap (IDs are
    /// unique and increasing, not contiguous).
    pub fn allocate(&self, class: &str) -> Result<u64, AllocationError> {
        self.store
            .increment_counter(class)
            .map_err(|source| AllocationError::Store {
                counter: class.to_string(),
                source,
            })
    }
}

/// Error type for ID allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    /// The counter store failed or rejected the atomic increment. Fatal to
    /// the enclosing create operation; not retried here.
    Store { counter: String, source: StoreError },
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::Store { counter, source } => {
                write!(f, "failed to allocate id from counter {}: {}", counter, source)
            }
        }
    }
}

impl std::error::Error for AllocationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AllocationError::Store { source, .. } => Some(source),
        }
    }
}
