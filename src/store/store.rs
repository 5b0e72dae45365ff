//! DocumentStore - Abstract CRUD storage plus atomic counters.

use super::{Document, StoreError, Versioned};

/// Abstract storage for documents.
///
/// Implementations must make each method a single linearizable operation
/// against the backing store; callers never hold locks of their own across
/// store calls.
pub trait DocumentStore: Send + Sync {
    /// Get a document by key. Returns None if not found.
    fn get_document<D: Document>(&self, key: &str) -> Result<Option<Versioned<D>>, StoreError>;

    /// Upsert a document (insert or overwrite, no version check).
    fn save_document<D: Document>(&self, doc: &D) -> Result<Versioned<D>, StoreError>;

    /// Insert a new document. Fails with [`StoreError::Conflict`] if the
    /// key already exists. This is the store-enforced uniqueness the
    /// engine leans on for `(book, user)` review identity.
    fn insert_document<D: Document>(&self, doc: &D) -> Result<Versioned<D>, StoreError>;

    /// Update an existing document with optimistic concurrency control.
    fn update_document<D: Document>(
        &self,
        doc: &D,
        expected_version: u64,
    ) -> Result<Versioned<D>, StoreError>;

    /// Delete a document by key. Returns true if it existed.
    fn delete_document<D: Document>(&self, key: &str) -> Result<bool, StoreError>;

    /// Find all documents in a collection matching a predicate.
    fn find_documents<D: Document>(
        &self,
        predicate: &dyn Fn(&D) -> bool,
    ) -> Result<Vec<Versioned<D>>, StoreError>;

    /// Find the first document matching a predicate.
    fn find_one<D: Document>(
        &self,
        predicate: &dyn Fn(&D) -> bool,
    ) -> Result<Option<Versioned<D>>, StoreError>;

    /// Check whether any document matches a predicate.
    fn exists<D: Document>(&self, predicate: &dyn Fn(&D) -> bool) -> Result<bool, StoreError>;

    /// Atomically increment the named counter and return the new value.
    ///
    /// Upsert semantics: a counter that does not exist yet is created at
    /// zero before the increment, so the first call returns 1. The whole
    /// read-increment-write must be one atomic operation on the store. A
    /// caller-side read followed by a separate write reintroduces the
    /// duplicate-ID race this method exists to eliminate.
    fn increment_counter(&self, name: &str) -> Result<u64, StoreError>;
}
