//! Documents - Typed accessor for per-collection CRUD.

use std::marker::PhantomData;

use super::{Document, DocumentStore, StoreError, Versioned};

/// Typed wrapper for accessing one collection of a store.
pub struct Documents<'a, S, D> {
    store: &'a S,
    _marker: PhantomData<D>,
}

impl<'a, S: DocumentStore, D: Document> Documents<'a, S, D> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            _marker: PhantomData,
        }
    }

    /// Get a document by key.
    pub fn get(&self, key: &str) -> Result<Option<Versioned<D>>, StoreError> {
        self.store.get_document(key)
    }

    /// Upsert a document (insert or overwrite, no version check).
    pub fn save(&self, doc: &D) -> Result<Versioned<D>, StoreError> {
        self.store.save_document(doc)
    }

    /// Insert a new document. Fails if the key already exists.
    pub fn insert(&self, doc: &D) -> Result<Versioned<D>, StoreError> {
        self.store.insert_document(doc)
    }

    /// Update an existing document with optimistic concurrency.
    pub fn update(&self, doc: &D, expected_version: u64) -> Result<Versioned<D>, StoreError> {
        self.store.update_document(doc, expected_version)
    }

    /// Delete a document by key. Returns true if it existed.
    pub fn delete(&self, key: &str) -> Result<bool, StoreError> {
        self.store.delete_document::<D>(key)
    }

    /// Find documents matching a predicate.
    pub fn find(&self, predicate: &dyn Fn(&D) -> bool) -> Result<Vec<Versioned<D>>, StoreError> {
        self.store.find_documents(predicate)
    }

    /// Find the first document matching a predicate.
    pub fn find_one(
        &self,
        predicate: &dyn Fn(&D) -> bool,
    ) -> Result<Option<Versioned<D>>, StoreError> {
        self.store.find_one(predicate)
    }

    /// Check whether any document matches a predicate.
    pub fn exists(&self, predicate: &dyn Fn(&D) -> bool) -> Result<bool, StoreError> {
        self.store.exists(predicate)
    }
}

/// Extension trait for typed collection access on any DocumentStore.
pub trait DocumentsExt: DocumentStore + Sized {
    /// Get a typed accessor for one collection.
    fn documents<D: Document>(&self) -> Documents<'_, Self, D> {
        Documents::new(self)
    }
}

impl<S: DocumentStore> DocumentsExt for S {}
