//! InMemoryStore - HashMap-backed document store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{Counter, Document, DocumentStore, StoreError, Versioned};

/// Internal stored representation of a document.
struct StoredDocument {
    bytes: Vec<u8>,
    version: u64,
}

/// In-memory document store backed by a HashMap.
///
/// Storage key is `"collection:key"`. Clone-friendly via Arc; clones share
/// the same backing storage, which is what makes it usable across threads
/// in concurrency tests.
#[derive(Clone)]
pub struct InMemoryStore {
    storage: Arc<RwLock<HashMap<String, StoredDocument>>>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn make_key(collection: &str, key: &str) -> String {
        format!("{}:{}", collection, key)
    }

    fn encode<D: Document>(doc: &D) -> Result<Vec<u8>, StoreError> {
        serde_json::to_vec(doc).map_err(|e| StoreError::Serde(e.to_string()))
    }

    fn decode<D: Document>(bytes: &[u8]) -> Result<D, StoreError> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::Serde(e.to_string()))
    }
}

impl DocumentStore for InMemoryStore {
    fn get_document<D: Document>(&self, key: &str) -> Result<Option<Versioned<D>>, StoreError> {
        let storage_key = Self::make_key(D::COLLECTION, key);
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        match storage.get(&storage_key) {
            Some(stored) => Ok(Some(Versioned {
                data: Self::decode(&stored.bytes)?,
                version: stored.version,
            })),
            None => Ok(None),
        }
    }

    fn save_document<D: Document>(&self, doc: &D) -> Result<Versioned<D>, StoreError> {
        let storage_key = Self::make_key(D::COLLECTION, doc.key());
        let bytes = Self::encode(doc)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let new_version = storage
            .get(&storage_key)
            .map(|s| s.version + 1)
            .unwrap_or(1);

        storage.insert(
            storage_key,
            StoredDocument {
                bytes,
                version: new_version,
            },
        );

        Ok(Versioned {
            data: doc.clone(),
            version: new_version,
        })
    }

    fn insert_document<D: Document>(&self, doc: &D) -> Result<Versioned<D>, StoreError> {
        let storage_key = Self::make_key(D::COLLECTION, doc.key());
        let bytes = Self::encode(doc)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        if let Some(existing) = storage.get(&storage_key) {
            return Err(StoreError::Conflict {
                collection: D::COLLECTION.to_string(),
                key: doc.key().to_string(),
                expected: 0,
                actual: existing.version,
            });
        }

        storage.insert(storage_key, StoredDocument { bytes, version: 1 });

        Ok(Versioned {
            data: doc.clone(),
            version: 1,
        })
    }

    fn update_document<D: Document>(
        &self,
        doc: &D,
        expected_version: u64,
    ) -> Result<Versioned<D>, StoreError> {
        let storage_key = Self::make_key(D::COLLECTION, doc.key());
        let bytes = Self::encode(doc)?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let actual_version = storage
            .get(&storage_key)
            .map(|s| s.version)
            .ok_or_else(|| StoreError::NotFound {
                collection: D::COLLECTION.to_string(),
                key: doc.key().to_string(),
            })?;

        if actual_version != expected_version {
            return Err(StoreError::Conflict {
                collection: D::COLLECTION.to_string(),
                key: doc.key().to_string(),
                expected: expected_version,
                actual: actual_version,
            });
        }

        let new_version = actual_version + 1;
        storage.insert(
            storage_key,
            StoredDocument {
                bytes,
                version: new_version,
            },
        );

        Ok(Versioned {
            data: doc.clone(),
            version: new_version,
        })
    }

    fn delete_document<D: Document>(&self, key: &str) -> Result<bool, StoreError> {
        let storage_key = Self::make_key(D::COLLECTION, key);
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        Ok(storage.remove(&storage_key).is_some())
    }

    fn find_documents<D: Document>(
        &self,
        predicate: &dyn Fn(&D) -> bool,
    ) -> Result<Vec<Versioned<D>>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let prefix = format!("{}:", D::COLLECTION);
        let mut results = Vec::new();

        for (key, stored) in storage.iter() {
            if key.starts_with(&prefix) {
                if let Ok(data) = serde_json::from_slice::<D>(&stored.bytes) {
                    if predicate(&data) {
                        results.push(Versioned {
                            data,
                            version: stored.version,
                        });
                    }
                }
            }
        }

        Ok(results)
    }

    fn find_one<D: Document>(
        &self,
        predicate: &dyn Fn(&D) -> bool,
    ) -> Result<Option<Versioned<D>>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let prefix = format!("{}:", D::COLLECTION);

        for (key, stored) in storage.iter() {
            if key.starts_with(&prefix) {
                if let Ok(data) = serde_json::from_slice::<D>(&stored.bytes) {
                    if predicate(&data) {
                        return Ok(Some(Versioned {
                            data,
                            version: stored.version,
                        }));
                    }
                }
            }
        }

        Ok(None)
    }

    fn exists<D: Document>(&self, predicate: &dyn Fn(&D) -> bool) -> Result<bool, StoreError> {
        Ok(self.find_one(predicate)?.is_some())
    }

    /// The whole read-increment-write runs inside one write-lock section,
    /// so two racing increments serialize and can never observe the same
    /// pre-increment value.
    fn increment_counter(&self, name: &str) -> Result<u64, StoreError> {
        let storage_key = Self::make_key(Counter::COLLECTION, name);

        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".into()))?;

        let (mut counter, version) = match storage.get(&storage_key) {
            Some(stored) => (Self::decode::<Counter>(&stored.bytes)?, stored.version),
            None => (Counter::new(name), 0),
        };

        counter.value = counter
            .value
            .checked_add(1)
            .ok_or_else(|| StoreError::Storage(format!("counter {} overflowed", name)))?;

        let bytes = Self::encode(&counter)?;
        storage.insert(
            storage_key,
            StoredDocument {
                bytes,
                version: version + 1,
            },
        );

        Ok(counter.value)
    }
}
