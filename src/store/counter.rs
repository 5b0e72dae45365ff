//! Counter - Named monotonic counter document.

use serde::{Deserialize, Serialize};

use super::Document;

/// A named, atomically-incrementable integer used to mint sequential IDs.
///
/// One document per counted entity class, keyed by name. Created
/// implicitly on the first increment, never deleted, and mutated only
/// through [`DocumentStore::increment_counter`](super::DocumentStore::increment_counter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    pub name: String,
    pub value: u64,
}

impl Counter {
    /// A fresh counter at zero, as minted by the upsert path.
    pub fn new(name: impl Into<String>) -> Self {
        Counter {
            name: name.into(),
            value: 0,
        }
    }
}

impl Document for Counter {
    const COLLECTION: &'static str = "counters";

    fn key(&self) -> &str {
        &self.name
    }
}
