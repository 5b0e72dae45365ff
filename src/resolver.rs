//! Dual-key book resolution.
//!
//! Callers may hold either a book's sequential ID ("42") or its opaque
//! internal key. The two namespaces are disjoint by construction: opaque
//! keys are hyphenated UUIDs and can never be a pure digit string. A
//! single syntactic test classifies any raw ID exactly once at the
//! boundary, and lookup dispatches on the result instead of re-sniffing
//! the string at every call site.

use std::fmt;

use crate::catalog::Book;
use crate::store::{DocumentStore, DocumentsExt, StoreError, Versioned};

/// A classified book identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookId {
    /// Human-facing sequential ID.
    Sequential(u64),
    /// Store-assigned opaque internal key.
    Opaque(String),
}

impl BookId {
    /// Classify a raw identifier string.
    ///
    /// A non-empty string of decimal digits is always sequential; anything
    /// else is always opaque. Returns None for a digit-only string too
    /// large for `u64`: syntactically sequential, but it can match no
    /// book, so the resolver turns it into a plain lookup miss rather
    /// than querying either namespace.
    pub fn classify(raw: &str) -> Option<BookId> {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            raw.parse().ok().map(BookId::Sequential)
        } else {
            Some(BookId::Opaque(raw.to_string()))
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Sequential(id) => write!(f, "{}", id),
            BookId::Opaque(key) => write!(f, "{}", key),
        }
    }
}

/// Resolves a raw identifier to the canonical book record.
pub struct Resolver<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> Resolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Resolve a raw ID to a book.
    ///
    /// Every miss (unknown sequential ID, unknown opaque key, malformed
    /// key the store cannot even look up) surfaces as
    /// [`ResolveError::NotFound`], so callers have one failure mode to
    /// map to their 404 equivalent.
    pub fn resolve(&self, raw: &str) -> Result<Versioned<Book>, ResolveError> {
        let not_found = || ResolveError::NotFound(raw.to_string());

        let id = BookId::classify(raw).ok_or_else(not_found)?;
        let found = match id {
            BookId::Sequential(n) => self
                .store
                .documents::<Book>()
                .find_one(&|book| book.sequential_id == n)?,
            BookId::Opaque(key) => self.store.documents::<Book>().get(&key)?,
        };

        found.ok_or_else(not_found)
    }
}

/// Error type for dual-key resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No book matches the raw ID. Recovered locally into a 404-equivalent
    /// outcome, not a system error.
    NotFound(String),
    /// The store failed for infrastructure reasons (not a lookup miss).
    Store(StoreError),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound(raw) => write!(f, "book not found: {}", raw),
            ResolveError::Store(e) => write!(f, "resolver store error: {}", e),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for ResolveError {
    fn from(err: StoreError) -> Self {
        match err {
            // A store-level "no such document" is the same outcome as an
            // unknown ID from the caller's point of view.
            StoreError::NotFound { key, .. } => ResolveError::NotFound(key),
            other => ResolveError::Store(other),
        }
    }
}
