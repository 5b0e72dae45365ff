//! Error type for catalog operations.

use std::fmt;

use crate::ids::AllocationError;
use crate::rating::RatingError;
use crate::resolver::ResolveError;
use crate::store::StoreError;

/// Error type for catalog write and lookup operations.
///
/// The HTTP layer maps these to status codes: `NotFound` → 404,
/// `Invalid`/`DuplicateReview`/`DuplicateIsbn` → 400, everything else →
/// 500. None of them terminate anything; all are request-scoped.
#[derive(Debug)]
pub enum CatalogError {
    /// No book or review matches the given identifier.
    NotFound(String),
    /// Input failed validation.
    Invalid(String),
    /// The `(book, user)` pair already has a review.
    DuplicateReview { book_key: String, user: String },
    /// A book with this ISBN already exists.
    DuplicateIsbn(String),
    /// Sequential ID allocation failed; the book was not persisted.
    Allocation(AllocationError),
    /// Aggregate recompute failed; the review mutation stays committed
    /// and the cached aggregate is stale until the next recompute.
    Rating(RatingError),
    /// Store error outside the cases above.
    Store(StoreError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound(id) => write!(f, "not found: {}", id),
            CatalogError::Invalid(msg) => write!(f, "invalid input: {}", msg),
            CatalogError::DuplicateReview { book_key, user } => {
                write!(f, "user {} has already reviewed book {}", user, book_key)
            }
            CatalogError::DuplicateIsbn(isbn) => {
                write!(f, "a book with isbn {} already exists", isbn)
            }
            CatalogError::Allocation(e) => write!(f, "allocation error: {}", e),
            CatalogError::Rating(e) => write!(f, "rating aggregate error: {}", e),
            CatalogError::Store(e) => write!(f, "store error: {}", e),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Allocation(e) => Some(e),
            CatalogError::Rating(e) => Some(e),
            CatalogError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AllocationError> for CatalogError {
    fn from(err: AllocationError) -> Self {
        CatalogError::Allocation(err)
    }
}

impl From<RatingError> for CatalogError {
    fn from(err: RatingError) -> Self {
        CatalogError::Rating(err)
    }
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        CatalogError::Store(err)
    }
}

impl From<ResolveError> for CatalogError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound(raw) => CatalogError::NotFound(raw),
            ResolveError::Store(e) => CatalogError::Store(e),
        }
    }
}
