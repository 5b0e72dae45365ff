//! Catalog service - Write operations with their consistency steps inline.

use std::time::SystemTime;

use crate::ids::{IdAllocator, BOOK_COUNTER};
use crate::rating::RatingAggregator;
use crate::resolver::Resolver;
use crate::store::{DocumentStore, DocumentsExt, StoreError};

use super::{Book, BookDraft, CatalogError, IsbnClaim, Review};

/// The catalog's write and lookup surface.
///
/// Each operation spells out its consistency steps explicitly: book
/// creation allocates the sequential ID before the insert, and every
/// review mutation calls the rating recompute after its commit. The
/// recompute is never skipped and never conditional on caller context.
/// If it fails, the review mutation stays committed and the error is
/// surfaced for the caller to report.
pub struct Catalog<S> {
    store: S,
}

impl<S: DocumentStore> Catalog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a book.
    ///
    /// The sequential ID is allocated before the record is durably
    /// written, so the ID is part of the initial insert rather than a
    /// backfill. If the insert fails after allocation, the consumed
    /// counter value becomes a gap: sequential IDs are unique and
    /// increasing, not contiguous.
    pub fn add_book(&self, draft: BookDraft, owner: &str) -> Result<Book, CatalogError> {
        draft.validate().map_err(CatalogError::Invalid)?;

        // ISBN uniqueness rides on the store's atomic insert-if-absent,
        // not a read-then-insert: of any number of racing creators,
        // exactly one claim lands.
        let claim = match draft.isbn.clone() {
            Some(isbn) => {
                let claim = IsbnClaim::new(isbn);
                match self.store.documents::<IsbnClaim>().insert(&claim) {
                    Ok(_) => Some(claim),
                    Err(StoreError::Conflict { .. }) => {
                        return Err(CatalogError::DuplicateIsbn(claim.isbn))
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            None => None,
        };

        match self.insert_with_fresh_id(draft, owner) {
            Ok(book) => Ok(book),
            Err(e) => {
                // The book never landed; release the claim so the ISBN
                // stays usable.
                if let Some(claim) = claim {
                    let _ = self.store.documents::<IsbnClaim>().delete(&claim.isbn);
                }
                Err(e)
            }
        }
    }

    fn insert_with_fresh_id(&self, draft: BookDraft, owner: &str) -> Result<Book, CatalogError> {
        let sequential_id = IdAllocator::new(&self.store).allocate(BOOK_COUNTER)?;
        let book = Book::from_draft(draft, sequential_id, owner);
        self.store.documents::<Book>().insert(&book)?;
        Ok(book)
    }

    /// Look up a book by sequential ID or opaque key.
    pub fn get_book(&self, raw_id: &str) -> Result<Book, CatalogError> {
        Ok(Resolver::new(&self.store).resolve(raw_id)?.data)
    }

    /// Create a review for a book, addressed by either ID form.
    ///
    /// A duplicate `(book, user)` pair is rejected by the store's atomic
    /// insert before any aggregate trigger fires.
    pub fn add_review(
        &self,
        raw_book_id: &str,
        user: &str,
        rating: u8,
        comment: String,
    ) -> Result<Review, CatalogError> {
        validate_review(rating, &comment)?;

        let book = Resolver::new(&self.store).resolve(raw_book_id)?.data;
        let review = Review::new(&book, user, rating, comment);

        match self.store.documents::<Review>().insert(&review) {
            Ok(_) => {}
            Err(StoreError::Conflict { .. }) => {
                return Err(CatalogError::DuplicateReview {
                    book_key: book.key,
                    user: user.to_string(),
                })
            }
            Err(e) => return Err(e.into()),
        }

        RatingAggregator::new(&self.store).recompute(&book.key)?;
        Ok(review)
    }

    /// Update a review's rating and comment.
    ///
    /// The recompute fires only when the rating actually changed; the
    /// aggregate does not depend on comments.
    pub fn update_review(
        &self,
        review_key: &str,
        rating: u8,
        comment: String,
    ) -> Result<Review, CatalogError> {
        validate_review(rating, &comment)?;

        let mut review = self
            .store
            .documents::<Review>()
            .get(review_key)?
            .ok_or_else(|| CatalogError::NotFound(review_key.to_string()))?;

        let rating_changed = review.data.rating != rating;
        review.data.rating = rating;
        review.data.comment = comment;
        review.data.updated_at = SystemTime::now();

        self.store
            .documents::<Review>()
            .update(&review.data, review.version)?;

        if rating_changed {
            RatingAggregator::new(&self.store).recompute(&review.data.book_key)?;
        }

        Ok(review.data)
    }

    /// Delete a review, then resynchronize the book's aggregate.
    pub fn delete_review(&self, review_key: &str) -> Result<(), CatalogError> {
        let review = self
            .store
            .documents::<Review>()
            .get(review_key)?
            .ok_or_else(|| CatalogError::NotFound(review_key.to_string()))?;

        if !self.store.documents::<Review>().delete(review_key)? {
            return Err(CatalogError::NotFound(review_key.to_string()));
        }

        RatingAggregator::new(&self.store).recompute(&review.data.book_key)?;
        Ok(())
    }
}

fn validate_review(rating: u8, comment: &str) -> Result<(), CatalogError> {
    if !(1..=5).contains(&rating) {
        return Err(CatalogError::Invalid(format!(
            "rating {} must be between 1 and 5",
            rating
        )));
    }
    if comment.trim().is_empty() {
        return Err(CatalogError::Invalid("comment is required".into()));
    }
    if comment.chars().count() > 1000 {
        return Err(CatalogError::Invalid(
            "comment cannot exceed 1000 characters".into(),
        ));
    }
    Ok(())
}
