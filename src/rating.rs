//! Rating aggregate maintenance.
//!
//! A book's `average_rating` and `review_count` are a cache derived from
//! its review set, never a source of truth. The aggregator recomputes both
//! from a full re-scan of the book's reviews and writes them back. The
//! re-scan is deliberately not incremental: every successful recompute
//! erases any drift a previous failure or race left behind.
//!
//! The read and the write-back are not one transaction. A review that
//! commits between them is picked up by its own triggered recompute, and
//! two recomputes racing for the same book may land in either order.
//! Callers treat the cached aggregate as approximate until the latest
//! triggered recompute completes.

use std::fmt;

use crate::catalog::{Book, Review};
use crate::store::{DocumentStore, DocumentsExt, StoreError};

/// The derived rating statistics for one book.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub review_count: u64,
}

impl RatingSummary {
    /// Compute the summary for a set of ratings.
    ///
    /// The mean is rounded half-up to one decimal place, matching the
    /// rendered precision of the catalog API. Zero ratings yields
    /// `{0.0, 0}`; an empty review set is a valid state, not an error.
    pub fn from_ratings(ratings: &[u8]) -> Self {
        if ratings.is_empty() {
            return RatingSummary {
                average_rating: 0.0,
                review_count: 0,
            };
        }

        let sum: u64 = ratings.iter().map(|&r| u64::from(r)).sum();
        let mean = sum as f64 / ratings.len() as f64;

        RatingSummary {
            // f64::round is half-away-from-zero, which is half-up for the
            // non-negative means possible here.
            average_rating: (mean * 10.0).round() / 10.0,
            review_count: ratings.len() as u64,
        }
    }
}

/// Recomputes and persists a book's rating aggregate.
pub struct RatingAggregator<'a, S> {
    store: &'a S,
}

impl<'a, S: DocumentStore> RatingAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Recompute the aggregate for the book with the given internal key.
    ///
    /// After a successful return the book's cached aggregate exactly
    /// matches the review set as it existed when the reviews were read.
    /// Only `average_rating` and `review_count` are touched; the
    /// aggregator is the sole writer of those two fields.
    pub fn recompute(&self, book_key: &str) -> Result<RatingSummary, RatingError> {
        let reviews = self
            .store
            .documents::<Review>()
            .find(&|review| review.book_key == book_key)?;

        let ratings: Vec<u8> = reviews.iter().map(|r| r.data.rating).collect();
        let summary = RatingSummary::from_ratings(&ratings);

        let mut book = self
            .store
            .documents::<Book>()
            .get(book_key)?
            .ok_or_else(|| RatingError::BookMissing(book_key.to_string()))?;

        book.data.average_rating = summary.average_rating;
        book.data.review_count = summary.review_count;

        // Last writer wins between racing recomputes; the store serializes
        // the individual document writes.
        self.store.documents::<Book>().save(&book.data)?;

        Ok(summary)
    }
}

/// Error type for aggregate recomputation.
///
/// A failed recompute leaves the originating review mutation committed and
/// the cached aggregate temporarily stale; the next successful recompute
/// for the book corrects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingError {
    /// The book record was gone when the aggregate write-back ran.
    BookMissing(String),
    /// The store failed during the re-scan or the write-back.
    Store(StoreError),
}

impl fmt::Display for RatingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingError::BookMissing(key) => {
                write!(f, "cannot write aggregate: book {} is missing", key)
            }
            RatingError::Store(e) => write!(f, "aggregate recompute store error: {}", e),
        }
    }
}

impl std::error::Error for RatingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RatingError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StoreError> for RatingError {
    fn from(err: StoreError) -> Self {
        RatingError::Store(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Book, BookDraft, Review};
    use crate::store::InMemoryStore;

    fn seed_book(store: &InMemoryStore, sequential_id: u64) -> Book {
        let draft = BookDraft {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            genre: "Science Fiction".into(),
            description: "A desert planet and its spice.".into(),
            published_year: 1965,
            isbn: None,
        };
        let book = Book::from_draft(draft, sequential_id, "user-1");
        store.save_document(&book).unwrap();
        book
    }

    fn seed_review(store: &InMemoryStore, book: &Book, user: &str, rating: u8) {
        let review = Review::new(book, user, rating, "fine".into());
        store.insert_document(&review).unwrap();
    }

    #[test]
    fn summary_of_no_ratings_is_zero() {
        let summary = RatingSummary::from_ratings(&[]);
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.review_count, 0);
    }

    #[test]
    fn summary_rounds_half_up_to_one_decimal() {
        // 5 / 3 = 1.666… -> 1.7
        let summary = RatingSummary::from_ratings(&[1, 2, 2]);
        assert_eq!(summary.average_rating, 1.7);

        // 9 / 2 = 4.5 stays 4.5
        let summary = RatingSummary::from_ratings(&[4, 5]);
        assert_eq!(summary.average_rating, 4.5);

        // 13 / 4 = 3.25 -> 3.3 (half-up)
        let summary = RatingSummary::from_ratings(&[3, 3, 3, 4]);
        assert_eq!(summary.average_rating, 3.3);
    }

    #[test]
    fn recompute_writes_aggregate_onto_book() {
        let store = InMemoryStore::new();
        let book = seed_book(&store, 1);
        seed_review(&store, &book, "alice", 4);
        seed_review(&store, &book, "bob", 5);
        seed_review(&store, &book, "carol", 3);

        let summary = RatingAggregator::new(&store).recompute(&book.key).unwrap();
        assert_eq!(summary.average_rating, 4.0);
        assert_eq!(summary.review_count, 3);

        let stored = store.get_document::<Book>(&book.key).unwrap().unwrap();
        assert_eq!(stored.data.average_rating, 4.0);
        assert_eq!(stored.data.review_count, 3);
    }

    #[test]
    fn recompute_with_no_reviews_resets_to_zero() {
        let store = InMemoryStore::new();
        let mut book = seed_book(&store, 1);

        // Simulate a stale cache.
        book.average_rating = 4.2;
        book.review_count = 9;
        store.save_document(&book).unwrap();

        let summary = RatingAggregator::new(&store).recompute(&book.key).unwrap();
        assert_eq!(summary.average_rating, 0.0);
        assert_eq!(summary.review_count, 0);
    }

    #[test]
    fn recompute_ignores_other_books_reviews() {
        let store = InMemoryStore::new();
        let first = seed_book(&store, 1);
        let second = seed_book(&store, 2);
        seed_review(&store, &first, "alice", 1);
        seed_review(&store, &second, "alice", 5);

        let summary = RatingAggregator::new(&store).recompute(&first.key).unwrap();
        assert_eq!(summary.average_rating, 1.0);
        assert_eq!(summary.review_count, 1);
    }

    #[test]
    fn recompute_for_missing_book_fails() {
        let store = InMemoryStore::new();
        let err = RatingAggregator::new(&store)
            .recompute("no-such-book")
            .unwrap_err();
        assert_eq!(err, RatingError::BookMissing("no-such-book".into()));
    }
}
