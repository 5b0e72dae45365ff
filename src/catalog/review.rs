//! Review - One user's rating of one book.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use crate::store::Document;

/// A review record.
///
/// The document key is the `(book_key, user)` composite, so "at most one
/// review per user per book" is enforced by the store's atomic
/// insert-if-absent rather than a racy find-then-insert. The composite
/// contains the book's UUID and a `/`, keeping it inside the opaque-key
/// namespace. `book_sequential_id` is an informational copy of the book's
/// sequential ID for display, valid forever because sequential IDs never
/// change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub key: String,
    pub book_key: String,
    pub book_sequential_id: u64,
    pub user: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl Review {
    /// Build a review for a book. The caller validates rating and comment
    /// bounds first.
    pub fn new(book: &super::Book, user: &str, rating: u8, comment: String) -> Self {
        let now = SystemTime::now();
        Review {
            key: Self::composite_key(&book.key, user),
            book_key: book.key.clone(),
            book_sequential_id: book.sequential_id,
            user: user.to_string(),
            rating,
            comment,
            created_at: now,
            updated_at: now,
        }
    }

    /// The document key for the `(book, user)` pair.
    pub fn composite_key(book_key: &str, user: &str) -> String {
        format!("{}/{}", book_key, user)
    }
}

impl Document for Review {
    const COLLECTION: &'static str = "reviews";

    fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Book, BookDraft};

    fn book() -> Book {
        let draft = BookDraft {
            title: "Middlemarch".into(),
            author: "George Eliot".into(),
            genre: "Classic".into(),
            description: "Provincial life, observed closely.".into(),
            published_year: 1871,
            isbn: None,
        };
        Book::from_draft(draft, 3, "owner-1")
    }

    #[test]
    fn key_is_book_and_user_composite() {
        let book = book();
        let review = Review::new(&book, "alice", 5, "loved it".into());

        assert_eq!(review.key, format!("{}/alice", book.key));
        assert_eq!(review.book_key, book.key);
        assert_eq!(review.book_sequential_id, 3);
    }

    #[test]
    fn same_pair_produces_the_same_key() {
        let book = book();
        let first = Review::new(&book, "alice", 5, "a".into());
        let second = Review::new(&book, "alice", 2, "b".into());
        assert_eq!(first.key, second.key);
    }

    #[test]
    fn different_users_produce_different_keys() {
        let book = book();
        let a = Review::new(&book, "alice", 5, "a".into());
        let b = Review::new(&book, "bob", 5, "b".into());
        assert_ne!(a.key, b.key);
    }
}
