//! Book - Catalog entry with dual identity and cached rating aggregate.

use std::time::SystemTime;

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;

/// A book record.
///
/// `key` is the store-assigned opaque identifier; `sequential_id` is the
/// human-facing integer, assigned exactly once at creation and never
/// changed. `average_rating` and `review_count` are a cache over the
/// book's review set, written only by the rating aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub key: String,
    pub sequential_id: u64,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub published_year: i32,
    pub isbn: Option<String>,
    pub owner: String,
    pub average_rating: f64,
    pub review_count: u64,
    pub created_at: SystemTime,
    pub updated_at: SystemTime,
}

impl Book {
    /// Build a book from a validated draft and a freshly allocated
    /// sequential ID.
    ///
    /// The opaque key is a hyphenated UUID v4, never a pure digit
    /// string, which keeps the opaque namespace disjoint from sequential
    /// IDs by construction.
    pub fn from_draft(draft: BookDraft, sequential_id: u64, owner: &str) -> Self {
        let now = SystemTime::now();
        Book {
            key: Uuid::new_v4().to_string(),
            sequential_id,
            title: draft.title,
            author: draft.author,
            genre: draft.genre,
            description: draft.description,
            published_year: draft.published_year,
            isbn: draft.isbn,
            owner: owner.to_string(),
            average_rating: 0.0,
            review_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Book {
    const COLLECTION: &'static str = "books";

    fn key(&self) -> &str {
        &self.key
    }
}

/// A claim on an ISBN, keyed by the ISBN itself.
///
/// ISBN uniqueness cannot be a read-then-insert: concurrent creates all
/// pass the read and then commit. Claiming the ISBN with the store's
/// atomic insert-if-absent makes exactly one creator win, the same way
/// the `(book, user)` composite key guards reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct IsbnClaim {
    pub isbn: String,
}

impl IsbnClaim {
    pub fn new(isbn: String) -> Self {
        IsbnClaim { isbn }
    }
}

impl Document for IsbnClaim {
    const COLLECTION: &'static str = "isbns";

    fn key(&self) -> &str {
        &self.isbn
    }
}

/// Caller-supplied fields for creating a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub description: String,
    pub published_year: i32,
    pub isbn: Option<String>,
}

impl BookDraft {
    /// Validate field bounds. Returns the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        required_within(&self.title, "title", 200)?;
        required_within(&self.author, "author", 100)?;
        required_within(&self.genre, "genre", 50)?;
        required_within(&self.description, "description", 2000)?;

        let current_year = Utc::now().year();
        if !(1000..=current_year).contains(&self.published_year) {
            return Err(format!(
                "published year {} is out of range",
                self.published_year
            ));
        }

        if let Some(isbn) = &self.isbn {
            if isbn.trim().is_empty() {
                return Err("isbn, when present, cannot be blank".to_string());
            }
        }

        Ok(())
    }
}

fn required_within(value: &str, field: &str, max: usize) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    if value.chars().count() > max {
        return Err(format!("{} cannot exceed {} characters", field, max));
    }
    Ok(())
}
