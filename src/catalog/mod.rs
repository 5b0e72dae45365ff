//! Catalog - Books, reviews, and the operations that keep them consistent.
//!
//! The [`Catalog`] service owns the write paths with real invariants:
//! book creation allocates the sequential ID before the record is durably
//! written, and every review mutation fires the rating recompute after it
//! commits. Listing, searching, pagination, and authorization live in the
//! surrounding HTTP layer, not here.

mod book;
mod catalog;
mod error;
mod review;

pub use book::{Book, BookDraft};
pub(crate) use book::IsbnClaim;
pub use catalog::Catalog;
pub use error::CatalogError;
pub use review::Review;
