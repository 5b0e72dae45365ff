mod catalog;
mod ids;
mod rating;
mod resolver;
mod store;

pub use catalog::{Book, BookDraft, Catalog, CatalogError, Review};
pub use ids::{AllocationError, IdAllocator, BOOK_COUNTER};
pub use rating::{RatingAggregator, RatingError, RatingSummary};
pub use resolver::{BookId, ResolveError, Resolver};
pub use store::{
    Counter, Document, DocumentStore, Documents, DocumentsExt, InMemoryStore, StoreError,
    Versioned,
};
