use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use librarium::{
    AllocationError, Book, BookDraft, Catalog, CatalogError, Document, DocumentStore,
    DocumentsExt, IdAllocator, InMemoryStore, RatingAggregator, RatingError, Review, StoreError,
    Versioned, BOOK_COUNTER,
};

/// Store wrapper whose failure modes can be switched on per operation.
///
/// Clones share the inner storage and the outage switches, so a test can
/// hold one handle for flipping switches while the catalog under test
/// holds another.
#[derive(Clone, Default)]
struct UnreliableStore {
    inner: InMemoryStore,
    increment_outage: Arc<AtomicBool>,
    save_outage: Arc<AtomicBool>,
}

impl UnreliableStore {
    fn new() -> Self {
        Self::default()
    }

    fn set_increment_outage(&self, on: bool) {
        self.increment_outage.store(on, Ordering::SeqCst);
    }

    fn set_save_outage(&self, on: bool) {
        self.save_outage.store(on, Ordering::SeqCst);
    }
}

impl DocumentStore for UnreliableStore {
    fn get_document<D: Document>(&self, key: &str) -> Result<Option<Versioned<D>>, StoreError> {
        self.inner.get_document(key)
    }

    fn save_document<D: Document>(&self, doc: &D) -> Result<Versioned<D>, StoreError> {
        if self.save_outage.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("document write failed".into()));
        }
        self.inner.save_document(doc)
    }

    fn insert_document<D: Document>(&self, doc: &D) -> Result<Versioned<D>, StoreError> {
        self.inner.insert_document(doc)
    }

    fn update_document<D: Document>(
        &self,
        doc: &D,
        expected_version: u64,
    ) -> Result<Versioned<D>, StoreError> {
        self.inner.update_document(doc, expected_version)
    }

    fn delete_document<D: Document>(&self, key: &str) -> Result<bool, StoreError> {
        self.inner.delete_document::<D>(key)
    }

    fn find_documents<D: Document>(
        &self,
        predicate: &dyn Fn(&D) -> bool,
    ) -> Result<Vec<Versioned<D>>, StoreError> {
        self.inner.find_documents(predicate)
    }

    fn find_one<D: Document>(
        &self,
        predicate: &dyn Fn(&D) -> bool,
    ) -> Result<Option<Versioned<D>>, StoreError> {
        self.inner.find_one(predicate)
    }

    fn exists<D: Document>(&self, predicate: &dyn Fn(&D) -> bool) -> Result<bool, StoreError> {
        self.inner.exists(predicate)
    }

    fn increment_counter(&self, name: &str) -> Result<u64, StoreError> {
        if self.increment_outage.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("counter store unreachable".into()));
        }
        self.inner.increment_counter(name)
    }
}

fn draft(title: &str, isbn: Option<&str>) -> BookDraft {
    BookDraft {
        title: title.into(),
        author: "An Author".into(),
        genre: "Fiction".into(),
        description: "A description.".into(),
        published_year: 1999,
        isbn: isbn.map(String::from),
    }
}

// --- Allocation Failure ---

#[test]
fn failed_increment_surfaces_as_allocation_error() {
    let store = UnreliableStore::new();
    store.set_increment_outage(true);

    let err = IdAllocator::new(&store).allocate(BOOK_COUNTER).unwrap_err();
    let AllocationError::Store { counter, .. } = err;
    assert_eq!(counter, "book");
}

#[test]
fn failed_allocation_aborts_the_create_without_persisting_anything() {
    let store = UnreliableStore::new();
    let catalog = Catalog::new(store.clone());

    store.set_increment_outage(true);
    let err = catalog.add_book(draft("Unlucky", None), "owner").unwrap_err();
    assert!(matches!(err, CatalogError::Allocation(_)));

    // No book record landed.
    assert!(store.documents::<Book>().find(&|_| true).unwrap().is_empty());

    // The failed attempt consumed nothing from the counter either.
    store.set_increment_outage(false);
    let book = catalog.add_book(draft("Lucky", None), "owner").unwrap();
    assert_eq!(book.sequential_id, 1);
}

#[test]
fn failed_allocation_releases_the_isbn_claim() {
    let store = UnreliableStore::new();
    let catalog = Catalog::new(store.clone());

    store.set_increment_outage(true);
    catalog
        .add_book(draft("Unlucky", Some("978-0-306-40615-7")), "owner")
        .unwrap_err();

    // The ISBN is free again once the create has failed.
    store.set_increment_outage(false);
    let book = catalog
        .add_book(draft("Retry", Some("978-0-306-40615-7")), "owner")
        .unwrap();
    assert_eq!(book.isbn.as_deref(), Some("978-0-306-40615-7"));
}

// --- Recompute Failure ---

#[test]
fn failed_write_back_surfaces_as_rating_store_error() {
    let store = UnreliableStore::new();
    let catalog = Catalog::new(store.clone());
    let book = catalog.add_book(draft("Flaky", None), "owner").unwrap();

    store.set_save_outage(true);
    let err = RatingAggregator::new(&store).recompute(&book.key).unwrap_err();
    assert!(matches!(err, RatingError::Store(_)));
}

#[test]
fn failed_recompute_leaves_the_review_committed_and_the_aggregate_stale() {
    let store = UnreliableStore::new();
    let catalog = Catalog::new(store.clone());
    let book = catalog.add_book(draft("Flaky", None), "owner").unwrap();

    store.set_save_outage(true);
    let err = catalog
        .add_review(&book.key, "alice", 5, "great".into())
        .unwrap_err();
    assert!(matches!(err, CatalogError::Rating(RatingError::Store(_))));

    // The review mutation stays committed; only the trigger failed.
    let committed = store
        .documents::<Review>()
        .get(&Review::composite_key(&book.key, "alice"))
        .unwrap();
    assert!(committed.is_some());

    // The cached aggregate is stale until the next recompute.
    let stale = catalog.get_book(&book.key).unwrap();
    assert_eq!(stale.review_count, 0);
    assert_eq!(stale.average_rating, 0.0);

    // The next successful mutation's recompute repairs it, picking up
    // the earlier review as well.
    store.set_save_outage(false);
    catalog
        .add_review(&book.key, "bob", 3, "fine".into())
        .unwrap();

    let repaired = catalog.get_book(&book.key).unwrap();
    assert_eq!(repaired.review_count, 2);
    assert_eq!(repaired.average_rating, 4.0);
}
