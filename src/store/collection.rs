//! Collection capability traits
//!
//! The pagination engine only needs [`Collection`]: count, find-one and a
//! bounded find. Writes live on [`CollectionWrite`].
//!
//! Methods return boxed futures so the traits stay object safe and callers
//! can hold `&dyn Collection` or `Arc<dyn Collection>`.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::document::Document;
use crate::error::StoreResult;
use crate::query::{Criteria, FindQuery};

use super::update::Update;

/// Boxed store future
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// Read side of a document collection
pub trait Collection: Send + Sync {
    /// Collection name
    fn name(&self) -> &str;

    /// Counts documents matching the filter
    fn count<'a>(&'a self, filter: &'a Criteria) -> StoreFuture<'a, u64>;

    /// First matching document in store order, no sort applied
    fn find_one<'a>(&'a self, filter: &'a Criteria) -> StoreFuture<'a, Option<Document>>;

    /// Executes a bounded find
    fn find<'a>(&'a self, query: &'a FindQuery) -> StoreFuture<'a, Vec<Document>>;
}

/// Write side of a document collection
pub trait CollectionWrite: Collection {
    /// Inserts documents, returning their identifiers in input order
    fn insert_many(&self, documents: Vec<Document>) -> StoreFuture<'_, Vec<Value>>;

    /// Updates the first matching document.
    ///
    /// Returns the document as it was before the update, or after it when
    /// `return_new` is set. `None` when nothing matched.
    fn find_one_and_update<'a>(
        &'a self,
        filter: &'a Criteria,
        update: &'a Update,
        return_new: bool,
    ) -> StoreFuture<'a, Option<Document>>;
}
