//! Shared test fixtures
//!
//! `FaultyCollection` wraps a memory collection and can be told to fail any
//! of the three read calls. It also counts calls so tests can check which
//! round trips happened.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use docpage::document::Document;
use docpage::query::{Criteria, FindQuery};
use docpage::store::{Collection, CollectionWrite, MemoryCollection, StoreFuture};
use docpage::StoreError;
use serde_json::{json, Value};

/// Which reads fail, and how often each was called
#[derive(Default)]
pub struct Faults {
    pub fail_count: AtomicBool,
    pub fail_find_one: AtomicBool,
    pub fail_find: AtomicBool,
    pub hide_probe: AtomicBool,
    pub count_calls: AtomicUsize,
    pub find_one_calls: AtomicUsize,
    pub find_calls: AtomicUsize,
}

pub struct FaultyCollection {
    pub inner: MemoryCollection,
    pub faults: Faults,
}

impl FaultyCollection {
    pub fn new(inner: MemoryCollection) -> Self {
        Self {
            inner,
            faults: Faults::default(),
        }
    }

    pub fn fail_count(self) -> Self {
        self.faults.fail_count.store(true, Ordering::SeqCst);
        self
    }

    pub fn fail_find_one(self) -> Self {
        self.faults.fail_find_one.store(true, Ordering::SeqCst);
        self
    }

    pub fn fail_find(self) -> Self {
        self.faults.fail_find.store(true, Ordering::SeqCst);
        self
    }

    /// Probe succeeds but finds nothing
    pub fn hide_probe(self) -> Self {
        self.faults.hide_probe.store(true, Ordering::SeqCst);
        self
    }

    pub fn count_calls(&self) -> usize {
        self.faults.count_calls.load(Ordering::SeqCst)
    }

    pub fn find_one_calls(&self) -> usize {
        self.faults.find_one_calls.load(Ordering::SeqCst)
    }

    pub fn find_calls(&self) -> usize {
        self.faults.find_calls.load(Ordering::SeqCst)
    }
}

fn failing<'a, T: Send + 'a>(message: &'static str) -> StoreFuture<'a, T> {
    Box::pin(async move { Err::<T, StoreError>(StoreError::operation(message)) })
}

impl Collection for FaultyCollection {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn count<'a>(&'a self, filter: &'a Criteria) -> StoreFuture<'a, u64> {
        self.faults.count_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_count.load(Ordering::SeqCst) {
            return failing("count unavailable");
        }
        self.inner.count(filter)
    }

    fn find_one<'a>(&'a self, filter: &'a Criteria) -> StoreFuture<'a, Option<Document>> {
        self.faults.find_one_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_find_one.load(Ordering::SeqCst) {
            return failing("find_one unavailable");
        }
        if self.faults.hide_probe.load(Ordering::SeqCst) {
            return Box::pin(async { Ok::<Option<Document>, StoreError>(None) });
        }
        self.inner.find_one(filter)
    }

    fn find<'a>(&'a self, query: &'a FindQuery) -> StoreFuture<'a, Vec<Document>> {
        self.faults.find_calls.fetch_add(1, Ordering::SeqCst);
        if self.faults.fail_find.load(Ordering::SeqCst) {
            return failing("find unavailable");
        }
        self.inner.find(query)
    }
}

/// Builds a document from a JSON object literal
pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

/// Collection holding `_id` 1..=n, inserted in order
pub async fn numbered(n: i64) -> MemoryCollection {
    let coll = MemoryCollection::new("items");
    if n > 0 {
        let docs = (1..=n)
            .map(|i| doc(json!({ "_id": i, "n": i, "group": if i % 2 == 0 { "even" } else { "odd" } })))
            .collect();
        coll.insert_many(docs).await.unwrap();
    }
    coll
}

/// `_id` values of a page, as integers
pub fn ids(rows: &[Document]) -> Vec<i64> {
    rows.iter()
        .map(|d| d.get("_id").and_then(Value::as_i64).unwrap())
        .collect()
}
