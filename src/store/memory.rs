//! In-process document collection
//!
//! Documents are kept in insertion order, which is the store's default
//! order for `find_one` and unsorted finds. Every read returns detached
//! copies.

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::document::{Document, ObjectId, ID_FIELD};
use crate::error::{StoreError, StoreResult};
use crate::query::{Criteria, FindQuery};

use super::collection::{Collection, CollectionWrite, StoreFuture};
use super::index::IndexDef;
use super::update::Update;

#[derive(Debug)]
struct DeclaredIndex {
    def: IndexDef,
    built: bool,
}

#[derive(Debug, Default)]
struct CollectionState {
    documents: Vec<Document>,
    indexes: Vec<DeclaredIndex>,
}

impl CollectionState {
    fn built_indexes(&self) -> impl Iterator<Item = &IndexDef> {
        self.indexes.iter().filter(|i| i.built).map(|i| &i.def)
    }
}

/// In-process collection
#[derive(Debug)]
pub struct MemoryCollection {
    name: String,
    /// Fields kept on insert; empty keeps everything
    fields: Vec<String>,
    state: RwLock<CollectionState>,
}

impl MemoryCollection {
    /// Creates an empty collection with no declared fields or indexes
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_model(name, Vec::new(), Vec::new(), false)
    }

    /// Creates an empty collection from a model declaration.
    ///
    /// When `build` is set the declared indexes are live immediately.
    pub fn with_model(
        name: impl Into<String>,
        fields: Vec<String>,
        indexes: Vec<IndexDef>,
        build: bool,
    ) -> Self {
        let indexes = indexes
            .into_iter()
            .map(|def| DeclaredIndex { def, built: build })
            .collect();

        Self {
            name: name.into(),
            fields,
            state: RwLock::new(CollectionState {
                documents: Vec::new(),
                indexes,
            }),
        }
    }

    /// Checks pending indexes against stored documents without building them
    pub async fn verify_indexes(&self) -> StoreResult<()> {
        let state = self.state.read().await;
        for index in state.indexes.iter().filter(|i| !i.built) {
            index.def.verify(&state.documents)?;
        }
        Ok(())
    }

    /// Builds every declared index not yet built.
    ///
    /// Returns the number of indexes built. Fails without building anything
    /// if existing documents violate a unique index.
    pub async fn ensure_indexes(&self) -> StoreResult<usize> {
        let mut state = self.state.write().await;

        for index in state.indexes.iter().filter(|i| !i.built) {
            index.def.verify(&state.documents)?;
        }

        let mut built = 0;
        for index in state.indexes.iter_mut().filter(|i| !i.built) {
            index.built = true;
            built += 1;
        }

        debug!(collection = %self.name, built, "indexes ensured");
        Ok(built)
    }

    /// Names of built indexes
    pub async fn index_names(&self) -> Vec<String> {
        let state = self.state.read().await;
        state.built_indexes().map(|d| d.name.clone()).collect()
    }

    /// Number of stored documents
    pub async fn len(&self) -> usize {
        self.state.read().await.documents.len()
    }

    /// True when the collection holds no documents
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn prepare(&self, mut doc: Document) -> Document {
        if !self.fields.is_empty() {
            doc.retain(|k, _| k == ID_FIELD || self.fields.iter().any(|f| f == k));
        }
        if !doc.contains_key(ID_FIELD) {
            doc.insert(ID_FIELD.to_string(), Value::String(ObjectId::new().to_hex()));
        }
        doc
    }
}

impl Collection for MemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    fn count<'a>(&'a self, filter: &'a Criteria) -> StoreFuture<'a, u64> {
        Box::pin(async move {
            let state = self.state.read().await;
            let count = state.documents.iter().filter(|d| filter.matches(d)).count();
            Ok(count as u64)
        })
    }

    fn find_one<'a>(&'a self, filter: &'a Criteria) -> StoreFuture<'a, Option<Document>> {
        Box::pin(async move {
            let state = self.state.read().await;
            Ok(state.documents.iter().find(|d| filter.matches(d)).cloned())
        })
    }

    fn find<'a>(&'a self, query: &'a FindQuery) -> StoreFuture<'a, Vec<Document>> {
        Box::pin(async move {
            let state = self.state.read().await;
            query.run(state.documents.iter())
        })
    }
}

impl CollectionWrite for MemoryCollection {
    fn insert_many(&self, documents: Vec<Document>) -> StoreFuture<'_, Vec<Value>> {
        Box::pin(async move {
            let prepared: Vec<Document> = documents.into_iter().map(|d| self.prepare(d)).collect();

            let mut state = self.state.write().await;

            // validate the whole batch before storing any of it
            let mut staged = state.documents.clone();
            for doc in &prepared {
                let id = doc.get(ID_FIELD).cloned().unwrap_or(Value::Null);
                if staged.iter().any(|d| d.get(ID_FIELD) == Some(&id)) {
                    return Err(StoreError::operation(format!(
                        "Duplicate key on {}.{}: {}",
                        self.name, ID_FIELD, id
                    )));
                }
                for index in state.built_indexes() {
                    index.admit(doc, &staged, None)?;
                }
                staged.push(doc.clone());
            }

            let ids = prepared
                .iter()
                .map(|d| d.get(ID_FIELD).cloned().unwrap_or(Value::Null))
                .collect();
            state.documents = staged;
            Ok(ids)
        })
    }

    fn find_one_and_update<'a>(
        &'a self,
        filter: &'a Criteria,
        update: &'a Update,
        return_new: bool,
    ) -> StoreFuture<'a, Option<Document>> {
        Box::pin(async move {
            let mut state = self.state.write().await;

            let position = match state.documents.iter().position(|d| filter.matches(d)) {
                Some(p) => p,
                None => return Ok(None),
            };

            let before = state.documents[position].clone();
            let mut after = before.clone();
            update.apply(&mut after)?;

            for index in state.built_indexes() {
                index.admit(&after, &state.documents, Some(position))?;
            }

            state.documents[position] = after.clone();

            Ok(Some(if return_new { after } else { before }))
        })
    }
}
