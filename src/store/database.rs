//! Database handle and model registration
//!
//! A `Database` owns the collections registered through [`Database::model`].
//! The collection name is the model name.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::StoreResult;

use super::index::IndexDef;
use super::memory::MemoryCollection;

/// Model declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDef {
    /// Declared fields; inserts keep only these plus the identifier.
    /// Empty keeps every field.
    #[serde(default)]
    pub fields: Vec<String>,
    /// Declared indexes
    #[serde(default)]
    pub indexes: Vec<IndexDef>,
}

impl ModelDef {
    /// Empty declaration
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a field
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(name.into());
        self
    }

    /// Declares an index
    pub fn index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }
}

/// A named database
#[derive(Debug)]
pub struct Database {
    name: String,
    auto_index: bool,
    models: RwLock<HashMap<String, Arc<MemoryCollection>>>,
}

impl Database {
    /// Creates an empty database
    pub fn new(name: impl Into<String>, auto_index: bool) -> Self {
        Self {
            name: name.into(),
            auto_index,
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether declared indexes are built at registration
    pub fn auto_index(&self) -> bool {
        self.auto_index
    }

    /// Registers a model and returns its collection.
    ///
    /// Registering a name twice returns the first registration unchanged.
    pub fn model(&self, name: &str, def: ModelDef) -> Arc<MemoryCollection> {
        let mut models = self.models.write().unwrap_or_else(|e| e.into_inner());

        if let Some(existing) = models.get(name) {
            return Arc::clone(existing);
        }

        debug!(
            database = %self.name,
            model = name,
            indexes = def.indexes.len(),
            "model registered"
        );

        let collection = Arc::new(MemoryCollection::with_model(
            name,
            def.fields,
            def.indexes,
            self.auto_index,
        ));
        models.insert(name.to_string(), Arc::clone(&collection));
        collection
    }

    /// Looks up a registered model's collection
    pub fn collection(&self, name: &str) -> Option<Arc<MemoryCollection>> {
        let models = self.models.read().unwrap_or_else(|e| e.into_inner());
        models.get(name).cloned()
    }

    /// Registered model names, sorted
    pub fn model_names(&self) -> Vec<String> {
        let models = self.models.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = models.keys().cloned().collect();
        names.sort();
        names
    }

    /// Builds all pending indexes on every registered collection.
    ///
    /// Every collection is verified first, so a duplicate key anywhere fails
    /// the call before any index is built. A write landing between the two
    /// passes can still fail the build of its own collection part-way.
    /// Returns the number of indexes built.
    pub async fn ensure_indexes(&self) -> StoreResult<usize> {
        let collections: Vec<Arc<MemoryCollection>> = {
            let models = self.models.read().unwrap_or_else(|e| e.into_inner());
            models.values().cloned().collect()
        };

        for collection in &collections {
            collection.verify_indexes().await?;
        }

        let mut built = 0;
        for collection in collections {
            built += collection.ensure_indexes().await?;
        }
        Ok(built)
    }
}
