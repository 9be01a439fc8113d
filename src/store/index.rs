//! Index declarations
//!
//! Indexes are declared on a model and built either immediately (auto
//! index) or on demand. Only unique indexes have observable behavior in the
//! in-process store: once built they reject duplicate keys.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::Document;
use crate::error::{StoreError, StoreResult};

/// Index declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDef {
    /// Index name, derived from the fields when not given
    #[serde(default)]
    pub name: String,
    /// Indexed fields, in key order
    pub fields: Vec<String>,
    /// Reject duplicate keys
    #[serde(default)]
    pub unique: bool,
}

impl IndexDef {
    /// Non-unique index over the given fields
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        Self {
            name: fields.join("_"),
            fields,
            unique: false,
        }
    }

    /// Unique index over the given fields
    pub fn unique<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            unique: true,
            ..Self::new(fields)
        }
    }

    /// Index key of a document. Missing fields key as null.
    pub fn key_of(&self, doc: &Document) -> String {
        let key: Vec<&Value> = self
            .fields
            .iter()
            .map(|f| doc.get(f).unwrap_or(&Value::Null))
            .collect();
        serde_json::to_string(&key).unwrap_or_default()
    }

    /// Checks that no two documents share a key
    pub fn verify(&self, documents: &[Document]) -> StoreResult<()> {
        if !self.unique {
            return Ok(());
        }
        let mut seen = HashSet::new();
        for doc in documents {
            let key = self.key_of(doc);
            if !seen.insert(key.clone()) {
                return Err(self.duplicate(&key));
            }
        }
        Ok(())
    }

    /// Checks a candidate against existing documents.
    ///
    /// `skip` is the position of the document being replaced, if any.
    pub fn admit(&self, candidate: &Document, documents: &[Document], skip: Option<usize>) -> StoreResult<()> {
        if !self.unique {
            return Ok(());
        }
        let key = self.key_of(candidate);
        let clash = documents
            .iter()
            .enumerate()
            .any(|(i, doc)| Some(i) != skip && self.key_of(doc) == key);
        if clash {
            return Err(self.duplicate(&key));
        }
        Ok(())
    }

    fn duplicate(&self, key: &str) -> StoreError {
        StoreError::operation(format!(
            "Duplicate key on index {}: {}",
            self.name, key
        ))
    }
}
