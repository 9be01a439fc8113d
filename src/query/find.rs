//! Bounded find query
//!
//! A pending, not-yet-executed query: filter, optional sort, optional skip
//! and a limit. A limit of 0 means no limit.

use crate::document::Document;
use crate::error::StoreResult;

use super::criteria::Criteria;
use super::sort::{sort_documents, SortSpec};

/// Query descriptor handed to a collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    /// Filter criteria
    pub filter: Criteria,
    /// Sort stage, absent means store order
    pub sort: Option<SortSpec>,
    /// Rows to skip, absent means none
    pub skip: Option<u64>,
    /// Maximum rows, 0 means no limit
    pub limit: u64,
}

impl FindQuery {
    /// Starts a query over the given criteria
    pub fn new(filter: Criteria) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }

    /// Adds a sort stage
    pub fn sort(mut self, spec: SortSpec) -> Self {
        self.sort = Some(spec);
        self
    }

    /// Adds a skip stage
    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Sets the limit
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Runs the query over documents in store order.
    ///
    /// Sort directions are resolved before any document is touched, so an
    /// invalid direction fails the whole query.
    pub fn run<'a>(&self, documents: impl Iterator<Item = &'a Document>) -> StoreResult<Vec<Document>> {
        let sort_keys = match &self.sort {
            Some(spec) => spec.resolve()?,
            None => Vec::new(),
        };

        let mut matched: Vec<Document> = documents
            .filter(|doc| self.filter.matches(doc))
            .cloned()
            .collect();

        sort_documents(&mut matched, &sort_keys);

        let skip = usize::try_from(self.skip.unwrap_or(0)).unwrap_or(usize::MAX);
        let rows = matched.into_iter().skip(skip);

        Ok(match self.limit {
            0 => rows.collect(),
            n => rows.take(usize::try_from(n).unwrap_or(usize::MAX)).collect(),
        })
    }
}
