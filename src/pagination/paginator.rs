//! Page orchestration
//!
//! `page` = scope criteria → fetch rows → (optionally) count + probe.
//!
//! Only the row fetch can fail the call. Count and probe failures degrade
//! to [`PageInfo::empty`]. The three round trips run sequentially with no
//! snapshot between them, so under concurrent writers the count may not
//! match the rows.

use serde_json::Value;
use tracing::debug;

use crate::config::PaginatorConfig;
use crate::document::{is_truthy, Document};
use crate::envelope::Envelope;
use crate::query::{Constraint, Criteria, FindQuery, SortSpec};
use crate::store::Collection;

use super::info::PageInfo;
use super::params::PageParams;

/// Envelope returned by [`Paginator::page`]
pub type PageResult = Envelope<Vec<Document>>;

/// Name of the metadata field attached to a page envelope
pub const PAGE_INFO_FIELD: &str = "PageInfo";

/// Builds the bounded query for a page.
///
/// - sort: parsed from `order_name`, omitted when empty
/// - skip: `start`, omitted when 0
/// - limit: `length`, always set
///
/// Sort directions are checked by the store when the query runs.
pub fn compile_query(criteria: Criteria, params: &PageParams) -> FindQuery {
    let mut query = FindQuery::new(criteria);

    if let Some(sort) = SortSpec::parse(&params.order_name) {
        if !sort.is_empty() {
            query = query.sort(sort);
        }
    }
    if params.start != 0 {
        query = query.skip(params.start);
    }
    query.limit(params.length)
}

/// Pagination engine
#[derive(Debug, Clone, Default)]
pub struct Paginator {
    config: PaginatorConfig,
}

impl Paginator {
    /// Engine with the given configuration
    pub fn new(config: PaginatorConfig) -> Self {
        Self { config }
    }

    /// Identifier field used for cursors and `MaxCode`
    pub fn id_field(&self) -> &str {
        &self.config.id_field
    }

    /// Applies the cursor to the criteria.
    ///
    /// Absent criteria match everything. A truthy `max` sets
    /// `id_field >= max`, replacing any constraint already on that field.
    pub fn scope(&self, criteria: Option<Criteria>, max: Option<&Value>) -> Criteria {
        let mut criteria = criteria.unwrap_or_default();
        if let Some(max) = max.filter(|m| is_truthy(m)) {
            criteria.set(self.config.id_field.clone(), Constraint::Gte(max.clone()));
        }
        criteria
    }

    /// Count and probe for a criteria set. Never fails.
    pub async fn page_info<C>(&self, collection: &C, criteria: &Criteria) -> PageInfo
    where
        C: Collection + ?Sized,
    {
        let record_count = match collection.count(criteria).await {
            Ok(count) => count,
            Err(e) => {
                debug!(collection = collection.name(), error = %e, "page count failed");
                0
            }
        };

        if record_count == 0 {
            return PageInfo::empty();
        }

        let probed = match collection.find_one(criteria).await {
            Ok(Some(doc)) => doc,
            Ok(None) => {
                debug!(collection = collection.name(), "page probe found no document");
                return PageInfo::empty();
            }
            Err(e) => {
                debug!(collection = collection.name(), error = %e, "page probe failed");
                return PageInfo::empty();
            }
        };

        PageInfo {
            record_count,
            max_code: probed
                .get(&self.config.id_field)
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())),
        }
    }

    /// Fetches one page of rows
    pub async fn page_list<C>(
        &self,
        collection: &C,
        criteria: &Criteria,
        params: &PageParams,
    ) -> Envelope<Vec<Document>>
    where
        C: Collection + ?Sized,
    {
        let query = compile_query(criteria.clone(), params);
        debug!(
            collection = collection.name(),
            skip = ?query.skip,
            limit = query.limit,
            sorted = query.sort.is_some(),
            "fetching page"
        );
        Envelope::wrap(collection.find(&query)).await
    }

    /// Fetches a page and, when requested, its metadata
    pub async fn page<C>(
        &self,
        collection: &C,
        criteria: Option<Criteria>,
        max: Option<Value>,
        params: &PageParams,
    ) -> PageResult
    where
        C: Collection + ?Sized,
    {
        let criteria = self.scope(criteria, max.as_ref());

        let mut result = self.page_list(collection, &criteria, params).await;
        if result.has_error() || !params.get_page_info {
            return result;
        }

        let info = self.page_info(collection, &criteria).await;
        result.put_value(PAGE_INFO_FIELD, info.to_value());
        result
    }
}

impl Envelope<Vec<Document>> {
    /// Page rows; empty when the fetch failed
    pub fn rows(&self) -> &[Document] {
        self.return_object().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Attached page metadata
    pub fn page_info(&self) -> Option<PageInfo> {
        self.value(PAGE_INFO_FIELD)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}
