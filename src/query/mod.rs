//! Query subsystem
//!
//! Typed filter criteria, order specs and the bounded find descriptor that
//! collections execute.
//!
//! # Query shape
//!
//! 1. Filter documents by criteria (AND semantics)
//! 2. Sort, if a sort stage is present
//! 3. Skip, if a skip stage is present
//! 4. Limit, 0 meaning unbounded

mod criteria;
mod find;
mod sort;

pub use criteria::{Constraint, Criteria};
pub use find::FindQuery;
pub use sort::{sort_documents, SortDirection, SortSpec};
