//! Pagination engine
//!
//! Combines skip/limit paging with cursor paging on a monotonic identifier,
//! and attaches best-effort page metadata.
//!
//! # Flow
//!
//! 1. Default absent criteria to match-all
//! 2. Apply the cursor as `id >= max`
//! 3. Fetch the page; a failure here is returned to the caller
//! 4. If requested, count and probe under the same criteria; failures here
//!    degrade to `{RecordCount: 0, MaxCode: ""}`

mod info;
mod paginator;
mod params;

pub use info::PageInfo;
pub use paginator::{compile_query, PageResult, Paginator, PAGE_INFO_FIELD};
pub use params::PageParams;
