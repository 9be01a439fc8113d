//! docpage - pagination over document collections
//!
//! Pages through a collection with skip/limit or with a cursor on a
//! monotonic identifier, and attaches `{RecordCount, MaxCode}` metadata to
//! the result envelope.
//!
//! ```ignore
//! let paginator = Paginator::default();
//! let params = PageParams::new().with_start(0).with_length(20).with_order("_id asc");
//! let page = paginator.page(&*collection, None, None, &params).await;
//! ```

pub mod config;
pub mod document;
pub mod envelope;
pub mod error;
pub mod ops;
pub mod pagination;
pub mod query;
pub mod registry;
pub mod store;

pub use config::{ConnectionConfig, PaginatorConfig, RegistryConfig};
pub use document::{Document, ObjectId};
pub use envelope::Envelope;
pub use error::{StoreError, StoreResult};
pub use pagination::{PageInfo, PageParams, PageResult, Paginator};
pub use query::{Constraint, Criteria, SortSpec};
pub use registry::ConnectionRegistry;
pub use store::{Collection, CollectionWrite, Database, MemoryCollection, ModelDef};
