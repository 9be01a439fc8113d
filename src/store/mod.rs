//! Document store
//!
//! The collection capability the pagination engine runs against, plus an
//! in-process implementation with model registration and index building.
//!
//! # Components
//!
//! - [`Collection`] / [`CollectionWrite`]: object-safe async capability traits
//! - [`MemoryCollection`]: insertion-ordered in-process collection
//! - [`Database`]: model registry for one named database
//! - [`Update`]: parsed `$set` / `$inc` / `$unset` updates

mod collection;
mod database;
mod index;
mod memory;
mod update;

pub use collection::{Collection, CollectionWrite, StoreFuture};
pub use database::{Database, ModelDef};
pub use index::IndexDef;
pub use memory::MemoryCollection;
pub use update::Update;
