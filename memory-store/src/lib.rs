//! # memory-store
//!
//! Persistent storage for tagged, linkable memories, backed by
//! [`redb`](https://docs.rs/redb), an embedded single-file key-value store.
//!
//! ## Module Organization
//!
//! **Primary APIs**
//! - [`store::MemoryStore`] — opens the database and owns the shared handle.
//! - [`ops`] — ownership-checked CRUD, tagging, search, and graph links.
//!
//! **Support Modules**
//! - [`model`] — the persisted domain types (`Memory`, `Tag`, `MemoryLink`, ...).
//! - [`tables`] — redb table definitions and the indexing scheme.
//! - [`normalize`] — tag path normalisation shared by every tagging operation.

pub mod model;
pub mod normalize;
pub mod ops;
pub mod store;
mod tables;

pub use model::{LinkType, Memory, MemoryLink, MemoryMetadata, MemoryTagAssociation, Sector, Tag, TagSearchOp, TagStat};
pub use store::MemoryStore;
