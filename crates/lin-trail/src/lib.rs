//! # lin-trail
//!
//! Reference persistence for Lineage history records. Both stores implement
//! [`lin_track::traits::PersistenceSink`] and
//! [`lin_track::traits::ScopeQuery`].
//!
//! - [`MemoryStore`]: records held in process memory
//! - [`JsonlStore`]: append-only JSONL files, one per tracked type
//! - [`SchemaRegistry`]: JSON Schemas for the persisted types

pub mod error;
pub mod jsonl;
pub mod memory;
pub mod schema;

pub use error::StoreError;
pub use jsonl::JsonlStore;
pub use memory::MemoryStore;
pub use schema::SchemaRegistry;
