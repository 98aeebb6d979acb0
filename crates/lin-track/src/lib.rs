//! # lin-track
//!
//! Change computation and history-record assembly for Lineage.
//!
//! For each create, update or destroy on a tracked entity this crate decides
//! whether a history record is warranted, computes the tracked changeset,
//! resolves the entity's association chain, attributes the actor, and hands
//! the finished record to a persistence sink.
//!
//! - [`policy`]: per-type, per-action field eligibility
//! - [`chain`]: ownership hierarchy walk producing the scoping key
//! - [`builder`]: record assembly and the update no-op rule
//! - [`toggle`]: per-type enable/disable with scoped suspension
//! - [`tracker`]: the mutation dispatcher tying it together
//! - [`traits`]: boundary interfaces for lookup, relation metadata,
//!   persistence and scope queries

pub mod builder;
pub mod chain;
pub mod error;
pub mod lookup;
pub mod policy;
pub mod toggle;
pub mod tracker;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use builder::{HistoryRecordBuilder, WriteMode};
pub use error::{ResolutionError, TrackError};
pub use tracker::HistoryTracker;
