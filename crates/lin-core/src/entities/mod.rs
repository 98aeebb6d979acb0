//! Entity structs for all Lineage domain objects.
//!
//! All persisted structs derive `Serialize`, `Deserialize`, and `JsonSchema`
//! for JSON roundtrip and schema validation.

mod actor;
mod chain;
mod event;
mod record;

pub use actor::ActorIdentity;
pub use chain::{AssociationChain, AssociationChainEntry};
pub use event::{EntitySnapshot, MutationEvent};
pub use record::HistoryRecord;
