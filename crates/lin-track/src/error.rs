//! Error types for lin-track.

use lin_core::ids::EntityId;
use thiserror::Error;

/// Failures while walking an entity's ownership hierarchy.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The entity references an owner that cannot be loaded.
    #[error("Parent {parent_type} {parent_id} of {child_type} {child_id} not found")]
    MissingParent {
        child_type: String,
        child_id: EntityId,
        parent_type: String,
        parent_id: EntityId,
    },

    /// The owner declares no relation pointing back at the child's type.
    #[error(
        "No inverse relation on {parent_type} for {child_type} {child_id} (declared: {})",
        .relation.as_deref().unwrap_or("none")
    )]
    UnresolvedInverse {
        child_type: String,
        child_id: EntityId,
        parent_type: String,
        relation: Option<String>,
    },

    /// The lookup collaborator itself failed.
    #[error("Lookup of {type_name} {id} failed")]
    Lookup {
        type_name: String,
        id: EntityId,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors from building, persisting, or querying history records.
#[derive(Debug, Error)]
pub enum TrackError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Recursion cap hit while resolving an association chain, which
    /// indicates a cyclic parent declaration.
    #[error("Association chain for {type_name} {id} exceeds {limit} ancestors")]
    ChainDepthExceeded {
        type_name: String,
        id: EntityId,
        limit: usize,
    },

    /// The entity's type has no tracking declaration.
    #[error("Type '{0}' is not configured for tracking")]
    UntrackedType(String),

    /// The persistence sink rejected a completed record.
    #[error("Persisting history record failed")]
    Persistence(#[source] anyhow::Error),

    /// The scope query collaborator failed.
    #[error("History query failed")]
    Query(#[source] anyhow::Error),
}
