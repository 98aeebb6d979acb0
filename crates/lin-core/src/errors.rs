//! Cross-cutting error types for Lineage.
//!
//! Domain-specific errors (`ConfigError`, `TrackError`, `StoreError`) are
//! defined in their respective crates. The CLI converges them through
//! `anyhow`.

use thiserror::Error;

/// Errors that can be raised while working with core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A string did not name a known mutation action.
    #[error("Unknown action '{0}' (expected create, update or destroy)")]
    UnknownAction(String),

    /// A scope segment could not be parsed as `name=id`.
    #[error("Invalid scope segment '{0}' (expected name=id)")]
    InvalidScope(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
