use std::path::PathBuf;

use thiserror::Error;

/// Errors from the reference history stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported trail version {version} in {}", path.display())]
    UnsupportedVersion { version: u32, path: PathBuf },

    /// Requested schema name was not found in the registry.
    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    /// JSON value did not pass schema validation.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed { errors: Vec<String> },

    #[error("Schema compilation error: {0}")]
    SchemaCompile(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
