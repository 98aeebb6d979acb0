//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// Tracked-type declarations are inconsistent.
    #[error(transparent)]
    Policy(#[from] PolicyConfigurationError),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Conflicting or malformed field-tracking declarations.
///
/// Raised while loading configuration, before any entity of the offending
/// type can be mutated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyConfigurationError {
    /// A field is both allow-listed and excluded.
    #[error("Type '{type_name}': field '{field}' is both tracked and excluded")]
    ConflictingField { type_name: String, field: String },

    /// An allow/deny entry names a field the type does not declare.
    #[error("Type '{type_name}': {list} entry '{field}' is not a declared field")]
    UndeclaredField {
        type_name: String,
        list: &'static str,
        field: String,
    },

    /// The same entry appears twice in one list.
    #[error("Type '{type_name}': duplicate {list} entry '{value}'")]
    DuplicateEntry {
        type_name: String,
        list: &'static str,
        value: String,
    },

    /// `on = []` would make the type untrackable.
    #[error("Type '{type_name}': action scope 'on' must name at least one action")]
    EmptyActionScope { type_name: String },

    /// The declared owner type is not itself configured.
    #[error("Type '{type_name}': parent type '{parent_type}' is not configured")]
    UnknownParentType {
        type_name: String,
        parent_type: String,
    },

    /// A relation points at a type that is not configured.
    #[error("Type '{type_name}': relation '{relation}' targets unconfigured type '{target}'")]
    UnknownRelationTarget {
        type_name: String,
        relation: String,
        target: String,
    },
}
