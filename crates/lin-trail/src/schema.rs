//! JSON Schemas for the persisted history types.
//!
//! Built once from the lin-core types with [`schemars::schema_for!`] and
//! compiled into `jsonschema` validators up front, so validating a trail
//! line does no schema work.

use std::collections::HashMap;

use jsonschema::Validator;
use lin_core::entities::{HistoryRecord, MutationEvent};
use lin_core::trail::TrailEntry;
use schemars::schema_for;
use serde_json::Value;

use crate::error::StoreError;

pub const HISTORY_RECORD: &str = "history_record";
pub const TRAIL_ENTRY: &str = "trail_entry";
pub const MUTATION_EVENT: &str = "mutation_event";

struct Compiled {
    schema: Value,
    validator: Validator,
}

pub struct SchemaRegistry {
    schemas: HashMap<&'static str, Compiled>,
}

impl SchemaRegistry {
    /// Generate and compile every schema.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::SchemaCompile` if a generated schema is rejected
    /// by the validator.
    pub fn new() -> Result<Self, StoreError> {
        let generated = [
            (HISTORY_RECORD, schema_for!(HistoryRecord).to_value()),
            (TRAIL_ENTRY, schema_for!(TrailEntry).to_value()),
            (MUTATION_EVENT, schema_for!(MutationEvent).to_value()),
        ];

        let mut schemas = HashMap::with_capacity(generated.len());
        for (name, schema) in generated {
            let validator = jsonschema::validator_for(&schema)
                .map_err(|e| StoreError::SchemaCompile(format!("{name}: {e}")))?;
            schemas.insert(name, Compiled { schema, validator });
        }
        Ok(Self { schemas })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name).map(|compiled| &compiled.schema)
    }

    /// Validate `instance` against the schema registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::SchemaNotFound` for an unknown name, or
    /// `StoreError::ValidationFailed` listing every violation.
    pub fn validate(&self, name: &str, instance: &Value) -> Result<(), StoreError> {
        let compiled = self
            .schemas
            .get(name)
            .ok_or_else(|| StoreError::SchemaNotFound(name.to_string()))?;

        let errors: Vec<String> = compiled
            .validator
            .iter_errors(instance)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(StoreError::ValidationFailed { errors })
        }
    }

    /// Registered schema names, sorted.
    #[must_use]
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.schemas.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
