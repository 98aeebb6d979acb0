use std::borrow::Cow;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Who caused a mutation.
///
/// The audit store accepts attribution from two disjoint identity systems: an
/// application-internal integer id and an externally issued string id. No
/// referential integrity is assumed across them.
///
/// Persisted as both storage columns, `{"modifier_id": 0,
/// "modifier_external_id": "usr_2abc"}`, so every row carries a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ModifierColumns", into = "ModifierColumns")]
pub enum ActorIdentity {
    Numeric(i64),
    External(String),
}

impl ActorIdentity {
    /// Numeric id stored alongside an external identity, and used for the
    /// system actor.
    pub const SENTINEL_ID: i64 = 0;

    /// The actor used when the host supplies none.
    #[must_use]
    pub const fn system() -> Self {
        Self::Numeric(Self::SENTINEL_ID)
    }

    /// Normalize an opaque actor reference.
    ///
    /// Whole numbers that fit in `i64` become `Numeric`. Strings become
    /// `External` verbatim, even if they look numeric. Any other JSON value
    /// becomes `External` with its JSON text. A missing or `null` reference is
    /// the system actor.
    #[must_use]
    pub fn resolve(actor: Option<&Value>) -> Self {
        match actor {
            None | Some(Value::Null) => Self::system(),
            Some(Value::Number(n)) => n
                .as_i64()
                .map_or_else(|| Self::External(n.to_string()), Self::Numeric),
            Some(Value::String(s)) => Self::External(s.clone()),
            Some(other) => Self::External(other.to_string()),
        }
    }

    /// Storage columns `(modifier_id, modifier_external_id)`.
    ///
    /// External identities keep the sentinel numeric id so every row has a
    /// populated `modifier_id`.
    #[must_use]
    pub fn modifier_columns(&self) -> (i64, Option<&str>) {
        match self {
            Self::Numeric(id) => (*id, None),
            Self::External(id) => (Self::SENTINEL_ID, Some(id.as_str())),
        }
    }
}

impl Default for ActorIdentity {
    fn default() -> Self {
        Self::system()
    }
}

/// Wire form of [`ActorIdentity`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct ModifierColumns {
    modifier_id: i64,
    #[serde(default)]
    modifier_external_id: Option<String>,
}

impl From<ModifierColumns> for ActorIdentity {
    fn from(columns: ModifierColumns) -> Self {
        match columns.modifier_external_id {
            Some(external) => Self::External(external),
            None => Self::Numeric(columns.modifier_id),
        }
    }
}

impl From<ActorIdentity> for ModifierColumns {
    fn from(actor: ActorIdentity) -> Self {
        let (modifier_id, external) = actor.modifier_columns();
        Self {
            modifier_id,
            modifier_external_id: external.map(str::to_string),
        }
    }
}

impl JsonSchema for ActorIdentity {
    fn schema_name() -> Cow<'static, str> {
        "ActorIdentity".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        ModifierColumns::json_schema(generator)
    }
}
