//! Persisted entity identifiers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted entity.
///
/// Hosts use either integer primary keys or opaque string keys; both appear
/// unchanged in association chains so prefix queries compare like with like.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(untagged)]
pub enum EntityId {
    Int(i64),
    Str(String),
}

impl EntityId {
    /// Parse a CLI-supplied id: integers become `Int`, everything else `Str`.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        s.parse::<i64>()
            .map_or_else(|_| Self::Str(s.to_string()), Self::Int)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_serialization() {
        assert_eq!(serde_json::to_string(&EntityId::Int(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&EntityId::from("loc-1")).unwrap(),
            "\"loc-1\""
        );
        let id: EntityId = serde_json::from_str("42").unwrap();
        assert_eq!(id, EntityId::Int(42));
    }

    #[test]
    fn parse_prefers_integers() {
        assert_eq!(EntityId::parse("12"), EntityId::Int(12));
        assert_eq!(EntityId::parse("5f1e"), EntityId::from("5f1e"));
    }
}
