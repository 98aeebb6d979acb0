//! Mutation actions.
//!
//! Serialized in `snake_case`, the same strings used in config `on` lists and
//! in persisted history records.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// The host lifecycle event that produced a history record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Update,
    Destroy,
}

impl Action {
    /// All actions, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Create, Self::Update, Self::Destroy];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "destroy" => Ok(Self::Destroy),
            _ => Err(CoreError::UnknownAction(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_snake_case() {
        for action in Action::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{}\"", action.as_str()));
            let recovered: Action = serde_json::from_str(&json).unwrap();
            assert_eq!(recovered, action);
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Create".parse::<Action>().unwrap(), Action::Create);
        assert_eq!(" destroy ".parse::<Action>().unwrap(), Action::Destroy);
    }

    #[test]
    fn rejects_unknown_action() {
        let err = "upsert".parse::<Action>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownAction(ref s) if s == "upsert"));
    }
}
