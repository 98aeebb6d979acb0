//! Per-type tracking declarations.

use std::collections::BTreeMap;

use lin_core::enums::Action;
use serde::{Deserialize, Serialize};

fn default_actions() -> Vec<Action> {
    Action::ALL.to_vec()
}

/// The single owner relation a tracked type declares.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParentConfig {
    /// Type name of the owner.
    #[serde(rename = "type")]
    pub type_name: String,

    /// Name of the owner's relation pointing back at this type
    /// (e.g. `listings` on `Location`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse_of: Option<String>,
}

/// Tracking declaration for one entity type.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypeConfig {
    /// Statically declared attribute list. When set, allow/deny entries must
    /// name one of these fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<String>>,

    /// Allow-list: only these fields are ever tracked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracked_fields: Option<Vec<String>>,

    /// Deny-list: these fields are never tracked.
    #[serde(default)]
    pub excluded_fields: Vec<String>,

    /// Actions that produce history for this type.
    #[serde(default = "default_actions")]
    pub on: Vec<Action>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentConfig>,

    /// Relation metadata: relation name on this type -> target type name.
    #[serde(default)]
    pub relations: BTreeMap<String, String>,
}

impl Default for TypeConfig {
    fn default() -> Self {
        Self {
            fields: None,
            tracked_fields: None,
            excluded_fields: Vec::new(),
            on: default_actions(),
            parent: None,
            relations: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_track_every_action() {
        let config = TypeConfig::default();
        assert_eq!(config.on, vec![Action::Create, Action::Update, Action::Destroy]);
        assert!(config.tracked_fields.is_none());
        assert!(config.excluded_fields.is_empty());
    }
}
