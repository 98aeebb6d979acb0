use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::changeset::{ChangeSet, FieldMap};
use crate::enums::Action;
use crate::ids::EntityId;

/// What the host hands over about one entity.
///
/// Replaces reflective attribute reads: the host declares the type, the
/// persisted id, the owner id (if the type declares an owner relation), and
/// the current attribute values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EntitySnapshot {
    pub type_name: String,
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<EntityId>,
    #[serde(default)]
    pub attributes: FieldMap,
}

impl EntitySnapshot {
    #[must_use]
    pub fn new(type_name: impl Into<String>, id: impl Into<EntityId>) -> Self {
        Self {
            type_name: type_name.into(),
            id: id.into(),
            parent_id: None,
            attributes: FieldMap::new(),
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<EntityId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }
}

/// A completed create/update/destroy on the host's model layer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MutationEvent {
    pub entity: EntitySnapshot,
    pub action: Action,
    /// Raw `[before, after]` pairs reported by the host. Optional for create
    /// and destroy, where the attribute snapshot supplies the baseline.
    #[serde(default)]
    pub changes: ChangeSet,
    /// Opaque actor reference; absent means the system actor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<Value>,
}
