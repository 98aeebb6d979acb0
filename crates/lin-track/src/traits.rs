//! Boundary traits for the collaborators the engine consumes or feeds.
//!
//! Implementations live with the host (entity loading, relation metadata) or
//! in `lin-trail` (persistence and scope queries).

use std::collections::HashMap;
use std::sync::Arc;

use lin_config::TrackerConfig;
use lin_core::entities::{AssociationChain, EntitySnapshot, HistoryRecord};
use lin_core::ids::EntityId;

/// Loads owner entities during chain resolution.
pub trait EntityLookup: Send + Sync {
    /// `Ok(None)` means the entity does not exist.
    fn find(&self, type_name: &str, id: &EntityId) -> anyhow::Result<Option<EntitySnapshot>>;
}

/// Confirms inverse relations when naming chain entries.
pub trait RelationMetadata: Send + Sync {
    /// `true` if `owner_type` declares `relation` and it targets `target_type`.
    fn relation_targets(&self, owner_type: &str, relation: &str, target_type: &str) -> bool;
}

/// Durably stores completed history records.
pub trait PersistenceSink: Send + Sync {
    fn persist(&self, record: &HistoryRecord) -> anyhow::Result<()>;
}

/// Returns every record whose association chain starts with `prefix`.
pub trait ScopeQuery: Send + Sync {
    fn query_scope(&self, prefix: &AssociationChain) -> anyhow::Result<Vec<HistoryRecord>>;
}

impl<T: EntityLookup + ?Sized> EntityLookup for Arc<T> {
    fn find(&self, type_name: &str, id: &EntityId) -> anyhow::Result<Option<EntitySnapshot>> {
        (**self).find(type_name, id)
    }
}

impl<T: RelationMetadata + ?Sized> RelationMetadata for Arc<T> {
    fn relation_targets(&self, owner_type: &str, relation: &str, target_type: &str) -> bool {
        (**self).relation_targets(owner_type, relation, target_type)
    }
}

impl<T: PersistenceSink + ?Sized> PersistenceSink for Arc<T> {
    fn persist(&self, record: &HistoryRecord) -> anyhow::Result<()> {
        (**self).persist(record)
    }
}

impl<T: ScopeQuery + ?Sized> ScopeQuery for Arc<T> {
    fn query_scope(&self, prefix: &AssociationChain) -> anyhow::Result<Vec<HistoryRecord>> {
        (**self).query_scope(prefix)
    }
}

/// Relation metadata declared in configuration (`[types.X] relations = {..}`).
#[derive(Debug, Clone, Default)]
pub struct RelationMap {
    relations: HashMap<(String, String), String>,
}

impl RelationMap {
    #[must_use]
    pub fn from_config(config: &TrackerConfig) -> Self {
        let relations = config
            .types
            .iter()
            .flat_map(|(owner, ty)| {
                ty.relations.iter().map(move |(relation, target)| {
                    ((owner.clone(), relation.clone()), target.clone())
                })
            })
            .collect();
        Self { relations }
    }

    /// Declare (or replace) one relation.
    pub fn insert(
        &mut self,
        owner_type: impl Into<String>,
        relation: impl Into<String>,
        target_type: impl Into<String>,
    ) {
        self.relations
            .insert((owner_type.into(), relation.into()), target_type.into());
    }
}

impl RelationMetadata for RelationMap {
    fn relation_targets(&self, owner_type: &str, relation: &str, target_type: &str) -> bool {
        self.relations
            .get(&(owner_type.to_string(), relation.to_string()))
            .is_some_and(|target| target == target_type)
    }
}
