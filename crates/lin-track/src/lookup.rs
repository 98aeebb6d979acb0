//! In-memory entity lookup.
//!
//! Keeps the latest snapshot per `(type, id)`. Used by replay tooling, where
//! owners are known only from earlier mutation events, and by tests.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use lin_core::entities::EntitySnapshot;
use lin_core::ids::EntityId;

use crate::traits::EntityLookup;

type Key = (String, EntityId);

#[derive(Debug, Default)]
pub struct SnapshotIndex {
    entries: RwLock<HashMap<Key, EntitySnapshot>>,
}

impl SnapshotIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the snapshot for its `(type, id)`.
    pub fn upsert(&self, snapshot: EntitySnapshot) {
        let key = (snapshot.type_name.clone(), snapshot.id.clone());
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, snapshot);
    }

    /// Forget an entity, returning its last snapshot.
    pub fn remove(&self, type_name: &str, id: &EntityId) -> Option<EntitySnapshot> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&(type_name.to_string(), id.clone()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const N: usize> From<[EntitySnapshot; N]> for SnapshotIndex {
    fn from(snapshots: [EntitySnapshot; N]) -> Self {
        snapshots.into_iter().collect()
    }
}

impl FromIterator<EntitySnapshot> for SnapshotIndex {
    fn from_iter<I: IntoIterator<Item = EntitySnapshot>>(iter: I) -> Self {
        let index = Self::new();
        for snapshot in iter {
            index.upsert(snapshot);
        }
        index
    }
}

impl EntityLookup for SnapshotIndex {
    fn find(&self, type_name: &str, id: &EntityId) -> anyhow::Result<Option<EntitySnapshot>> {
        Ok(self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(type_name.to_string(), id.clone()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_and_remove_forgets() {
        let index = SnapshotIndex::from([EntitySnapshot::new("Listing", 7)]);
        index.upsert(EntitySnapshot::new("Listing", 7).with_attribute("name", "Listing 2"));
        assert_eq!(index.len(), 1);

        let found = index.find("Listing", &EntityId::Int(7)).unwrap().unwrap();
        assert_eq!(found.attributes["name"], "Listing 2");

        assert!(index.remove("Listing", &EntityId::Int(7)).is_some());
        assert!(index.find("Listing", &EntityId::Int(7)).unwrap().is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn keys_include_type() {
        let index = SnapshotIndex::from([EntitySnapshot::new("Location", 1)]);
        assert!(index.find("Listing", &EntityId::Int(1)).unwrap().is_none());
    }
}
