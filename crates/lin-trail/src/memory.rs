//! In-process history store.

use std::sync::{Mutex, PoisonError};

use lin_core::entities::{AssociationChain, HistoryRecord};
use lin_track::traits::{PersistenceSink, ScopeQuery};

/// Keeps records in insertion order. Suitable for tests and short-lived
/// replays.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<HistoryRecord>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record.
    #[must_use]
    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records whose chain starts with `prefix`, oldest first.
    #[must_use]
    pub fn query(&self, prefix: &AssociationChain) -> Vec<HistoryRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|record| record.association_chain.starts_with(prefix))
            .cloned()
            .collect()
    }
}

impl PersistenceSink for MemoryStore {
    fn persist(&self, record: &HistoryRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

impl ScopeQuery for MemoryStore {
    fn query_scope(&self, prefix: &AssociationChain) -> anyhow::Result<Vec<HistoryRecord>> {
        Ok(self.query(prefix))
    }
}
