//! Shared test fixtures for lin-track unit tests.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use lin_config::{ParentConfig, TrackerConfig, TypeConfig};
use lin_core::entities::{AssociationChain, HistoryRecord};

use crate::traits::{PersistenceSink, ScopeQuery};

fn owned_by(type_name: &str, inverse_of: &str) -> Option<ParentConfig> {
    Some(ParentConfig {
        type_name: type_name.into(),
        inverse_of: Some(inverse_of.into()),
    })
}

/// `Location -> listings -> Listing -> photos -> Photo`, plus a
/// self-owning `Category` tree.
pub fn hierarchy_config() -> TrackerConfig {
    let mut config = TrackerConfig::default();
    config.types.insert(
        "Location".into(),
        TypeConfig {
            relations: BTreeMap::from([("listings".into(), "Listing".into())]),
            ..TypeConfig::default()
        },
    );
    config.types.insert(
        "Listing".into(),
        TypeConfig {
            parent: owned_by("Location", "listings"),
            relations: BTreeMap::from([("photos".into(), "Photo".into())]),
            ..TypeConfig::default()
        },
    );
    config.types.insert(
        "Photo".into(),
        TypeConfig {
            parent: owned_by("Listing", "photos"),
            ..TypeConfig::default()
        },
    );
    config.types.insert(
        "Category".into(),
        TypeConfig {
            parent: owned_by("Category", "children"),
            relations: BTreeMap::from([("children".into(), "Category".into())]),
            ..TypeConfig::default()
        },
    );
    config
}

/// Sink that keeps every persisted record.
#[derive(Debug, Default)]
pub struct RecordingSink {
    records: Mutex<Vec<HistoryRecord>>,
}

impl RecordingSink {
    pub fn records(&self) -> Vec<HistoryRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl PersistenceSink for RecordingSink {
    fn persist(&self, record: &HistoryRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }
}

/// Sink that rejects everything.
#[derive(Debug, Default)]
pub struct FailingSink;

impl PersistenceSink for FailingSink {
    fn persist(&self, _record: &HistoryRecord) -> anyhow::Result<()> {
        anyhow::bail!("store unavailable")
    }
}

impl ScopeQuery for RecordingSink {
    fn query_scope(&self, prefix: &AssociationChain) -> anyhow::Result<Vec<HistoryRecord>> {
        Ok(self
            .records()
            .into_iter()
            .filter(|r| r.association_chain.starts_with(prefix))
            .collect())
    }
}
