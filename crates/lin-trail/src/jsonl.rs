//! JSONL trail store.
//!
//! Appends one [`TrailEntry`] per line to `{dir}/{scope}.jsonl`, where
//! `scope` is the record's snake_case type name. Uses
//! `serde_jsonlines::append_json_lines` for per-line appends. Scope queries
//! scan every trail file and filter by association-chain prefix.

use std::path::{Path, PathBuf};

use lin_core::entities::{AssociationChain, HistoryRecord};
use lin_core::trail::{TRAIL_VERSION, TrailEntry};
use lin_track::traits::{PersistenceSink, ScopeQuery};

use crate::error::StoreError;
use crate::schema::{SchemaRegistry, TRAIL_ENTRY};

pub struct JsonlStore {
    dir: PathBuf,
    schema: Option<SchemaRegistry>,
}

impl JsonlStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir, schema: None })
    }

    /// Validate every entry against its JSON Schema before appending.
    /// Validation is warn-only.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::SchemaCompile` if the schemas fail to compile.
    pub fn with_validation(mut self) -> Result<Self, StoreError> {
        self.schema = Some(SchemaRegistry::new()?);
        Ok(self)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, scope: &str) -> PathBuf {
        self.dir.join(format!("{scope}.jsonl"))
    }

    /// Append `record` to its scope's trail file.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the write fails. Schema validation
    /// failures are logged but do not prevent writing.
    pub fn append(&self, record: &HistoryRecord) -> Result<TrailEntry, StoreError> {
        let entry = TrailEntry::new(record.clone());

        if let Some(schema) = &self.schema {
            let value = serde_json::to_value(&entry).map_err(anyhow::Error::from)?;
            if let Err(e) = schema.validate(TRAIL_ENTRY, &value) {
                tracing::warn!(
                    type_name = %record.trackable_type_name,
                    chain = %record.association_chain,
                    error = %e,
                    "trail entry failed schema validation"
                );
            }
        }

        let path = self.path_for(&record.scope());
        serde_jsonlines::append_json_lines(&path, [&entry])?;
        Ok(entry)
    }

    /// Every entry in the store, ordered by timestamp.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` on read or parse failure, and
    /// `StoreError::UnsupportedVersion` for entries newer than this build
    /// understands.
    pub fn read_all(&self) -> Result<Vec<TrailEntry>, StoreError> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<_, _>>()?;
        paths.retain(|p| p.extension().and_then(|e| e.to_str()) == Some("jsonl"));
        paths.sort();

        let mut entries = Vec::new();
        for path in paths {
            for entry in serde_jsonlines::json_lines::<TrailEntry, _>(&path)? {
                let entry = entry?;
                if entry.v > TRAIL_VERSION {
                    return Err(StoreError::UnsupportedVersion {
                        version: entry.v,
                        path,
                    });
                }
                entries.push(entry);
            }
        }

        entries.sort_by_key(|entry| entry.ts);
        Ok(entries)
    }

    /// Records whose chain starts with `prefix`, oldest first.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read_all`].
    pub fn query(&self, prefix: &AssociationChain) -> Result<Vec<HistoryRecord>, StoreError> {
        Ok(self
            .read_all()?
            .into_iter()
            .map(|entry| entry.record)
            .filter(|record| record.association_chain.starts_with(prefix))
            .collect())
    }
}

impl PersistenceSink for JsonlStore {
    fn persist(&self, record: &HistoryRecord) -> anyhow::Result<()> {
        self.append(record)?;
        Ok(())
    }
}

impl ScopeQuery for JsonlStore {
    fn query_scope(&self, prefix: &AssociationChain) -> anyhow::Result<Vec<HistoryRecord>> {
        Ok(self.query(prefix)?)
    }
}
