//! Mutation dispatch.
//!
//! `HistoryTracker` is the entry point the host calls when a create, update
//! or destroy completes. It gates on the type's declaration, the tracking
//! toggle and the action scope, builds the record, and hands it to the
//! persistence sink. Sink failures propagate; whether they abort the host's
//! mutation is the host's call.

use lin_config::{ConfigError, GeneralConfig, TrackerConfig};
use lin_core::changeset::ChangeSet;
use lin_core::entities::{AssociationChain, EntitySnapshot, HistoryRecord, MutationEvent};
use lin_core::enums::Action;
use serde_json::Value;

use crate::builder::{HistoryRecordBuilder, WriteMode};
use crate::chain::ChainResolver;
use crate::error::TrackError;
use crate::policy::PolicyRegistry;
use crate::toggle::TrackingToggle;
use crate::traits::{EntityLookup, PersistenceSink, RelationMap, RelationMetadata, ScopeQuery};

pub struct HistoryTracker {
    registry: PolicyRegistry,
    general: GeneralConfig,
    lookup: Box<dyn EntityLookup>,
    relations: Box<dyn RelationMetadata>,
    sink: Box<dyn PersistenceSink>,
    toggle: TrackingToggle,
}

impl HistoryTracker {
    /// Create a tracker from configuration, using the configured relation
    /// metadata.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration fails validation.
    pub fn new(
        config: &TrackerConfig,
        lookup: impl EntityLookup + 'static,
        sink: impl PersistenceSink + 'static,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            registry: PolicyRegistry::from_config(config)?,
            general: config.general.clone(),
            lookup: Box::new(lookup),
            relations: Box::new(RelationMap::from_config(config)),
            sink: Box::new(sink),
            toggle: TrackingToggle::new(),
        })
    }

    /// Replace the relation metadata source (e.g. with the host's schema).
    #[must_use]
    pub fn with_relations(mut self, relations: impl RelationMetadata + 'static) -> Self {
        self.relations = Box::new(relations);
        self
    }

    #[must_use]
    pub const fn registry(&self) -> &PolicyRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn toggle(&self) -> &TrackingToggle {
        &self.toggle
    }

    #[must_use]
    pub fn resolver(&self) -> ChainResolver<'_> {
        ChainResolver::new(
            &self.registry,
            self.lookup.as_ref(),
            self.relations.as_ref(),
            self.general.max_chain_depth,
            self.general.inverse_fallback,
        )
    }

    #[must_use]
    pub fn builder(&self) -> HistoryRecordBuilder<'_> {
        HistoryRecordBuilder::new(&self.registry, self.resolver())
    }

    /// Whether a mutation of `type_name` under `action` passes the gate.
    #[must_use]
    pub fn should_track(&self, type_name: &str, action: Action) -> bool {
        self.registry
            .get(type_name)
            .is_some_and(|policy| policy.fields.tracks_action(action))
            && self.toggle.is_enabled(type_name)
    }

    /// Handle a completed host mutation.
    ///
    /// Returns the persisted record, or `None` when the type is not tracked,
    /// tracking is disabled for it, the action is out of scope, or an update
    /// carries no tracked change.
    ///
    /// # Errors
    ///
    /// Returns `TrackError` if chain resolution fails or the sink rejects the
    /// record.
    pub fn on_mutation(&self, event: &MutationEvent) -> Result<Option<HistoryRecord>, TrackError> {
        let entity = &event.entity;
        if !self.should_track(&entity.type_name, event.action) {
            tracing::debug!(
                type_name = %entity.type_name,
                action = %event.action,
                "mutation not tracked"
            );
            return Ok(None);
        }

        let built = self
            .builder()
            .build(entity, event.action, &event.changes, event.actor.as_ref())
            .inspect_err(|error| {
                tracing::warn!(
                    type_name = %entity.type_name,
                    id = %entity.id,
                    action = %event.action,
                    %error,
                    "history record not built"
                );
            })?;

        match built {
            Some(record) => {
                self.persist(&record)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    /// Write an out-of-band record with explicit action and changes.
    ///
    /// Bypasses the toggle and action scopes; the type must still be
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns `TrackError` if the type is untracked, chain resolution fails,
    /// or the sink rejects the record.
    pub fn write_history_record(
        &self,
        entity: &EntitySnapshot,
        action: Action,
        changes: ChangeSet,
        actor: Option<&Value>,
        mode: WriteMode,
    ) -> Result<Option<HistoryRecord>, TrackError> {
        let Some(record) = self.builder().write(entity, action, changes, actor, mode)? else {
            return Ok(None);
        };
        self.persist(&record)?;
        Ok(Some(record))
    }

    /// Run `action` with tracking for `type_name` suspended.
    pub fn without_tracking<T>(&self, type_name: &str, action: impl FnOnce() -> T) -> T {
        self.toggle.with_tracking_suspended(type_name, action)
    }

    /// # Errors
    ///
    /// Returns `TrackError` if chain resolution fails.
    pub fn resolve_chain(&self, entity: &EntitySnapshot) -> Result<AssociationChain, TrackError> {
        self.resolver().resolve(entity)
    }

    /// Records for `entity` and everything it owns, via a prefix query on
    /// its association chain.
    ///
    /// # Errors
    ///
    /// Returns `TrackError` if chain resolution or the query fails.
    pub fn history_for(
        &self,
        entity: &EntitySnapshot,
        store: &dyn ScopeQuery,
    ) -> Result<Vec<HistoryRecord>, TrackError> {
        let chain = self.resolve_chain(entity)?;
        store.query_scope(&chain).map_err(TrackError::Query)
    }

    fn persist(&self, record: &HistoryRecord) -> Result<(), TrackError> {
        self.sink.persist(record).map_err(TrackError::Persistence)?;
        tracing::debug!(
            type_name = %record.trackable_type_name,
            action = %record.action,
            chain = %record.association_chain,
            "history record persisted"
        );
        Ok(())
    }
}
