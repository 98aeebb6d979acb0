//! History record assembly.
//!
//! Combines the field policy, chain resolver, changeset projection and actor
//! resolution into one [`HistoryRecord`]. Nothing is cached between calls:
//! every build starts from the snapshot and changes it is given.

use lin_core::changeset::{self, ChangeSet, FieldMap};
use lin_core::entities::{ActorIdentity, EntitySnapshot, HistoryRecord};
use lin_core::enums::Action;
use serde_json::Value;

use crate::chain::ChainResolver;
use crate::error::TrackError;
use crate::policy::{PolicyRegistry, TypePolicy};

/// Whether a manual write honors the update no-op rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// An update with no net change produces no record.
    #[default]
    Suppress,
    /// Always produce a record.
    Force,
}

pub struct HistoryRecordBuilder<'a> {
    registry: &'a PolicyRegistry,
    resolver: ChainResolver<'a>,
}

impl<'a> HistoryRecordBuilder<'a> {
    #[must_use]
    pub const fn new(registry: &'a PolicyRegistry, resolver: ChainResolver<'a>) -> Self {
        Self { registry, resolver }
    }

    /// Build the record for a host mutation.
    ///
    /// An action outside the type's `on` scope produces no record. Create and
    /// destroy start from the attribute snapshot (`[nil, value]`
    /// and `[value, nil]` respectively) overlaid with `raw`; update uses `raw`
    /// alone. The result is narrowed to tracked fields whose before and after
    /// differ. An update left with nothing returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns `TrackError::UntrackedType` for an unconfigured type, or a
    /// chain resolution error.
    pub fn build(
        &self,
        entity: &EntitySnapshot,
        action: Action,
        raw: &ChangeSet,
        actor: Option<&Value>,
    ) -> Result<Option<HistoryRecord>, TrackError> {
        let policy = self.policy(entity)?;

        if !policy.fields.tracks_action(action) {
            tracing::debug!(
                type_name = %entity.type_name,
                action = %action,
                "action not in tracking scope; no record"
            );
            return Ok(None);
        }

        let candidates = match action {
            Action::Create => overlay(changeset::appeared_from(&entity.attributes), raw),
            Action::Update => raw.clone(),
            Action::Destroy => overlay(changeset::vanished_from(&entity.attributes), raw),
        };
        let changes = policy.fields.filter_fields(&candidates);

        if action == Action::Update && changes.is_empty() {
            tracing::debug!(
                type_name = %entity.type_name,
                id = %entity.id,
                "update has no tracked changes; no record"
            );
            return Ok(None);
        }

        self.assemble(entity, action, changes, actor).map(Some)
    }

    /// Build an out-of-band record from caller-supplied changes.
    ///
    /// Action scopes do not apply. Changes are taken verbatim for create and
    /// update. Destroy ignores them and records the eligible attribute
    /// snapshot instead. Unless
    /// `mode` is [`WriteMode::Force`], an update whose entries are all
    /// unchanged produces no record.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build`].
    pub fn write(
        &self,
        entity: &EntitySnapshot,
        action: Action,
        changes: ChangeSet,
        actor: Option<&Value>,
        mode: WriteMode,
    ) -> Result<Option<HistoryRecord>, TrackError> {
        let policy = self.policy(entity)?;

        let changes = match action {
            Action::Destroy => policy
                .fields
                .filter_fields(&changeset::vanished_from(&entity.attributes)),
            Action::Create | Action::Update => changes,
        };

        if action == Action::Update
            && mode == WriteMode::Suppress
            && changes.values().all(changeset::ChangeEntry::is_noop)
        {
            tracing::debug!(
                type_name = %entity.type_name,
                id = %entity.id,
                "manual update has no net change; no record"
            );
            return Ok(None);
        }

        self.assemble(entity, action, changes, actor).map(Some)
    }

    fn policy(&self, entity: &EntitySnapshot) -> Result<&'a TypePolicy, TrackError> {
        self.registry
            .get(&entity.type_name)
            .ok_or_else(|| TrackError::UntrackedType(entity.type_name.clone()))
    }

    fn assemble(
        &self,
        entity: &EntitySnapshot,
        action: Action,
        changes: ChangeSet,
        actor: Option<&Value>,
    ) -> Result<HistoryRecord, TrackError> {
        let association_chain = self.resolver.resolve(entity)?;
        let (original, modified) = changeset::transform(&changes);

        let (original, modified, changeset) = match action {
            Action::Create => (FieldMap::new(), modified, changes),
            Action::Update => (original, modified, changes),
            Action::Destroy => (original, FieldMap::new(), ChangeSet::new()),
        };

        Ok(HistoryRecord {
            association_chain,
            trackable_type_name: entity.type_name.clone(),
            actor: ActorIdentity::resolve(actor),
            action,
            original,
            modified,
            changeset,
        })
    }
}

/// `base` with every entry of `raw` laid over it.
fn overlay(mut base: ChangeSet, raw: &ChangeSet) -> ChangeSet {
    base.extend(raw.iter().map(|(field, entry)| (field.clone(), entry.clone())));
    base
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::SnapshotIndex;
    use crate::test_support::hierarchy_config;
    use crate::traits::RelationMap;
    use lin_config::{InverseFallback, TrackerConfig};
    use lin_core::changeset::ChangeEntry;
    use lin_core::entities::AssociationChainEntry;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Fixture {
        registry: PolicyRegistry,
        lookup: SnapshotIndex,
        relations: RelationMap,
    }

    impl Fixture {
        fn new(config: &TrackerConfig) -> Self {
            Self {
                registry: PolicyRegistry::from_config(config).unwrap(),
                lookup: SnapshotIndex::from([EntitySnapshot::new("Location", 1)]),
                relations: RelationMap::from_config(config),
            }
        }

        fn builder(&self) -> HistoryRecordBuilder<'_> {
            let resolver = ChainResolver::new(
                &self.registry,
                &self.lookup,
                &self.relations,
                16,
                InverseFallback::Error,
            );
            HistoryRecordBuilder::new(&self.registry, resolver)
        }
    }

    fn listing() -> EntitySnapshot {
        EntitySnapshot::new("Listing", 7)
            .with_parent(1)
            .with_attribute("name", "Listing 1")
            .with_attribute("description", "Description 1")
    }

    fn update(name: (&str, &str)) -> ChangeSet {
        ChangeSet::from([(
            "name".to_string(),
            ChangeEntry::changed(json!(name.0), json!(name.1)),
        )])
    }

    #[test]
    fn create_projects_snapshot_into_modified() {
        let fx = Fixture::new(&hierarchy_config());
        let record = fx
            .builder()
            .build(&listing(), Action::Create, &ChangeSet::new(), Some(&json!(3)))
            .unwrap()
            .unwrap();

        assert!(record.original.is_empty());
        assert_eq!(
            record.modified,
            FieldMap::from([
                ("description".to_string(), json!("Description 1")),
                ("name".to_string(), json!("Listing 1")),
            ])
        );
        assert_eq!(record.changeset["name"], ChangeEntry::appeared(json!("Listing 1")));
        assert_eq!(record.actor, ActorIdentity::Numeric(3));
        assert_eq!(
            record.association_chain.entries(),
            &[
                AssociationChainEntry::new("Location", 1),
                AssociationChainEntry::new("listings", 7),
            ]
        );
    }

    #[test]
    fn create_skips_nil_attributes() {
        let fx = Fixture::new(&hierarchy_config());
        let entity = listing().with_attribute("location_id", serde_json::Value::Null);
        let record = fx
            .builder()
            .build(&entity, Action::Create, &ChangeSet::new(), None)
            .unwrap()
            .unwrap();
        assert!(!record.changeset.contains_key("location_id"));
        assert!(!record.modified.contains_key("location_id"));
    }

    #[test]
    fn update_records_changeset() {
        let fx = Fixture::new(&hierarchy_config());
        let record = fx
            .builder()
            .build(&listing(), Action::Update, &update(("Listing 1", "Listing 2")), None)
            .unwrap()
            .unwrap();

        assert_eq!(record.changeset, update(("Listing 1", "Listing 2")));
        assert_eq!(record.original["name"], "Listing 1");
        assert_eq!(record.modified["name"], "Listing 2");
        assert_eq!(record.actor, ActorIdentity::system());
    }

    #[test]
    fn update_without_net_change_is_suppressed() {
        let fx = Fixture::new(&hierarchy_config());
        let outcome = fx
            .builder()
            .build(&listing(), Action::Update, &update(("Listing 1", "Listing 1")), None)
            .unwrap();
        assert!(outcome.is_none());
    }

    #[test]
    fn destroy_records_full_snapshot_in_original() {
        let fx = Fixture::new(&hierarchy_config());
        let entity = EntitySnapshot::new("Listing", 7)
            .with_parent(1)
            .with_attribute("id", 7)
            .with_attribute("name", "Listing 1");

        let record = fx
            .builder()
            .build(&entity, Action::Destroy, &ChangeSet::new(), None)
            .unwrap()
            .unwrap();

        assert_eq!(
            record.original,
            FieldMap::from([
                ("id".to_string(), json!(7)),
                ("name".to_string(), json!("Listing 1")),
            ])
        );
        assert!(record.modified.is_empty());
        assert!(record.changeset.is_empty());
    }

    #[test]
    fn unconfigured_type_is_an_error() {
        let fx = Fixture::new(&hierarchy_config());
        let err = fx
            .builder()
            .build(&EntitySnapshot::new("Invoice", 1), Action::Create, &ChangeSet::new(), None)
            .unwrap_err();
        assert!(matches!(err, TrackError::UntrackedType(ref t) if t == "Invoice"));
    }

    #[test]
    fn manual_write_takes_changes_verbatim() {
        let fx = Fixture::new(&hierarchy_config());
        let changes = ChangeSet::from([
            ("name".to_string(), ChangeEntry::appeared(json!("Listing 2"))),
            ("description".to_string(), ChangeEntry::appeared(json!("Description 2"))),
        ]);

        let record = fx
            .builder()
            .write(&listing(), Action::Create, changes.clone(), None, WriteMode::Suppress)
            .unwrap()
            .unwrap();

        assert!(record.original.is_empty());
        assert_eq!(record.changeset, changes);
        assert_eq!(record.modified["name"], "Listing 2");
    }

    #[test]
    fn manual_update_suppression_can_be_forced() {
        let fx = Fixture::new(&hierarchy_config());
        let same = update(("Listing 1", "Listing 1"));

        let suppressed = fx
            .builder()
            .write(&listing(), Action::Update, same.clone(), None, WriteMode::Suppress)
            .unwrap();
        assert!(suppressed.is_none());

        let forced = fx
            .builder()
            .write(&listing(), Action::Update, same.clone(), None, WriteMode::Force)
            .unwrap()
            .unwrap();
        assert_eq!(forced.changeset, same);
    }

    #[test]
    fn manual_destroy_uses_snapshot() {
        let fx = Fixture::new(&hierarchy_config());
        let record = fx
            .builder()
            .write(
                &listing(),
                Action::Destroy,
                update(("ignored", "entirely")),
                None,
                WriteMode::Suppress,
            )
            .unwrap()
            .unwrap();

        assert_eq!(record.original["name"], "Listing 1");
        assert_eq!(record.original["description"], "Description 1");
        assert!(record.modified.is_empty());
        assert!(record.changeset.is_empty());
    }

    fn create_only() -> TrackerConfig {
        let mut config = hierarchy_config();
        if let Some(listing) = config.types.get_mut("Listing") {
            listing.on = vec![Action::Create];
            listing.excluded_fields = vec!["description".into()];
        }
        config
    }

    #[test]
    fn out_of_scope_actions_build_nothing() {
        let fx = Fixture::new(&create_only());
        let builder = fx.builder();

        let update = builder
            .build(&listing(), Action::Update, &update(("Listing 1", "Listing 2")), None)
            .unwrap();
        let destroy = builder
            .build(&listing(), Action::Destroy, &ChangeSet::new(), None)
            .unwrap();

        assert_eq!(update, None);
        assert_eq!(destroy, None);
        assert!(
            builder
                .build(&listing(), Action::Create, &ChangeSet::new(), None)
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn manual_destroy_ignores_action_scope() {
        let fx = Fixture::new(&create_only());
        let record = fx
            .builder()
            .write(&listing(), Action::Destroy, ChangeSet::new(), None, WriteMode::Suppress)
            .unwrap()
            .unwrap();

        assert_eq!(
            record.original,
            FieldMap::from([("name".to_string(), json!("Listing 1"))])
        );
        assert!(record.modified.is_empty());
    }
}
