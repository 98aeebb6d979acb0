//! Field tracking policy.
//!
//! Compiled once from a validated [`TrackerConfig`]: each tracked type gets a
//! [`FieldPolicy`] (which fields count, under which actions) and its owner
//! declaration. Evaluation is pure and allocation-free per field.

use std::collections::{HashMap, HashSet};

use lin_config::{ConfigError, ParentConfig, TrackerConfig, TypeConfig};
use lin_core::changeset::ChangeSet;
use lin_core::enums::Action;

/// Which fields of one type are eligible for tracking, per action.
#[derive(Debug, Clone)]
pub struct FieldPolicy {
    declared: Option<Vec<String>>,
    allow: Option<HashSet<String>>,
    deny: HashSet<String>,
    actions: HashSet<Action>,
}

impl FieldPolicy {
    #[must_use]
    pub fn from_config(config: &TypeConfig) -> Self {
        Self {
            declared: config.fields.clone(),
            allow: config
                .tracked_fields
                .as_ref()
                .map(|fields| fields.iter().cloned().collect()),
            deny: config.excluded_fields.iter().cloned().collect(),
            actions: config.on.iter().copied().collect(),
        }
    }

    /// Whether `action` produces history at all for this type.
    #[must_use]
    pub fn tracks_action(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    /// Field eligibility regardless of action: declared (if the type declares
    /// a field list), allow-listed (if an allow-list is set), and not excluded.
    #[must_use]
    pub fn tracks_field(&self, field: &str) -> bool {
        self.declared
            .as_ref()
            .is_none_or(|declared| declared.iter().any(|f| f == field))
            && self.allow.as_ref().is_none_or(|allow| allow.contains(field))
            && !self.deny.contains(field)
    }

    /// A field is tracked under `action` when the action is in scope and the
    /// field itself is eligible.
    #[must_use]
    pub fn is_tracked(&self, field: &str, action: Action) -> bool {
        self.tracks_action(action) && self.tracks_field(field)
    }

    /// Keep tracked fields whose before and after differ. Empty when
    /// `action` is out of scope.
    #[must_use]
    pub fn filter(&self, changes: &ChangeSet, action: Action) -> ChangeSet {
        if !self.tracks_action(action) {
            return ChangeSet::new();
        }
        self.filter_fields(changes)
    }

    /// Keep eligible fields whose before and after differ, ignoring action
    /// scopes.
    #[must_use]
    pub fn filter_fields(&self, changes: &ChangeSet) -> ChangeSet {
        changes
            .iter()
            .filter(|(field, entry)| self.tracks_field(field) && !entry.is_noop())
            .map(|(field, entry)| (field.clone(), entry.clone()))
            .collect()
    }

    /// The resolved tracked-field set for `action`, when the type declares its
    /// fields. `None` means the set is open-ended.
    #[must_use]
    pub fn tracked_fields(&self, action: Action) -> Option<Vec<&str>> {
        self.declared.as_ref().map(|declared| {
            declared
                .iter()
                .map(String::as_str)
                .filter(|field| self.is_tracked(field, action))
                .collect()
        })
    }
}

/// Tracking declaration for one type, ready for evaluation.
#[derive(Debug, Clone)]
pub struct TypePolicy {
    pub fields: FieldPolicy,
    pub parent: Option<ParentConfig>,
}

/// All tracked types, keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    types: HashMap<String, TypePolicy>,
}

impl PolicyRegistry {
    /// Validate `config` and compile every type declaration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the configuration fails validation.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let types = config
            .types
            .iter()
            .map(|(name, ty)| {
                (
                    name.clone(),
                    TypePolicy {
                        fields: FieldPolicy::from_config(ty),
                        parent: ty.parent.clone(),
                    },
                )
            })
            .collect();
        Ok(Self { types })
    }

    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypePolicy> {
        self.types.get(type_name)
    }

    #[must_use]
    pub fn is_tracked_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Owner declaration for `type_name`, if any.
    #[must_use]
    pub fn parent_of(&self, type_name: &str) -> Option<&ParentConfig> {
        self.types.get(type_name).and_then(|ty| ty.parent.as_ref())
    }

    /// Tracked type names, sorted.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
