//! Per-field changesets and their original/modified projection.
//!
//! A changeset maps a field name to its `[before, after]` pair. Absence is
//! explicit: `None` means the field had no value on that side of the
//! mutation. A JSON `null` is normalized to `None` on construction and on
//! deserialization, so "nil" has exactly one representation.

use std::borrow::Cow;
use std::collections::BTreeMap;

use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field name to value, used for `original`, `modified` and entity attributes.
pub type FieldMap = BTreeMap<String, Value>;

/// Field name to its transition.
pub type ChangeSet = BTreeMap<String, ChangeEntry>;

type Pair = (Option<Value>, Option<Value>);

/// One attribute's transition.
///
/// Serialized as a two-element array `[before, after]` with `null` for an
/// absent side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Pair", into = "Pair")]
pub struct ChangeEntry {
    pub before: Option<Value>,
    pub after: Option<Value>,
}

impl ChangeEntry {
    #[must_use]
    pub fn new(before: Option<Value>, after: Option<Value>) -> Self {
        Self {
            before: before.filter(|v| !v.is_null()),
            after: after.filter(|v| !v.is_null()),
        }
    }

    /// A field appearing with a value, as on create.
    #[must_use]
    pub fn appeared(after: Value) -> Self {
        Self::new(None, Some(after))
    }

    /// A field disappearing, as on destroy.
    #[must_use]
    pub fn vanished(before: Value) -> Self {
        Self::new(Some(before), None)
    }

    #[must_use]
    pub fn changed(before: Value, after: Value) -> Self {
        Self::new(Some(before), Some(after))
    }

    /// `true` when both sides are equal, including both absent.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

impl From<Pair> for ChangeEntry {
    fn from((before, after): Pair) -> Self {
        Self::new(before, after)
    }
}

impl From<ChangeEntry> for Pair {
    fn from(entry: ChangeEntry) -> Self {
        (entry.before, entry.after)
    }
}

impl JsonSchema for ChangeEntry {
    fn schema_name() -> Cow<'static, str> {
        "ChangeEntry".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <Pair>::json_schema(generator)
    }
}

/// Split a changeset into its `original` and `modified` projections.
///
/// A field lands in `original` only if it had a before-value and in
/// `modified` only if it has an after-value. A nil-to-value transition
/// therefore shows up only in `modified`, a value-to-nil transition only in
/// `original`.
#[must_use]
pub fn transform(changes: &ChangeSet) -> (FieldMap, FieldMap) {
    let mut original = FieldMap::new();
    let mut modified = FieldMap::new();

    for (field, entry) in changes {
        if let Some(before) = &entry.before {
            original.insert(field.clone(), before.clone());
        }
        if let Some(after) = &entry.after {
            modified.insert(field.clone(), after.clone());
        }
    }

    (original, modified)
}

/// Rebuild per-field transitions from the two projections.
///
/// Inverse of [`transform`] for the given field names; a field missing from
/// a projection comes back as `None` on that side.
#[must_use]
pub fn reconstruct<'a>(
    original: &FieldMap,
    modified: &FieldMap,
    fields: impl IntoIterator<Item = &'a str>,
) -> ChangeSet {
    fields
        .into_iter()
        .map(|field| {
            (
                field.to_string(),
                ChangeEntry::new(original.get(field).cloned(), modified.get(field).cloned()),
            )
        })
        .collect()
}

/// Changes implied by an attribute snapshot for `Create`: every attribute
/// goes from nil to its current value.
#[must_use]
pub fn appeared_from(attributes: &FieldMap) -> ChangeSet {
    attributes
        .iter()
        .map(|(field, value)| (field.clone(), ChangeEntry::appeared(value.clone())))
        .collect()
}

/// Changes implied by an attribute snapshot for `Destroy`: every attribute
/// goes from its last value to nil.
#[must_use]
pub fn vanished_from(attributes: &FieldMap) -> ChangeSet {
    attributes
        .iter()
        .map(|(field, value)| (field.clone(), ChangeEntry::vanished(value.clone())))
        .collect()
}
