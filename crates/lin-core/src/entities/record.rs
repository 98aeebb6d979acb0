use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::changeset::{ChangeSet, FieldMap};
use crate::entities::{ActorIdentity, AssociationChain};
use crate::enums::Action;

/// The audit unit produced for one mutation.
///
/// Built fresh per mutation event and never mutated afterward. Persistence
/// layers must store it field for field.
///
/// - `Create`: `original` is empty.
/// - `Update`: `changeset` is never empty.
/// - `Destroy`: `modified` and `changeset` are empty, `original` holds the
///   pre-destruction snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HistoryRecord {
    pub association_chain: AssociationChain,
    pub trackable_type_name: String,
    pub actor: ActorIdentity,
    pub action: Action,
    #[serde(default)]
    pub original: FieldMap,
    #[serde(default)]
    pub modified: FieldMap,
    #[serde(default)]
    pub changeset: ChangeSet,
}

impl HistoryRecord {
    /// Lower snake-case type name, e.g. `ListingPhoto` -> `listing_photo`.
    #[must_use]
    pub fn scope(&self) -> String {
        snake_case(&self.trackable_type_name)
    }
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
            prev_lower = false;
        } else if ch == ':' {
            if !out.ends_with('_') && !out.is_empty() {
                out.push('_');
            }
            prev_lower = false;
        } else {
            out.push(ch);
            prev_lower = ch.is_ascii_lowercase() || ch.is_ascii_digit();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(type_name: &str) -> HistoryRecord {
        HistoryRecord {
            association_chain: AssociationChain::new(),
            trackable_type_name: type_name.to_string(),
            actor: ActorIdentity::system(),
            action: Action::Create,
            original: FieldMap::new(),
            modified: FieldMap::new(),
            changeset: ChangeSet::new(),
        }
    }

    #[test]
    fn scope_is_snake_case_type_name() {
        assert_eq!(record("Listing").scope(), "listing");
        assert_eq!(record("ListingOnCreate").scope(), "listing_on_create");
        assert_eq!(record("Shop::Item").scope(), "shop_item");
    }

    #[test]
    fn missing_maps_default_to_empty() {
        let json = r#"{"association_chain":[{"name":"Listing","id":7}],"trackable_type_name":"Listing","actor":{"modifier_id":1},"action":"destroy","original":{"id":7}}"#;
        let rec: HistoryRecord = serde_json::from_str(json).unwrap();
        assert!(rec.modified.is_empty());
        assert!(rec.changeset.is_empty());
        assert_eq!(rec.original["id"], 7);
    }
}
