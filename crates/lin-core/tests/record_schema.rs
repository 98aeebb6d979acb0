//! Schema validation for persisted types, and changeset projection laws.

use chrono::Utc;
use lin_core::changeset::{self, ChangeEntry, ChangeSet, FieldMap};
use lin_core::entities::*;
use lin_core::enums::Action;
use lin_core::trail::TrailEntry;
use pretty_assertions::assert_eq;
use schemars::schema_for;
use serde_json::{Value, json};

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn update_record() -> HistoryRecord {
    let changes = ChangeSet::from([
        (
            "name".to_string(),
            ChangeEntry::changed(json!("Listing 1"), json!("Listing 2")),
        ),
        ("description".to_string(), ChangeEntry::vanished(json!("Old"))),
    ]);
    let (original, modified) = changeset::transform(&changes);
    HistoryRecord {
        association_chain: vec![
            AssociationChainEntry::new("Location", 1),
            AssociationChainEntry::new("listings", 7),
        ]
        .into(),
        trackable_type_name: "Listing".into(),
        actor: ActorIdentity::External("usr_2abc".into()),
        action: Action::Update,
        original,
        modified,
        changeset: changes,
    }
}

#[test]
fn history_record_matches_its_schema() {
    let record = update_record();
    let schema = serde_json::to_value(schema_for!(HistoryRecord)).unwrap();
    let instance = serde_json::to_value(&record).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "schema validation failed: {errors:?}");

    let recovered: HistoryRecord = serde_json::from_value(instance).unwrap();
    assert_eq!(recovered, record);
}

#[test]
fn trail_entry_matches_its_schema() {
    let entry = TrailEntry {
        v: 1,
        ts: Utc::now(),
        record: update_record(),
    };
    let schema = serde_json::to_value(schema_for!(TrailEntry)).unwrap();
    let instance = serde_json::to_value(&entry).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "schema validation failed: {errors:?}");
}

#[test]
fn schema_rejects_unknown_action() {
    let schema = serde_json::to_value(schema_for!(HistoryRecord)).unwrap();
    let mut instance = serde_json::to_value(update_record()).unwrap();
    instance["action"] = json!("upsert");
    assert!(!validate_against_schema(&schema, &instance).is_empty());
}

#[test]
fn record_wire_shape() {
    let value = serde_json::to_value(update_record()).unwrap();
    assert_eq!(
        value,
        json!({
            "association_chain": [
                {"name": "Location", "id": 1},
                {"name": "listings", "id": 7}
            ],
            "trackable_type_name": "Listing",
            "actor": {"modifier_id": 0, "modifier_external_id": "usr_2abc"},
            "action": "update",
            "original": {"description": "Old", "name": "Listing 1"},
            "modified": {"name": "Listing 2"},
            "changeset": {
                "description": ["Old", null],
                "name": ["Listing 1", "Listing 2"]
            }
        })
    );
}

#[test]
fn external_actor_persists_sentinel_numeric_id() {
    let entry = TrailEntry::new(update_record());
    let instance = serde_json::to_value(&entry).unwrap();

    assert_eq!(instance["record"]["actor"]["modifier_id"], json!(0));
    assert_eq!(
        instance["record"]["actor"]["modifier_external_id"],
        json!("usr_2abc")
    );

    let schema = serde_json::to_value(schema_for!(TrailEntry)).unwrap();
    let mut missing_id = instance.clone();
    missing_id["record"]["actor"] = json!({"modifier_external_id": "usr_2abc"});
    assert!(!validate_against_schema(&schema, &missing_id).is_empty());

    let recovered: TrailEntry = serde_json::from_value(instance).unwrap();
    assert_eq!(
        recovered.record.actor,
        ActorIdentity::External("usr_2abc".into())
    );
}

#[test]
fn projections_never_contain_nil_to_nil_fields() {
    let samples: Vec<(Value, Value)> = vec![
        (Value::Null, Value::Null),
        (Value::Null, json!(1)),
        (json!("a"), Value::Null),
        (json!(true), json!(false)),
        (json!({"k": 1}), json!([1, 2])),
    ];

    let set: ChangeSet = samples
        .iter()
        .enumerate()
        .map(|(i, (b, a))| {
            (
                format!("f{i}"),
                ChangeEntry::new(Some(b.clone()), Some(a.clone())),
            )
        })
        .collect();

    let (original, modified) = changeset::transform(&set);
    assert!(!original.contains_key("f0"));
    assert!(!modified.contains_key("f0"));

    let rebuilt = changeset::reconstruct(&original, &modified, set.keys().map(String::as_str));
    assert_eq!(rebuilt, set);
}

#[test]
fn snapshot_projections() {
    let attrs = FieldMap::from([
        ("id".to_string(), json!(7)),
        ("name".to_string(), json!("Listing 1")),
    ]);

    let (original, modified) = changeset::transform(&changeset::appeared_from(&attrs));
    assert!(original.is_empty());
    assert_eq!(modified, attrs);

    let (original, modified) = changeset::transform(&changeset::vanished_from(&attrs));
    assert_eq!(original, attrs);
    assert!(modified.is_empty());
}
