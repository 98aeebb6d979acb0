use lin_config::{InverseFallback, TrackerConfig};
use lin_core::enums::Action;
use lin_track::policy::PolicyRegistry;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::output::output;

#[derive(Debug, Serialize)]
pub struct PolicyReport {
    pub max_chain_depth: usize,
    pub inverse_fallback: InverseFallback,
    pub types: Vec<TypeReport>,
}

#[derive(Debug, Serialize)]
pub struct TypeReport {
    pub type_name: String,
    pub actions: Vec<Action>,
    /// Tracked fields per action; absent when the type declares no field list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracked: Option<Vec<ActionFields>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActionFields {
    pub action: Action,
    pub fields: Vec<String>,
}

/// Handle `lineage check-config`. Loading already validated the
/// configuration; this compiles the policy and reports it.
pub fn handle(config: &TrackerConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = report(config)?;
    output(&report, flags.format)
}

pub fn report(config: &TrackerConfig) -> anyhow::Result<PolicyReport> {
    let registry = PolicyRegistry::from_config(config)?;

    let types = registry
        .type_names()
        .into_iter()
        .filter_map(|name| registry.get(name).map(|policy| (name, policy)))
        .map(|(name, policy)| {
            let actions: Vec<Action> = Action::ALL
                .into_iter()
                .filter(|action| policy.fields.tracks_action(*action))
                .collect();

            let tracked = actions
                .iter()
                .map(|action| {
                    policy.fields.tracked_fields(*action).map(|fields| ActionFields {
                        action: *action,
                        fields: fields.into_iter().map(str::to_string).collect(),
                    })
                })
                .collect::<Option<Vec<_>>>();

            let parent = policy.parent.as_ref().map(|parent| match &parent.inverse_of {
                Some(relation) => format!("{} ({relation})", parent.type_name),
                None => parent.type_name.clone(),
            });

            TypeReport {
                type_name: name.to_string(),
                actions,
                tracked,
                parent,
            }
        })
        .collect();

    Ok(PolicyReport {
        max_chain_depth: config.general.max_chain_depth,
        inverse_fallback: config.general.inverse_fallback,
        types,
    })
}

#[cfg(test)]
mod tests {
    use lin_config::{ParentConfig, TypeConfig};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn reports_tracked_fields_per_action() {
        let mut config = TrackerConfig::default();
        config.types.insert("Location".into(), TypeConfig::default());
        config.types.insert(
            "Listing".into(),
            TypeConfig {
                fields: Some(vec!["id".into(), "name".into(), "location_id".into()]),
                excluded_fields: vec!["location_id".into()],
                on: vec![Action::Create, Action::Update],
                parent: Some(ParentConfig {
                    type_name: "Location".into(),
                    inverse_of: Some("listings".into()),
                }),
                ..TypeConfig::default()
            },
        );

        let report = serde_json::to_value(report(&config).unwrap()).unwrap();

        assert_eq!(
            report,
            json!({
                "max_chain_depth": 16,
                "inverse_fallback": "error",
                "types": [
                    {
                        "type_name": "Listing",
                        "actions": ["create", "update"],
                        "tracked": [
                            {"action": "create", "fields": ["id", "name"]},
                            {"action": "update", "fields": ["id", "name"]}
                        ],
                        "parent": "Location (listings)"
                    },
                    {
                        "type_name": "Location",
                        "actions": ["create", "update", "destroy"]
                    }
                ]
            })
        );
    }
}
