//! # lin-config
//!
//! Layered configuration loading for Lineage using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`LINEAGE_*` prefix, `__` as separator)
//! 2. An explicit file passed by the caller (e.g. `lineage --config`)
//! 3. Project-level `.lineage/config.toml`
//! 4. User-level `~/.config/lineage/config.toml`
//! 5. Built-in defaults
//!
//! Every load path validates the tracked-type declarations before returning,
//! so a malformed policy never reaches mutation time.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `LINEAGE_GENERAL__MAX_CHAIN_DEPTH` -> `general.max_chain_depth`.
//! Env keys are lower-cased, so per-type sections (`[types.Listing]`) are
//! configured through TOML only.
//!
//! # Usage
//!
//! ```no_run
//! use lin_config::TrackerConfig;
//!
//! let config = TrackerConfig::load_with_dotenv().expect("config");
//! for (name, ty) in &config.types {
//!     println!("{name}: {:?}", ty.on);
//! }
//! ```

mod error;
mod general;
mod types;

pub use error::{ConfigError, PolicyConfigurationError};
pub use general::{GeneralConfig, InverseFallback, MAX_CHAIN_DEPTH_LIMIT};
pub use types::{ParentConfig, TypeConfig};

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    /// Tracked types keyed by type name.
    #[serde(default)]
    pub types: BTreeMap<String, TypeConfig>,
}

impl TrackerConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration with `.env` file support.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load with an optional explicit config file layered above the
    /// project-local one.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_with(explicit).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain without an explicit file.
    pub fn figment() -> Figment {
        Self::figment_with(None)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add additional
    /// providers on top.
    pub fn figment_with(explicit: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".lineage/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit file
        if let Some(path) = explicit {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("LINEAGE_").split("__"))
    }

    /// Check engine settings and every tracked-type declaration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let depth = self.general.max_chain_depth;
        if depth == 0 || depth > MAX_CHAIN_DEPTH_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "general.max_chain_depth".into(),
                reason: format!("must be between 1 and {MAX_CHAIN_DEPTH_LIMIT}, got {depth}"),
            });
        }

        for (name, ty) in &self.types {
            self.validate_type(name, ty)?;
        }
        Ok(())
    }

    /// Declaration for `type_name`, if the type is tracked.
    #[must_use]
    pub fn type_config(&self, type_name: &str) -> Option<&TypeConfig> {
        self.types.get(type_name)
    }

    fn validate_type(&self, name: &str, ty: &TypeConfig) -> Result<(), PolicyConfigurationError> {
        if ty.on.is_empty() {
            return Err(PolicyConfigurationError::EmptyActionScope {
                type_name: name.to_string(),
            });
        }
        check_unique(name, "on", ty.on.iter().map(|a| a.as_str()))?;

        if let Some(fields) = &ty.fields {
            check_unique(name, "fields", fields.iter().map(String::as_str))?;
        }
        if let Some(tracked) = &ty.tracked_fields {
            check_unique(name, "tracked_fields", tracked.iter().map(String::as_str))?;
            check_declared(name, "tracked_fields", tracked, ty.fields.as_deref())?;
        }
        check_unique(name, "excluded_fields", ty.excluded_fields.iter().map(String::as_str))?;
        check_declared(name, "excluded_fields", &ty.excluded_fields, ty.fields.as_deref())?;

        if let Some(tracked) = &ty.tracked_fields {
            if let Some(field) = ty.excluded_fields.iter().find(|f| tracked.contains(f)) {
                return Err(PolicyConfigurationError::ConflictingField {
                    type_name: name.to_string(),
                    field: field.clone(),
                });
            }
        }

        if let Some(parent) = &ty.parent {
            if !self.types.contains_key(&parent.type_name) {
                return Err(PolicyConfigurationError::UnknownParentType {
                    type_name: name.to_string(),
                    parent_type: parent.type_name.clone(),
                });
            }
        }

        for (relation, target) in &ty.relations {
            if !self.types.contains_key(target) {
                return Err(PolicyConfigurationError::UnknownRelationTarget {
                    type_name: name.to_string(),
                    relation: relation.clone(),
                    target: target.clone(),
                });
            }
        }

        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lineage").join("config.toml"))
    }
}

fn check_unique<'a>(
    type_name: &str,
    list: &'static str,
    values: impl Iterator<Item = &'a str>,
) -> Result<(), PolicyConfigurationError> {
    let mut seen = HashSet::new();
    for value in values {
        if !seen.insert(value) {
            return Err(PolicyConfigurationError::DuplicateEntry {
                type_name: type_name.to_string(),
                list,
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

fn check_declared(
    type_name: &str,
    list: &'static str,
    entries: &[String],
    declared: Option<&[String]>,
) -> Result<(), PolicyConfigurationError> {
    let Some(declared) = declared else {
        return Ok(());
    };
    match entries.iter().find(|f| !declared.contains(f)) {
        Some(field) => Err(PolicyConfigurationError::UndeclaredField {
            type_name: type_name.to_string(),
            list,
            field: field.clone(),
        }),
        None => Ok(()),
    }
}
