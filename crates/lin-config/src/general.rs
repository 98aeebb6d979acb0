//! Engine-wide settings.

use serde::{Deserialize, Serialize};

/// Upper bound accepted for `max_chain_depth`.
pub const MAX_CHAIN_DEPTH_LIMIT: usize = 256;

/// Default recursion cap for association-chain resolution.
const fn default_max_chain_depth() -> usize {
    16
}

/// How to name a non-root chain entry whose inverse relation cannot be
/// confirmed against relation metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InverseFallback {
    /// Fail chain resolution.
    #[default]
    Error,
    /// Use the entity's own type name, as the root does.
    TypeName,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Maximum number of ancestors walked before resolution fails.
    #[serde(default = "default_max_chain_depth")]
    pub max_chain_depth: usize,

    #[serde(default)]
    pub inverse_fallback: InverseFallback,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            max_chain_depth: default_max_chain_depth(),
            inverse_fallback: InverseFallback::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = GeneralConfig::default();
        assert_eq!(config.max_chain_depth, 16);
        assert_eq!(config.inverse_fallback, InverseFallback::Error);
    }
}
