use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::ids::EntityId;

/// One hop in an ownership hierarchy.
///
/// `name` is the relation name from the owner's side (e.g. `listings`), or
/// the entity's own type name for the hierarchy root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct AssociationChainEntry {
    pub name: String,
    pub id: EntityId,
}

impl AssociationChainEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<EntityId>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for AssociationChainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.id)
    }
}

impl FromStr for AssociationChainEntry {
    type Err = CoreError;

    /// Parse `name=id`, the form used on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((name, id)) if !name.trim().is_empty() && !id.trim().is_empty() => {
                Ok(Self::new(name.trim(), EntityId::parse(id.trim())))
            }
            _ => Err(CoreError::InvalidScope(s.to_string())),
        }
    }
}

/// Ordered path from the hierarchy root (first) to the entity itself (last).
///
/// Records are scoped by prefix: every record whose chain starts with a given
/// chain belongs to that subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AssociationChain(Vec<AssociationChainEntry>);

impl AssociationChain {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, entry: AssociationChainEntry) {
        self.0.push(entry);
    }

    #[must_use]
    pub fn entries(&self) -> &[AssociationChainEntry] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of ancestors above the leaf.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    #[must_use]
    pub fn root(&self) -> Option<&AssociationChainEntry> {
        self.0.first()
    }

    /// The entity the chain was resolved for.
    #[must_use]
    pub fn leaf(&self) -> Option<&AssociationChainEntry> {
        self.0.last()
    }

    /// `true` if `prefix` matches the leading entries of this chain.
    ///
    /// The empty chain is a prefix of every chain.
    #[must_use]
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl From<Vec<AssociationChainEntry>> for AssociationChain {
    fn from(entries: Vec<AssociationChainEntry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<AssociationChainEntry> for AssociationChain {
    fn from_iter<I: IntoIterator<Item = AssociationChainEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for AssociationChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
