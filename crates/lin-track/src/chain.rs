//! Association chain resolution.
//!
//! Walks an entity's declared owner relation upward to the hierarchy root and
//! emits `{name, id}` entries root first. Recursion is kept (hierarchies are
//! shallow) but capped by `general.max_chain_depth`, so a cyclic parent
//! declaration fails instead of looping.

use lin_config::{InverseFallback, ParentConfig};
use lin_core::entities::{AssociationChain, AssociationChainEntry, EntitySnapshot};

use crate::error::{ResolutionError, TrackError};
use crate::policy::PolicyRegistry;
use crate::traits::{EntityLookup, RelationMetadata};

/// Resolves association chains against the host's entity lookup.
///
/// Holds no locks; each lookup may block or fail independently.
pub struct ChainResolver<'a> {
    registry: &'a PolicyRegistry,
    lookup: &'a dyn EntityLookup,
    relations: &'a dyn RelationMetadata,
    max_depth: usize,
    fallback: InverseFallback,
}

impl<'a> ChainResolver<'a> {
    #[must_use]
    pub const fn new(
        registry: &'a PolicyRegistry,
        lookup: &'a dyn EntityLookup,
        relations: &'a dyn RelationMetadata,
        max_depth: usize,
        fallback: InverseFallback,
    ) -> Self {
        Self {
            registry,
            lookup,
            relations,
            max_depth,
            fallback,
        }
    }

    /// Resolve the chain for `entity`, root first and `entity` last.
    ///
    /// # Errors
    ///
    /// Returns `TrackError::Resolution` if an owner cannot be loaded or named,
    /// and `TrackError::ChainDepthExceeded` past `max_depth` ancestors.
    pub fn resolve(&self, entity: &EntitySnapshot) -> Result<AssociationChain, TrackError> {
        let mut chain = AssociationChain::new();
        self.walk(entity, 0, &mut chain)?;
        Ok(chain)
    }

    fn walk(
        &self,
        node: &EntitySnapshot,
        depth: usize,
        chain: &mut AssociationChain,
    ) -> Result<(), TrackError> {
        if depth > self.max_depth {
            return Err(TrackError::ChainDepthExceeded {
                type_name: node.type_name.clone(),
                id: node.id.clone(),
                limit: self.max_depth,
            });
        }

        let parent = self.load_parent(node)?;
        if let Some((owner, _)) = &parent {
            self.walk(owner, depth + 1, chain)?;
        }

        let name = self.entry_name(node, parent.as_ref())?;
        chain.push(AssociationChainEntry::new(name, node.id.clone()));
        Ok(())
    }

    /// The node's owner snapshot and declaration, or `None` for a root.
    fn load_parent(
        &self,
        node: &EntitySnapshot,
    ) -> Result<Option<(EntitySnapshot, &'a ParentConfig)>, ResolutionError> {
        let (Some(decl), Some(parent_id)) =
            (self.registry.parent_of(&node.type_name), node.parent_id.as_ref())
        else {
            return Ok(None);
        };

        let owner = self
            .lookup
            .find(&decl.type_name, parent_id)
            .map_err(|source| ResolutionError::Lookup {
                type_name: decl.type_name.clone(),
                id: parent_id.clone(),
                source,
            })?
            .ok_or_else(|| ResolutionError::MissingParent {
                child_type: node.type_name.clone(),
                child_id: node.id.clone(),
                parent_type: decl.type_name.clone(),
                parent_id: parent_id.clone(),
            })?;

        Ok(Some((owner, decl)))
    }

    /// Roots are named by their type. Owned nodes use the owner's inverse
    /// relation, confirmed against relation metadata; if that fails, the
    /// configured fallback decides.
    fn entry_name(
        &self,
        node: &EntitySnapshot,
        parent: Option<&(EntitySnapshot, &ParentConfig)>,
    ) -> Result<String, ResolutionError> {
        let Some((owner, decl)) = parent else {
            return Ok(node.type_name.clone());
        };

        if let Some(inverse) = decl.inverse_of.as_deref() {
            if self
                .relations
                .relation_targets(&owner.type_name, inverse, &node.type_name)
            {
                return Ok(inverse.to_string());
            }
        }

        match self.fallback {
            InverseFallback::TypeName => Ok(node.type_name.clone()),
            InverseFallback::Error => Err(ResolutionError::UnresolvedInverse {
                child_type: node.type_name.clone(),
                child_id: node.id.clone(),
                parent_type: owner.type_name.clone(),
                relation: decl.inverse_of.clone(),
            }),
        }
    }
}
