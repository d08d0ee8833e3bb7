//! Effective bounds of items, with caching for groups.

use std::collections::{HashMap, HashSet};

use crate::error::ManipulationError;
use crate::geometry::Transform;

use super::document::Diagram;
use super::item::{DiagramItem, ItemBody, ItemId};

/// Computes the effective [`Transform`] of an item.
///
/// Leaf shapes are O(1). Groups require resolving every descendant leaf
/// shape and aggregating, which is cached per `(item, revision)`; any
/// diagram mutation bumps the revision and thereby invalidates the
/// entry. Staleness would be a correctness bug, not a performance one:
/// resize and rotate math depends on accurate group bounds.
#[derive(Debug, Default)]
pub struct BoundsResolver {
    cache: HashMap<ItemId, (u64, Transform)>,
}

impl BoundsResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// The effective transform of `item` within `diagram`.
    ///
    /// An empty group resolves to [`Transform::ZERO`]. A group reaching
    /// itself through its descendants is a fatal invariant violation and
    /// fails with [`ManipulationError::CyclicGroup`].
    pub fn bounds(
        &mut self,
        item: &DiagramItem,
        diagram: &Diagram,
    ) -> Result<Transform, ManipulationError> {
        match item.body() {
            ItemBody::Shape { transform, .. } => Ok(*transform),
            ItemBody::Group { rotation, .. } => {
                if let Some(&(revision, cached)) = self.cache.get(&item.id()) {
                    if revision == diagram.revision() {
                        return Ok(cached);
                    }
                }

                let mut visited = HashSet::new();
                let mut leaves = Vec::new();

                collect_leaf_transforms(item, diagram, &mut visited, &mut leaves)?;

                let bounds = Transform::from_transforms_and_rotation(&leaves, *rotation);

                self.cache.insert(item.id(), (diagram.revision(), bounds));
                Ok(bounds)
            }
        }
    }

    /// Drop all cached entries.
    pub fn clear(&mut self) {
        self.cache.clear();
    }

    #[cfg(test)]
    fn cached_revision(&self, id: ItemId) -> Option<u64> {
        self.cache.get(&id).map(|(revision, _)| *revision)
    }
}

/// Depth-first walk collecting the transforms of all descendant leaf
/// shapes. Nested groups contribute their leaves, not their own rotation.
fn collect_leaf_transforms(
    item: &DiagramItem,
    diagram: &Diagram,
    visited: &mut HashSet<ItemId>,
    out: &mut Vec<Transform>,
) -> Result<(), ManipulationError> {
    if !visited.insert(item.id()) {
        return Err(ManipulationError::CyclicGroup(item.id()));
    }

    match item.body() {
        ItemBody::Shape { transform, .. } => {
            out.push(*transform);
            Ok(())
        }
        ItemBody::Group { child_ids, .. } => {
            for child_id in child_ids {
                let child = diagram
                    .item(*child_id)
                    .ok_or(ManipulationError::UnknownItem(*child_id))?;

                collect_leaf_transforms(child, diagram, visited, out)?;
            }
            Ok(())
        }
    }
}
