//! The diagram document: owns all items and the current selection.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::ManipulationError;
use crate::geometry::Transform;

use super::item::{DiagramItem, ItemId};

/// A diagram owning a set of items by id, a root z-order and the current
/// selection.
///
/// Every structural or geometric mutation bumps an explicit `revision`
/// counter. Bounds caching keys off this counter, so a stale revision can
/// never masquerade as a fresh one the way reference identity could.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagram {
    id: Uuid,
    revision: u64,
    items: HashMap<ItemId, DiagramItem>,
    /// Root item ids, back to front.
    root_ids: Vec<ItemId>,
    selected_ids: Vec<ItemId>,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    /// Create a new empty diagram.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            revision: 0,
            items: HashMap::new(),
            root_ids: Vec::new(),
            selected_ids: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The current revision; part of every bounds-cache key.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    /// Add an item at the top of the root z-order.
    pub fn add_item(&mut self, item: DiagramItem) -> ItemId {
        let id = item.id();
        self.root_ids.push(id);
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Add an item without putting it on the root level, so a group can
    /// reference it as a child.
    pub fn add_child_item(&mut self, item: DiagramItem) -> ItemId {
        let id = item.id();
        self.items.insert(id, item);
        self.touch();
        id
    }

    /// Remove an item from the diagram and the selection.
    pub fn remove_item(&mut self, id: ItemId) -> Option<DiagramItem> {
        self.root_ids.retain(|root| *root != id);
        self.selected_ids.retain(|selected| *selected != id);

        let removed = self.items.remove(&id);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    /// Replace an item with the result of a pure update function.
    pub fn update_item(
        &mut self,
        id: ItemId,
        update: impl FnOnce(&DiagramItem) -> DiagramItem,
    ) -> Result<(), ManipulationError> {
        let item = self.items.get(&id).ok_or(ManipulationError::UnknownItem(id))?;

        let updated = update(item);
        self.items.insert(id, updated);
        self.touch();
        Ok(())
    }

    /// Group root items under a new group item; returns the group's id.
    pub fn group_items(&mut self, child_ids: Vec<ItemId>) -> Result<ItemId, ManipulationError> {
        for id in &child_ids {
            if !self.items.contains_key(id) {
                return Err(ManipulationError::UnknownItem(*id));
            }
        }

        self.root_ids.retain(|root| !child_ids.contains(root));
        self.selected_ids.retain(|selected| !child_ids.contains(selected));

        let group = DiagramItem::group(child_ids);
        let group_id = group.id();

        self.root_ids.push(group_id);
        self.items.insert(group_id, group);
        self.touch();

        Ok(group_id)
    }

    /// Dissolve a group, lifting its children back to the root level.
    pub fn ungroup_item(&mut self, id: ItemId) -> Result<Vec<ItemId>, ManipulationError> {
        let item = self.items.get(&id).ok_or(ManipulationError::UnknownItem(id))?;

        let Some(child_ids) = item.child_ids().map(<[ItemId]>::to_vec) else {
            return Err(ManipulationError::UnknownItem(id));
        };

        self.remove_item(id);
        self.root_ids.extend(child_ids.iter().copied());
        self.touch();

        Ok(child_ids)
    }

    pub fn item(&self, id: ItemId) -> Option<&DiagramItem> {
        self.items.get(&id)
    }

    /// Root item ids, back to front.
    pub fn root_ids(&self) -> &[ItemId] {
        &self.root_ids
    }

    /// Root items in stable z-order.
    pub fn root_items(&self) -> impl Iterator<Item = &DiagramItem> {
        self.root_ids.iter().filter_map(|id| self.items.get(id))
    }

    /// Select the given items; unknown and locked items are dropped.
    pub fn select(&mut self, ids: &[ItemId]) {
        self.selected_ids = ids
            .iter()
            .filter(|id| self.items.get(id).is_some_and(|item| !item.is_locked()))
            .copied()
            .collect();
        self.touch();
    }

    pub fn selected_ids(&self) -> &[ItemId] {
        &self.selected_ids
    }

    pub fn selected_items(&self) -> Vec<&DiagramItem> {
        self.selected_ids
            .iter()
            .filter_map(|id| self.items.get(id))
            .collect()
    }

    /// Apply a committed transform change: retarget every listed item
    /// from the old aggregate bounds to the new ones.
    ///
    /// This is the transactional receiver side of
    /// `ManipulationHost::on_transform_commit`.
    pub fn transform_items(
        &mut self,
        ids: &[ItemId],
        old_bounds: &Transform,
        new_bounds: &Transform,
    ) -> Result<(), ManipulationError> {
        for id in ids {
            if !self.items.contains_key(id) {
                return Err(ManipulationError::UnknownItem(*id));
            }
        }

        for id in ids {
            self.update_item(*id, |item| item.transform_by_bounds(old_bounds, new_bounds))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Rotation, Vec2};

    fn transform(x: f64, y: f64, w: f64, h: f64) -> Transform {
        Transform::new(Vec2::new(x, y), Vec2::new(w, h), Rotation::ZERO)
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let mut diagram = Diagram::new();
        let before = diagram.revision();

        let id = diagram.add_item(DiagramItem::shape("Rectangle", 10.0, 10.0));
        assert!(diagram.revision() > before);

        let after_add = diagram.revision();
        diagram
            .update_item(id, |item| item.transform_with(|t| t.move_by(Vec2::new(1.0, 0.0))))
            .unwrap();
        assert!(diagram.revision() > after_add);
    }

    #[test]
    fn test_update_unknown_item_fails() {
        let mut diagram = Diagram::new();
        let id = Uuid::new_v4();

        assert_eq!(
            diagram.update_item(id, Clone::clone),
            Err(ManipulationError::UnknownItem(id))
        );
    }

    #[test]
    fn test_select_drops_locked_items() {
        let mut diagram = Diagram::new();

        let free = diagram.add_item(DiagramItem::shape("Rectangle", 10.0, 10.0));
        let locked = diagram.add_item(DiagramItem::shape("Rectangle", 10.0, 10.0).lock());

        diagram.select(&[free, locked]);

        assert_eq!(diagram.selected_ids(), &[free]);
    }

    #[test]
    fn test_group_and_ungroup() {
        let mut diagram = Diagram::new();

        let a = diagram.add_item(DiagramItem::shape("Rectangle", 10.0, 10.0));
        let b = diagram.add_item(DiagramItem::shape("Rectangle", 10.0, 10.0));

        let group = diagram.group_items(vec![a, b]).unwrap();

        assert_eq!(diagram.root_ids(), &[group]);
        assert_eq!(diagram.item(group).unwrap().child_ids(), Some(&[a, b][..]));

        let children = diagram.ungroup_item(group).unwrap();

        assert_eq!(children, vec![a, b]);
        assert!(diagram.item(group).is_none());
        assert!(diagram.root_ids().contains(&a) && diagram.root_ids().contains(&b));
    }

    #[test]
    fn test_transform_items_applies_commit() {
        let mut diagram = Diagram::new();

        let id = diagram.add_item(
            DiagramItem::shape("Rectangle", 50.0, 30.0)
                .with_transform(transform(100.0, 100.0, 50.0, 30.0)),
        );
        diagram.select(&[id]);

        let old_bounds = transform(100.0, 100.0, 50.0, 30.0);
        let new_bounds = transform(105.0, 105.0, 50.0, 30.0);

        diagram.transform_items(&[id], &old_bounds, &new_bounds).unwrap();

        let moved = diagram.item(id).unwrap().transform().unwrap();
        assert!(moved.position().equals(&Vec2::new(105.0, 105.0)));
    }
}
