//! Spatial registry of every non-agent entity on the grid.
//!
//! The [`WorldObjectManager`] is the only component that inserts or removes
//! world objects. It keeps an id -> object map and a position -> ids map in
//! lock-step, so "object of kind K at P" queries cost O(objects at P).
//! Object positions are fixed once inserted; mutation goes through
//! [`WorldObjectManager::kind_mut`], which cannot move an object out from
//! under the position index.

use std::collections::{BTreeMap, BTreeSet};

use frontier_types::{
    AgentId, DroppedItemState, InteractiveState, ObjectId, ObjectKind, Position,
    ResourceNodeState, StructureState, WorldObject,
};

use crate::error::WorldError;

/// Objects added and removed since the last drain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectChanges {
    /// Objects inserted (current state).
    pub added: Vec<WorldObject>,
    /// Ids of objects removed.
    pub removed: Vec<ObjectId>,
}

/// Registry of structures, resource nodes, interactives, and dropped items.
#[derive(Debug, Clone, Default)]
pub struct WorldObjectManager {
    objects: BTreeMap<ObjectId, WorldObject>,
    by_position: BTreeMap<Position, Vec<ObjectId>>,
    added: BTreeSet<ObjectId>,
    removed: Vec<ObjectId>,
}

impl WorldObjectManager {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            by_position: BTreeMap::new(),
            added: BTreeSet::new(),
            removed: Vec::new(),
        }
    }

    /// Register an object.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateObject`] if the id is already in use.
    pub fn insert(&mut self, object: WorldObject) -> Result<ObjectId, WorldError> {
        let id = object.id;
        if self.objects.contains_key(&id) {
            return Err(WorldError::DuplicateObject(id));
        }
        self.by_position.entry(object.position).or_default().push(id);
        self.objects.insert(id, object);
        self.added.insert(id);
        Ok(id)
    }

    /// Remove an object, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::ObjectNotFound`] if no such object exists.
    pub fn remove(&mut self, id: ObjectId) -> Result<WorldObject, WorldError> {
        let object = self
            .objects
            .remove(&id)
            .ok_or(WorldError::ObjectNotFound(id))?;
        if let Some(ids) = self.by_position.get_mut(&object.position) {
            ids.retain(|other| *other != id);
            if ids.is_empty() {
                self.by_position.remove(&object.position);
            }
        }
        // An object created and destroyed within one drain window never
        // reaches observers.
        if !self.added.remove(&id) {
            self.removed.push(id);
        }
        Ok(object)
    }

    /// Look up an object by id.
    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    /// Mutable access to an object's variant state.
    pub fn kind_mut(&mut self, id: ObjectId) -> Option<&mut ObjectKind> {
        self.objects.get_mut(&id).map(|o| &mut o.kind)
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Every object, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &WorldObject> {
        self.objects.values()
    }

    /// Objects on a tile, in insertion order.
    pub fn at(&self, position: Position) -> impl Iterator<Item = &WorldObject> {
        self.by_position
            .get(&position)
            .into_iter()
            .flatten()
            .filter_map(|id| self.objects.get(id))
    }

    /// The structure on a tile, if any.
    pub fn structure_at(&self, position: Position) -> Option<(&WorldObject, &StructureState)> {
        self.at(position).find_map(|o| match &o.kind {
            ObjectKind::Structure(s) => Some((o, s)),
            _ => None,
        })
    }

    /// The resource node on a tile, if any.
    pub fn resource_at(&self, position: Position) -> Option<(ObjectId, &ResourceNodeState)> {
        self.at(position).find_map(|o| match &o.kind {
            ObjectKind::Resource(r) => Some((o.id, r)),
            _ => None,
        })
    }

    /// The interactive object on a tile, if any.
    pub fn interactive_at(&self, position: Position) -> Option<(ObjectId, &InteractiveState)> {
        self.at(position).find_map(|o| match &o.kind {
            ObjectKind::Interactive(i) => Some((o.id, i)),
            _ => None,
        })
    }

    /// The first dropped item on a tile, if any.
    pub fn dropped_item_at(&self, position: Position) -> Option<(ObjectId, &DroppedItemState)> {
        self.at(position).find_map(|o| match &o.kind {
            ObjectKind::DroppedItem(d) => Some((o.id, d)),
            _ => None,
        })
    }

    /// Whether a movement-blocking structure stands on the tile.
    pub fn blocking_structure_at(&self, position: Position) -> bool {
        self.structure_at(position)
            .is_some_and(|(_, s)| s.blocks_movement)
    }

    /// Whether any object stands on the tile.
    pub fn is_occupied(&self, position: Position) -> bool {
        self.by_position.contains_key(&position)
    }

    /// Number of resource nodes on the grid.
    pub fn count_resources(&self) -> usize {
        self.objects
            .values()
            .filter(|o| matches!(o.kind, ObjectKind::Resource(_)))
            .count()
    }

    /// Objects within `radius` of `center` (Euclidean, inclusive) that
    /// `observer` may see. Hidden structures owned by someone else are
    /// suppressed.
    pub fn visible_to(
        &self,
        center: Position,
        radius: u32,
        observer: AgentId,
    ) -> Vec<WorldObject> {
        self.objects
            .values()
            .filter(|o| center.within_radius(o.position, radius))
            .filter(|o| !o.is_hidden_from(observer))
            .cloned()
            .collect()
    }

    /// Every object `observer` may see anywhere on the grid.
    pub fn all_visible_to(&self, observer: AgentId) -> Vec<WorldObject> {
        self.objects
            .values()
            .filter(|o| !o.is_hidden_from(observer))
            .cloned()
            .collect()
    }

    /// Ids of dropped items whose despawn tick has been reached.
    pub fn expired_dropped_items(&self, tick: u64) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter_map(|o| match &o.kind {
                ObjectKind::DroppedItem(d) if d.despawn_tick <= tick => Some(o.id),
                _ => None,
            })
            .collect()
    }

    /// Ids of resource nodes with nothing left to harvest.
    pub fn depleted_resources(&self) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter_map(|o| match &o.kind {
                ObjectKind::Resource(r) if r.remaining == 0 => Some(o.id),
                _ => None,
            })
            .collect()
    }

    /// Drain the objects added and removed since the last call.
    pub fn take_changes(&mut self) -> ObjectChanges {
        let added = std::mem::take(&mut self.added)
            .into_iter()
            .filter_map(|id| self.objects.get(&id).cloned())
            .collect();
        ObjectChanges {
            added,
            removed: std::mem::take(&mut self.removed),
        }
    }

    /// Check that the two indexes agree. Used by tests.
    pub fn is_consistent(&self) -> bool {
        let indexed: usize = self.by_position.values().map(Vec::len).sum();
        indexed == self.objects.len()
            && self.by_position.iter().all(|(position, ids)| {
                !ids.is_empty()
                    && ids.iter().all(|id| {
                        self.objects
                            .get(id)
                            .is_some_and(|o| o.position == *position)
                    })
            })
    }
}
