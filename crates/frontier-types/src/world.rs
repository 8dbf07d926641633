//! Tiles and world objects as seen on the wire.
//!
//! The `frontier-world` crate owns the mutable containers ([`Tile`] grid and
//! object registry); these are the value types they store and hand out.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{InteractiveType, StructureType, Terrain};
use crate::geometry::Position;
use crate::ids::{AgentId, ObjectId};
use crate::items::ItemInstance;

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Tile {
    /// Where the tile is.
    pub position: Position,
    /// Current owner, if claimed.
    pub owner: Option<AgentId>,
    /// Terrain class.
    pub terrain: Terrain,
}

/// A non-agent entity placed on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldObject {
    /// Unique id.
    pub id: ObjectId,
    /// Tile the object occupies.
    pub position: Position,
    /// Agent that placed or controls the object.
    pub owner: Option<AgentId>,
    /// Variant-specific state.
    pub kind: ObjectKind,
}

impl WorldObject {
    /// Create an object with a fresh id.
    pub fn new(position: Position, owner: Option<AgentId>, kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::new(),
            position,
            owner,
            kind,
        }
    }

    /// Whether this object is a hidden trap that `observer` must not see.
    pub fn is_hidden_from(&self, observer: AgentId) -> bool {
        match &self.kind {
            ObjectKind::Structure(s) => s.hidden && self.owner != Some(observer),
            _ => false,
        }
    }
}

/// The tagged variant over the four object families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ObjectKind {
    /// A structure (wall, trap, beacon).
    Structure(StructureState),
    /// A harvestable resource node.
    Resource(ResourceNodeState),
    /// An environment object that reacts to agents.
    Interactive(InteractiveState),
    /// Items lying on the ground.
    DroppedItem(DroppedItemState),
}

/// Structure-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StructureState {
    /// Which structure.
    pub structure_type: StructureType,
    /// Current hit points.
    pub hp: u32,
    /// Hit points when undamaged.
    pub max_hp: u32,
    /// Whether agents can walk through the tile.
    pub blocks_movement: bool,
    /// Whether non-owners are unable to see the structure.
    pub hidden: bool,
    /// Damage dealt on trigger (traps).
    pub damage: u32,
}

/// Resource-node-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResourceNodeState {
    /// Item id produced per harvested unit.
    pub resource_type: String,
    /// Units left before the node is depleted.
    pub remaining: u32,
}

/// Interactive-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InteractiveState {
    /// Which interactive.
    pub interactive_type: InteractiveType,
    /// Whether the object can currently be triggered.
    pub active: bool,
    /// Tick before which the object stays inactive.
    pub cooldown_until: u64,
    /// Teleport destination (portals).
    pub destination: Option<Position>,
    /// Reward granted on activation (caches).
    pub reward: Option<ItemInstance>,
}

/// Dropped-item-specific fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DroppedItemState {
    /// What is lying on the ground.
    pub item: ItemInstance,
    /// Tick at which the item vanishes.
    pub despawn_tick: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trap(owner: AgentId) -> WorldObject {
        WorldObject::new(
            Position::new(1, 1),
            Some(owner),
            ObjectKind::Structure(StructureState {
                structure_type: StructureType::Trap,
                hp: 10,
                max_hp: 10,
                blocks_movement: false,
                hidden: true,
                damage: 20,
            }),
        )
    }

    #[test]
    fn hidden_trap_visible_only_to_owner() {
        let owner = AgentId::new();
        let other = AgentId::new();
        let object = trap(owner);
        assert!(!object.is_hidden_from(owner));
        assert!(object.is_hidden_from(other));
    }

    #[test]
    fn object_kind_is_internally_tagged() {
        let json = serde_json::to_value(trap(AgentId::new())).ok();
        let tag = json
            .as_ref()
            .and_then(|v| v.get("kind"))
            .and_then(|k| k.get("type"))
            .and_then(serde_json::Value::as_str);
        assert_eq!(tag, Some("structure"));
    }
}
