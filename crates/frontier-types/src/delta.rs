//! Broadcast payloads: the per-tick delta and the full-state snapshot.
//!
//! Both are serialized with `serde_json` by whatever transport sits in
//! front of the engine; the shapes are mirrored to `TypeScript` for the
//! rendering client.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::actions::ActionResult;
use crate::agent::AgentSnapshot;
use crate::enums::{DeltaKind, GameStatus};
use crate::geometry::Position;
use crate::ids::{AgentId, GameId, ObjectId};
use crate::items::InventoryView;
use crate::perception::ChatMessage;
use crate::world::{Tile, WorldObject};

/// One tile whose owner changed during the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TileChange {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// New owner, `None` when released.
    pub owner_id: Option<AgentId>,
}

impl TileChange {
    /// Build a change record from a position and its new owner.
    pub const fn new(position: Position, owner_id: Option<AgentId>) -> Self {
        Self {
            x: position.x,
            y: position.y,
            owner_id,
        }
    }
}

/// Everything that changed during one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DeltaChanges {
    /// Ownership changes.
    pub tiles: Vec<TileChange>,
    /// Snapshots of every agent after the tick.
    pub agents: Vec<AgentSnapshot>,
    /// Messages sent this tick.
    pub messages: Vec<ChatMessage>,
    /// Action results followed by derived-effect results.
    pub results: Vec<ActionResult>,
    /// Objects created this tick.
    pub objects_added: Vec<WorldObject>,
    /// Ids of objects removed this tick.
    pub objects_removed: Vec<ObjectId>,
    /// Agents that respawned this tick.
    pub respawned: Vec<AgentId>,
    /// Fog-of-war tile list (per-player variant only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_tiles: Option<Vec<Position>>,
    /// Private inventory (per-player variant only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_inventory: Option<InventoryView>,
}

/// The per-tick broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickDelta {
    /// `tick` or `game_over`.
    #[serde(rename = "type")]
    pub kind: DeltaKind,
    /// Tick the delta describes.
    pub tick: u64,
    /// Game the delta belongs to.
    pub game_id: GameId,
    /// What changed.
    pub changes: DeltaChanges,
    /// Winner, set on the `game_over` delta.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<AgentId>,
}

/// Full game state sent on join or reconnect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameSnapshot {
    /// Game identifier.
    pub game_id: GameId,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Current tick.
    pub tick: u64,
    /// Last tick of the game.
    pub max_ticks: u64,
    /// World width.
    pub width: u32,
    /// World height.
    pub height: u32,
    /// Tiles, row-major; restricted to explored tiles for a player view.
    pub tiles: Vec<Tile>,
    /// Every agent.
    pub agents: Vec<AgentSnapshot>,
    /// World objects; hidden traps of others excluded for a player view.
    pub objects: Vec<WorldObject>,
    /// Message history.
    pub messages: Vec<ChatMessage>,
    /// Winner, once finished.
    pub winner: Option<AgentId>,
    /// Private inventory of the viewing player, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_inventory: Option<InventoryView>,
}
