//! Per-agent context handed to the decision maker each tick.
//!
//! The context is the **only** information an agent receives about the
//! world. Tiles outside the vision radius, hidden traps owned by others,
//! and other agents' inventories never appear here.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::agent::Upgrades;
use crate::enums::TileStatus;
use crate::geometry::Position;
use crate::ids::AgentId;
use crate::items::InventoryView;
use crate::world::{Tile, WorldObject};

/// A chat message between agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChatMessage {
    /// Tick the message was sent in.
    pub tick: u64,
    /// Sender.
    pub from: AgentId,
    /// Recipient, or `None` for a broadcast.
    pub to: Option<AgentId>,
    /// Body.
    pub text: String,
}

impl ChatMessage {
    /// Whether `agent` should receive this message.
    pub fn is_for(&self, agent: AgentId) -> bool {
        self.from != agent && self.to.is_none_or(|to| to == agent)
    }
}

/// Another live agent inside the vision radius.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct VisibleAgent {
    /// Agent identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Current tile.
    pub position: Position,
    /// Current hit points.
    pub hp: u32,
}

/// The agent's own state as presented to its decision maker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SelfState {
    /// Agent identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Current tile.
    pub position: Position,
    /// Current hit points.
    pub hp: u32,
    /// Maximum hit points.
    pub max_hp: u32,
    /// Current energy.
    pub energy: u32,
    /// Maximum energy.
    pub max_energy: u32,
    /// Coins.
    pub coins: u32,
    /// Upgrade levels.
    pub upgrades: Upgrades,
    /// Effective vision radius.
    pub vision_radius: u32,
    /// Effective claim radius.
    pub claim_radius: u32,
    /// Effective tiles per MOVE.
    pub speed: u32,
    /// Tiles owned.
    pub tiles_owned: u32,
    /// Private inventory.
    pub inventory: InventoryView,
}

/// Everything one agent perceives at the start of a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentContext {
    /// Current tick number.
    pub tick: u64,
    /// Last tick of the game.
    pub max_ticks: u64,
    /// World width in tiles.
    pub world_width: u32,
    /// World height in tiles.
    pub world_height: u32,
    /// The agent's own state.
    pub self_state: SelfState,
    /// Ownership status of the tile the agent stands on.
    pub current_tile: TileStatus,
    /// Tiles inside the vision radius.
    pub visible_tiles: Vec<Tile>,
    /// World objects inside the vision radius, hidden traps of others
    /// excluded.
    pub visible_objects: Vec<WorldObject>,
    /// Other live agents inside the vision radius.
    pub visible_agents: Vec<VisibleAgent>,
    /// Messages addressed to the agent (or broadcast) last tick.
    pub inbound_messages: Vec<ChatMessage>,
    /// The agent's memory log, oldest first.
    pub memory: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broadcast_reaches_everyone_but_sender() {
        let sender = AgentId::new();
        let other = AgentId::new();
        let message = ChatMessage {
            tick: 3,
            from: sender,
            to: None,
            text: "truce?".to_owned(),
        };
        assert!(message.is_for(other));
        assert!(!message.is_for(sender));
    }

    #[test]
    fn direct_message_reaches_only_recipient() {
        let sender = AgentId::new();
        let target = AgentId::new();
        let bystander = AgentId::new();
        let message = ChatMessage {
            tick: 3,
            from: sender,
            to: Some(target),
            text: "meet at the shrine".to_owned(),
        };
        assert!(message.is_for(target));
        assert!(!message.is_for(bystander));
    }
}
