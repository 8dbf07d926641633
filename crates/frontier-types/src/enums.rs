//! Enumeration types for the Frontier game.
//!
//! Tags shared by every layer: action types, upgrade tracks, terrain,
//! item and object categories, and game lifecycle status.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// The type tag of an action submitted by an agent, or of a derived effect
/// the engine applied on an agent's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum ActionType {
    /// Walk up to the agent's speed in one direction.
    Move,
    /// Take ownership of every tile within the claim radius.
    Claim,
    /// Attack an adjacent agent.
    Fight,
    /// Harvest one unit from the resource node on the agent's tile.
    Harvest,
    /// Pick up the dropped item on the agent's tile.
    Pickup,
    /// Consume or place an item from the inventory.
    Use,
    /// Raise one of the six upgrade tracks by a level.
    Upgrade,
    /// Send a message to one agent or to everyone.
    Message,
    /// Do nothing this tick.
    Wait,
    /// Turn recipe ingredients into a result item.
    Craft,
    /// Move an item from the inventory into an equipment slot.
    Equip,
    /// Move an equipped item back into the inventory.
    Unequip,
    /// Drop items from the inventory onto the agent's tile.
    Drop,
    /// Derived effect: a hidden trap fired on the agent.
    Trap,
    /// Derived effect: an interactive object activated for the agent.
    Activate,
}

impl ActionType {
    /// Every action an agent may submit (derived effects excluded).
    pub const PLAYER_ACTIONS: [Self; 13] = [
        Self::Move,
        Self::Claim,
        Self::Fight,
        Self::Harvest,
        Self::Pickup,
        Self::Use,
        Self::Upgrade,
        Self::Message,
        Self::Wait,
        Self::Craft,
        Self::Equip,
        Self::Unequip,
        Self::Drop,
    ];
}

impl core::fmt::Display for ActionType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Move => "MOVE",
            Self::Claim => "CLAIM",
            Self::Fight => "FIGHT",
            Self::Harvest => "HARVEST",
            Self::Pickup => "PICKUP",
            Self::Use => "USE",
            Self::Upgrade => "UPGRADE",
            Self::Message => "MESSAGE",
            Self::Wait => "WAIT",
            Self::Craft => "CRAFT",
            Self::Equip => "EQUIP",
            Self::Unequip => "UNEQUIP",
            Self::Drop => "DROP",
            Self::Trap => "TRAP",
            Self::Activate => "ACTIVATE",
        };
        f.write_str(name)
    }
}

/// One of the six independent upgrade tracks on an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum UpgradeKind {
    /// Vision radius.
    Vision,
    /// Memory log capacity.
    Memory,
    /// Melee damage.
    Strength,
    /// Inventory slot count.
    Storage,
    /// Tiles walked per MOVE.
    Speed,
    /// CLAIM radius.
    Claim,
}

impl UpgradeKind {
    /// All tracks, in a fixed order.
    pub const ALL: [Self; 6] = [
        Self::Vision,
        Self::Memory,
        Self::Strength,
        Self::Storage,
        Self::Speed,
        Self::Claim,
    ];
}

impl core::str::FromStr for UpgradeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vision" => Ok(Self::Vision),
            "memory" => Ok(Self::Memory),
            "strength" => Ok(Self::Strength),
            "storage" => Ok(Self::Storage),
            "speed" => Ok(Self::Speed),
            "claim" => Ok(Self::Claim),
            other => Err(format!("unknown upgrade: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Terrain class of a tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Terrain {
    /// Open ground.
    #[default]
    Plains,
    /// Woodland, rich in timber.
    Forest,
    /// Arid ground with exposed stone and ore.
    Desert,
    /// Impassable high ground.
    Mountain,
    /// Impassable water.
    Water,
}

impl Terrain {
    /// Whether agents can stand on this terrain.
    pub const fn is_passable(self) -> bool {
        !matches!(self, Self::Mountain | Self::Water)
    }

    /// Passive income multiplier for an owned tile of this terrain, in
    /// percent of the base per-tile income.
    pub const fn income_pct(self) -> u32 {
        match self {
            Self::Plains => 100,
            Self::Forest => 150,
            Self::Desert => 50,
            Self::Mountain | Self::Water => 0,
        }
    }
}

/// Ownership status of the tile an agent stands on, from that agent's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case", tag = "status", content = "owner_id")]
#[ts(export, export_to = "bindings/")]
pub enum TileStatus {
    /// No one owns the tile.
    Unowned,
    /// The observing agent owns the tile.
    OwnedBySelf,
    /// Another agent owns the tile.
    OwnedByOther(crate::ids::AgentId),
}

/// Kind of a player-built or engine-placed structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum StructureType {
    /// Blocks movement through its tile.
    Wall,
    /// Hidden from non-owners; damages the first enemy to step on it.
    Trap,
    /// Marker that extends its owner's vision.
    Beacon,
}

impl core::str::FromStr for StructureType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "wall" => Ok(Self::Wall),
            "trap" => Ok(Self::Trap),
            "beacon" => Ok(Self::Beacon),
            other => Err(format!("unknown structure type: {other}")),
        }
    }
}

/// Kind of an environment object that reacts to agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum InteractiveType {
    /// Restores HP and energy, then cools down.
    Shrine,
    /// Grants a one-off reward item, then disappears.
    Cache,
    /// Teleports the agent to a linked destination.
    Portal,
    /// Passive: pays bonus income to whoever owns its tile.
    Obelisk,
}

impl InteractiveType {
    /// Whether stepping onto this object triggers it automatically.
    pub const fn auto_activates(self) -> bool {
        !matches!(self, Self::Obelisk)
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Broad category of an item definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ItemCategory {
    /// Raw material harvested from resource nodes.
    Resource,
    /// Single-use item with a heal or energy effect.
    Consumable,
    /// Equippable in the weapon slot.
    Weapon,
    /// Equippable in the armor slot.
    Armor,
    /// Equippable in the trinket slot.
    Trinket,
    /// Item that becomes a structure when used.
    Placeable,
    /// Intermediate crafting material.
    Material,
}

impl ItemCategory {
    /// The equipment slot items of this category go into, if any.
    pub const fn equipment_slot(self) -> Option<EquipmentSlot> {
        match self {
            Self::Weapon => Some(EquipmentSlot::Weapon),
            Self::Armor => Some(EquipmentSlot::Armor),
            Self::Trinket => Some(EquipmentSlot::Trinket),
            _ => None,
        }
    }
}

/// Item rarity, used by loot tables and the client.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Rarity {
    /// Everywhere.
    #[default]
    Common,
    /// Less frequent.
    Uncommon,
    /// Seldom seen.
    Rare,
    /// Very seldom seen.
    Epic,
    /// One of a kind.
    Legendary,
}

/// One of the three equipment slots on an inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EquipmentSlot {
    /// Adds to melee damage.
    Weapon,
    /// Reduces incoming melee damage.
    Armor,
    /// Miscellaneous bonuses.
    Trinket,
}

// ---------------------------------------------------------------------------
// Game lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum GameStatus {
    /// Accepting players; the tick loop has not started.
    #[default]
    Lobby,
    /// The tick loop is running.
    Running,
    /// The tick limit was reached or the game was stopped.
    Finished,
}

/// Discriminator of a broadcast delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DeltaKind {
    /// A regular per-tick update.
    Tick,
    /// The final update of a finished game.
    GameOver,
}
