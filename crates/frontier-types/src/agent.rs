//! Public agent state: upgrade levels and the snapshot broadcast to
//! observers.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::UpgradeKind;
use crate::geometry::Position;
use crate::ids::AgentId;

/// Current level on each of the six upgrade tracks. Every track starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Upgrades {
    /// Vision radius track (1..=5).
    pub vision: u8,
    /// Memory capacity track (1..=5).
    pub memory: u8,
    /// Melee strength track (1..=5).
    pub strength: u8,
    /// Inventory size track (1..=3).
    pub storage: u8,
    /// Movement speed track (1..=3).
    pub speed: u8,
    /// Claim radius track (1..=5).
    pub claim: u8,
}

impl Default for Upgrades {
    fn default() -> Self {
        Self {
            vision: 1,
            memory: 1,
            strength: 1,
            storage: 1,
            speed: 1,
            claim: 1,
        }
    }
}

impl Upgrades {
    /// Highest level reachable on a track.
    pub const fn max_level(kind: UpgradeKind) -> u8 {
        match kind {
            UpgradeKind::Storage | UpgradeKind::Speed => 3,
            UpgradeKind::Vision
            | UpgradeKind::Memory
            | UpgradeKind::Strength
            | UpgradeKind::Claim => 5,
        }
    }

    /// Current level on a track.
    pub const fn level(&self, kind: UpgradeKind) -> u8 {
        match kind {
            UpgradeKind::Vision => self.vision,
            UpgradeKind::Memory => self.memory,
            UpgradeKind::Strength => self.strength,
            UpgradeKind::Storage => self.storage,
            UpgradeKind::Speed => self.speed,
            UpgradeKind::Claim => self.claim,
        }
    }

    /// Whether the track is already at its maximum.
    pub const fn is_maxed(&self, kind: UpgradeKind) -> bool {
        self.level(kind) >= Self::max_level(kind)
    }

    /// Raise a track by one level, returning the new level, or `None` when
    /// it is already maxed.
    pub const fn raise(&mut self, kind: UpgradeKind) -> Option<u8> {
        if self.is_maxed(kind) {
            return None;
        }
        let slot = match kind {
            UpgradeKind::Vision => &mut self.vision,
            UpgradeKind::Memory => &mut self.memory,
            UpgradeKind::Strength => &mut self.strength,
            UpgradeKind::Storage => &mut self.storage,
            UpgradeKind::Speed => &mut self.speed,
            UpgradeKind::Claim => &mut self.claim,
        };
        *slot = slot.saturating_add(1);
        Some(*slot)
    }
}

/// Public view of an agent, as broadcast in deltas and snapshots. The
/// inventory is private and never part of this view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentSnapshot {
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
    /// Coins earned from captures and kills.
    pub coins: u32,
    /// Upgrade levels.
    pub upgrades: Upgrades,
    /// Whether the agent is alive.
    pub alive: bool,
    /// Tick at which a dead agent comes back.
    pub respawn_tick: Option<u64>,
    /// Number of tiles currently owned.
    pub tiles_owned: u32,
    /// Kills scored.
    pub kills: u32,
    /// Times died.
    pub deaths: u32,
}
