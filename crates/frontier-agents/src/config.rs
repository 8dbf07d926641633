//! Balance parameters for agents and actions.
//!
//! These values correspond to the `balance` section of
//! `frontier-config.yaml`. The [`BalanceConfig`] struct bundles every
//! tunable so that callers (tick phases, handlers, tests) can override
//! defaults; a missing key in the file falls back to the value here.

use frontier_types::UpgradeKind;
use serde::{Deserialize, Serialize};

/// Tunable game balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Maximum and starting HP (default: 100).
    pub max_hp: u32,
    /// Energy on join and on respawn (default: 50).
    pub starting_energy: u32,
    /// Energy cap (default: 200).
    pub max_energy: u32,

    /// Vision radius at level 1 (default: 3).
    pub base_vision: u32,
    /// Memory entries kept per memory level (default: 10).
    pub memory_per_level: u32,
    /// Inventory slots at storage level 1 (default: 8).
    pub base_inventory_slots: u32,
    /// Slots added per storage level above 1 (default: 4).
    pub slots_per_storage_level: u32,

    /// Energy cost of the first upgrade on each track; later levels cost
    /// this times the current level.
    pub upgrade_costs: UpgradeCosts,

    /// Coins awarded per enemy tile captured by CLAIM (default: 1).
    pub coins_per_capture: u32,
    /// Coins awarded for a kill (default: 10).
    pub coins_per_kill: u32,

    /// Base passive energy per owned plains tile (default: 1).
    pub income_per_tile: u32,
    /// Extra passive energy per obelisk on an owned tile (default: 5).
    pub obelisk_bonus_energy: u32,

    /// Ticks a dead agent waits before respawning (default: 10).
    pub respawn_delay_ticks: u64,
    /// Ticks a dropped item stays on the ground (default: 50).
    pub dropped_item_ttl_ticks: u64,

    /// Longest MESSAGE body in characters (default: 280).
    pub max_message_length: usize,

    /// HP restored by a shrine (default: 30).
    pub shrine_heal: u32,
    /// Energy restored by a shrine (default: 20).
    pub shrine_energy: u32,
    /// Ticks a shrine stays inactive after use (default: 20).
    pub shrine_cooldown_ticks: u64,

    /// Structure HP when an item does not set `structure_hp` (default: 50).
    pub default_structure_hp: u32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            max_hp: 100,
            starting_energy: 50,
            max_energy: 200,
            base_vision: 3,
            memory_per_level: 10,
            base_inventory_slots: 8,
            slots_per_storage_level: 4,
            upgrade_costs: UpgradeCosts::default(),
            coins_per_capture: 1,
            coins_per_kill: 10,
            income_per_tile: 1,
            obelisk_bonus_energy: 5,
            respawn_delay_ticks: 10,
            dropped_item_ttl_ticks: 50,
            max_message_length: 280,
            shrine_heal: 30,
            shrine_energy: 20,
            shrine_cooldown_ticks: 20,
            default_structure_hp: 50,
        }
    }
}

/// Base energy cost per upgrade track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpgradeCosts {
    /// Vision (default: 20).
    pub vision: u32,
    /// Memory (default: 15).
    pub memory: u32,
    /// Strength (default: 25).
    pub strength: u32,
    /// Storage (default: 20).
    pub storage: u32,
    /// Speed (default: 30).
    pub speed: u32,
    /// Claim (default: 25).
    pub claim: u32,
}

impl Default for UpgradeCosts {
    fn default() -> Self {
        Self {
            vision: 20,
            memory: 15,
            strength: 25,
            storage: 20,
            speed: 30,
            claim: 25,
        }
    }
}

impl UpgradeCosts {
    /// Base cost of a track.
    pub const fn base(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::Vision => self.vision,
            UpgradeKind::Memory => self.memory,
            UpgradeKind::Strength => self.strength,
            UpgradeKind::Storage => self.storage,
            UpgradeKind::Speed => self.speed,
            UpgradeKind::Claim => self.claim,
        }
    }

    /// Cost of raising a track that currently sits at `current_level`.
    pub fn cost(&self, kind: UpgradeKind, current_level: u8) -> u32 {
        self.base(kind).saturating_mul(u32::from(current_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upgrade_cost_scales_with_level() {
        let costs = UpgradeCosts::default();
        assert_eq!(costs.cost(UpgradeKind::Speed, 1), 30);
        assert_eq!(costs.cost(UpgradeKind::Speed, 2), 60);
    }

    #[test]
    fn sparse_json_keeps_defaults() {
        let parsed: Result<BalanceConfig, _> =
            serde_json::from_str(r#"{"coins_per_kill": 99, "upgrade_costs": {"vision": 1}}"#);
        assert!(parsed.is_ok());
        if let Ok(config) = parsed {
            assert_eq!(config.coins_per_kill, 99);
            assert_eq!(config.upgrade_costs.vision, 1);
            assert_eq!(config.upgrade_costs.speed, 30);
            assert_eq!(config.max_hp, 100);
        }
    }
}
