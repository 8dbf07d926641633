//! Mutable per-player state.
//!
//! An [`Agent`] is created when a player joins and destroyed only when the
//! player is removed from the game. Death is a state transition
//! ([`Agent::kill`]) followed later by [`Agent::revive`].

use std::collections::{BTreeSet, VecDeque};

use frontier_types::{AgentId, AgentSnapshot, Position, UpgradeKind, Upgrades};

use crate::config::BalanceConfig;
use crate::error::AgentError;
use crate::inventory::Inventory;

/// One player in a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    /// Identifier.
    pub id: AgentId,
    /// Display name.
    pub name: String,
    /// Current tile.
    pub position: Position,
    /// Current HP.
    pub hp: u32,
    /// HP cap.
    pub max_hp: u32,
    /// Current energy.
    pub energy: u32,
    /// Energy cap.
    pub max_energy: u32,
    /// Coins from captures and kills.
    pub coins: u32,
    /// Upgrade levels.
    pub upgrades: Upgrades,
    /// Whether the agent is alive.
    pub alive: bool,
    /// Tick of the most recent death.
    pub death_tick: Option<u64>,
    /// Tick at which a dead agent respawns.
    pub respawn_tick: Option<u64>,
    /// Tiles the agent has ever seen.
    pub explored: BTreeSet<Position>,
    /// Kills scored.
    pub kills: u32,
    /// Times died.
    pub deaths: u32,
    /// Owned inventory.
    pub inventory: Inventory,
    memory: VecDeque<String>,
}

impl Agent {
    /// A fresh level-1 agent at `position`.
    pub fn new(name: impl Into<String>, position: Position, balance: &BalanceConfig) -> Self {
        let id = AgentId::new();
        let slots = usize::try_from(balance.base_inventory_slots).unwrap_or(0);
        Self {
            id,
            name: name.into(),
            position,
            hp: balance.max_hp,
            max_hp: balance.max_hp,
            energy: balance.starting_energy.min(balance.max_energy),
            max_energy: balance.max_energy,
            coins: 0,
            upgrades: Upgrades::default(),
            alive: true,
            death_tick: None,
            respawn_tick: None,
            explored: BTreeSet::new(),
            kills: 0,
            deaths: 0,
            inventory: Inventory::new(id, slots),
            memory: VecDeque::new(),
        }
    }

    // -------------------------------------------------------------------
    // Effective stats
    // -------------------------------------------------------------------

    /// Vision radius in tiles.
    pub fn vision_radius(&self, balance: &BalanceConfig) -> u32 {
        balance
            .base_vision
            .saturating_add(u32::from(self.upgrades.vision.saturating_sub(1)))
    }

    /// Maximum memory entries.
    pub fn memory_capacity(&self, balance: &BalanceConfig) -> usize {
        let entries = balance
            .memory_per_level
            .saturating_mul(u32::from(self.upgrades.memory));
        usize::try_from(entries).unwrap_or(usize::MAX)
    }

    /// Melee strength.
    pub fn strength(&self) -> u32 {
        u32::from(self.upgrades.strength)
    }

    /// Tiles walked per MOVE.
    pub fn speed(&self) -> u32 {
        u32::from(self.upgrades.speed)
    }

    /// CLAIM radius in tiles.
    pub fn claim_radius(&self) -> u32 {
        u32::from(self.upgrades.claim)
    }

    /// Inventory slot count for the current storage level.
    pub fn inventory_slots(&self, balance: &BalanceConfig) -> usize {
        let extra = balance
            .slots_per_storage_level
            .saturating_mul(u32::from(self.upgrades.storage.saturating_sub(1)));
        usize::try_from(balance.base_inventory_slots.saturating_add(extra)).unwrap_or(0)
    }

    /// Energy needed to raise a track one level.
    pub fn upgrade_cost(&self, kind: UpgradeKind, balance: &BalanceConfig) -> u32 {
        balance.upgrade_costs.cost(kind, self.upgrades.level(kind))
    }

    // -------------------------------------------------------------------
    // Vitals
    // -------------------------------------------------------------------

    /// Whether the agent is dead.
    pub const fn is_dead(&self) -> bool {
        !self.alive
    }

    /// Remove up to `amount` HP, returning the HP actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.hp);
        self.hp = self.hp.saturating_sub(removed);
        removed
    }

    /// Restore up to `amount` HP without exceeding the cap, returning the
    /// HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp.saturating_sub(self.hp));
        self.hp = self.hp.saturating_add(restored);
        restored
    }

    /// Restore up to `amount` energy without exceeding the cap, returning
    /// the energy actually restored.
    pub fn restore_energy(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_energy.saturating_sub(self.energy));
        self.energy = self.energy.saturating_add(restored);
        restored
    }

    /// Spend energy.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::NotEnoughEnergy`] without changing anything
    /// when the agent cannot afford it.
    pub fn spend_energy(&mut self, amount: u32) -> Result<(), AgentError> {
        self.energy = self
            .energy
            .checked_sub(amount)
            .ok_or(AgentError::NotEnoughEnergy {
                required: amount,
                available: self.energy,
            })?;
        Ok(())
    }

    /// Transition to dead: HP 0, death and respawn ticks set.
    ///
    /// Tile release and inventory drop span other aggregates and are done
    /// by [`crate::death::kill_agent`].
    pub fn kill(&mut self, tick: u64, respawn_delay: u64) {
        self.hp = 0;
        self.alive = false;
        self.death_tick = Some(tick);
        self.respawn_tick = Some(tick.saturating_add(respawn_delay));
        self.deaths = self.deaths.saturating_add(1);
    }

    /// Whether a dead agent is due to respawn at `tick`.
    pub fn respawn_due(&self, tick: u64) -> bool {
        !self.alive && self.respawn_tick.is_some_and(|t| t <= tick)
    }

    /// Bring a dead agent back at `position` with full HP and starting
    /// energy.
    pub fn revive(&mut self, position: Position, balance: &BalanceConfig) {
        self.position = position;
        self.hp = self.max_hp;
        self.energy = balance.starting_energy.min(self.max_energy);
        self.alive = true;
        self.respawn_tick = None;
    }

    // -------------------------------------------------------------------
    // Memory
    // -------------------------------------------------------------------

    /// Append to the memory log, evicting the oldest entries beyond the
    /// current capacity.
    pub fn remember(&mut self, entry: impl Into<String>, balance: &BalanceConfig) {
        let capacity = self.memory_capacity(balance);
        if capacity == 0 {
            return;
        }
        self.memory.push_back(entry.into());
        while self.memory.len() > capacity {
            self.memory.pop_front();
        }
    }

    /// Memory entries, oldest first.
    pub fn memory(&self) -> impl Iterator<Item = &str> {
        self.memory.iter().map(String::as_str)
    }

    /// Number of memory entries.
    pub fn memory_len(&self) -> usize {
        self.memory.len()
    }

    // -------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------

    /// Public view. `tiles_owned` comes from the world's owner index.
    pub fn snapshot(&self, tiles_owned: u32) -> AgentSnapshot {
        AgentSnapshot {
            id: self.id,
            name: self.name.clone(),
            position: self.position,
            hp: self.hp,
            max_hp: self.max_hp,
            energy: self.energy,
            max_energy: self.max_energy,
            coins: self.coins,
            upgrades: self.upgrades,
            alive: self.alive,
            respawn_tick: self.respawn_tick,
            tiles_owned,
            kills: self.kills,
            deaths: self.deaths,
        }
    }
}
