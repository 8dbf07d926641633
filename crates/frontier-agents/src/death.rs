//! Death handling.
//!
//! Killing an agent spans three aggregates: the agent itself, the world's
//! ownership index, and the object registry. [`kill_agent`] performs all
//! three mutations in one serial step, so callers (FIGHT, traps) never
//! leave a dead agent holding tiles or items.

use frontier_types::{
    AgentId, DroppedItemState, ItemInstance, ObjectId, ObjectKind, Position, WorldObject,
};
use frontier_world::{World, WorldObjectManager};

use crate::agent::Agent;
use crate::config::BalanceConfig;

/// What happened when an agent died.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeathConsequences {
    /// The agent who died.
    pub agent_id: AgentId,
    /// Where they died.
    pub position: Position,
    /// Tick of death.
    pub tick: u64,
    /// Tick they come back.
    pub respawn_tick: u64,
    /// Tiles that became unowned.
    pub released_tiles: Vec<Position>,
    /// Items that left the inventory.
    pub dropped_items: Vec<ItemInstance>,
    /// Dropped-item objects created at the death position.
    pub dropped_objects: Vec<ObjectId>,
}

/// Kill an agent: HP to zero, respawn scheduled, tiles released, inventory
/// cleared and dropped on the ground where they fell.
pub fn kill_agent(
    agent: &mut Agent,
    world: &mut World,
    objects: &mut WorldObjectManager,
    tick: u64,
    balance: &BalanceConfig,
) -> DeathConsequences {
    agent.kill(tick, balance.respawn_delay_ticks);
    let released_tiles = world.release_all(agent.id);
    let dropped_items = agent.inventory.clear();
    let despawn_tick = tick.saturating_add(balance.dropped_item_ttl_ticks);

    let mut dropped_objects = Vec::with_capacity(dropped_items.len());
    for item in &dropped_items {
        let object = WorldObject::new(
            agent.position,
            None,
            ObjectKind::DroppedItem(DroppedItemState {
                item: item.clone(),
                despawn_tick,
            }),
        );
        match objects.insert(object) {
            Ok(id) => dropped_objects.push(id),
            Err(err) => tracing::warn!(agent_id = %agent.id, error = %err, "failed to drop item"),
        }
    }

    tracing::info!(
        tick,
        agent_id = %agent.id,
        released = released_tiles.len(),
        dropped = dropped_items.len(),
        "agent died"
    );

    DeathConsequences {
        agent_id: agent.id,
        position: agent.position,
        tick,
        respawn_tick: agent.respawn_tick.unwrap_or(tick),
        released_tiles,
        dropped_items,
        dropped_objects,
    }
}
