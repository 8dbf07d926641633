//! Spawn placement and the respawn phase.
//!
//! Agents enter the map on a random free edge tile. A tile is free when it
//! is passable, carries no wall, and no live agent stands on it. When every
//! edge tile is taken, any free tile in the interior will do.

use std::collections::BTreeMap;

use frontier_agents::Agent;
use frontier_types::{AgentId, Position};
use frontier_world::{World, WorldObjectManager};
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::spawning::random_index;
use crate::state::GameState;

fn is_free(
    position: Position,
    world: &World,
    objects: &WorldObjectManager,
    agents: &BTreeMap<AgentId, Agent>,
) -> bool {
    world.is_passable(position)
        && !objects.blocking_structure_at(position)
        && !agents.values().any(|a| a.alive && a.position == position)
}

/// Pick a free spawn tile, preferring the map edge.
pub fn find_spawn_position(
    rng: &mut StdRng,
    world: &World,
    objects: &WorldObjectManager,
    agents: &BTreeMap<AgentId, Agent>,
) -> Option<Position> {
    let edge: Vec<Position> = world
        .edge_positions()
        .into_iter()
        .filter(|p| is_free(*p, world, objects, agents))
        .collect();
    let candidates = if edge.is_empty() {
        world
            .tiles()
            .iter()
            .map(|t| t.position)
            .filter(|p| is_free(*p, world, objects, agents))
            .collect()
    } else {
        edge
    };
    random_index(rng, candidates.len()).and_then(|i| candidates.get(i).copied())
}

/// Bring back every dead agent whose respawn tick has come.
///
/// Returns the ids of the agents that respawned. An agent with no free
/// tile available stays dead and is retried next tick.
pub fn respawn_due(state: &mut GameState) -> Vec<AgentId> {
    let tick = state.tick;
    let due: Vec<AgentId> = state
        .agents
        .values()
        .filter(|a| a.respawn_due(tick))
        .map(|a| a.id)
        .collect();

    let mut respawned = Vec::with_capacity(due.len());
    for id in due {
        let Some(position) =
            find_spawn_position(&mut state.rng, &state.world, &state.objects, &state.agents)
        else {
            warn!(tick, agent_id = %id, "no free tile to respawn on");
            continue;
        };
        if let Some(agent) = state.agents.get_mut(&id) {
            agent.revive(position, &state.balance);
            agent.remember(format!("tick {tick}: respawned at {position}"), &state.balance);
            info!(tick, agent_id = %id, %position, "agent respawned");
            respawned.push(id);
        }
    }
    respawned
}
