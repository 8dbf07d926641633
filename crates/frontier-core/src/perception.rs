//! Context assembly for the decision phase.
//!
//! Each live agent sees the tiles within its vision radius, plus the area
//! around every beacon it owns. The context carries only what falls inside
//! that area: hidden traps of other players and other players' inventories
//! never leave the engine. Everything seen is added to the agent's explored
//! set, which later bounds the player's fogged snapshot.

use std::collections::BTreeSet;

use frontier_agents::Agent;
use frontier_types::{
    AgentContext, ObjectKind, Position, SelfState, StructureType, VisibleAgent,
};

use crate::state::GameState;

/// Tiles an agent can currently see.
pub fn visible_positions(state: &GameState, agent: &Agent) -> BTreeSet<Position> {
    let mut visible: BTreeSet<Position> = state
        .world
        .positions_within(agent.position, agent.vision_radius(&state.balance))
        .into_iter()
        .collect();
    let beacons = state.objects.iter().filter(|o| {
        o.owner == Some(agent.id)
            && matches!(&o.kind, ObjectKind::Structure(s) if s.structure_type == StructureType::Beacon)
    });
    for beacon in beacons {
        visible.extend(
            state
                .world
                .positions_within(beacon.position, state.balance.base_vision),
        );
    }
    visible
}

fn context_for(state: &GameState, agent: &Agent, visible: &BTreeSet<Position>) -> AgentContext {
    let visible_tiles = visible
        .iter()
        .filter_map(|p| state.world.tile(*p).cloned())
        .collect();
    let visible_objects = state
        .objects
        .iter()
        .filter(|o| visible.contains(&o.position) && !o.is_hidden_from(agent.id))
        .cloned()
        .collect();
    let visible_agents = state
        .agents
        .values()
        .filter(|other| other.id != agent.id && other.alive && visible.contains(&other.position))
        .map(|other| VisibleAgent {
            id: other.id,
            name: other.name.clone(),
            position: other.position,
            hp: other.hp,
        })
        .collect();
    let inbound_messages = state
        .inbox
        .iter()
        .filter(|m| m.is_for(agent.id))
        .cloned()
        .collect();

    AgentContext {
        tick: state.tick,
        max_ticks: state.config.max_ticks,
        world_width: state.world.width(),
        world_height: state.world.height(),
        self_state: SelfState {
            id: agent.id,
            name: agent.name.clone(),
            position: agent.position,
            hp: agent.hp,
            max_hp: agent.max_hp,
            energy: agent.energy,
            max_energy: agent.max_energy,
            coins: agent.coins,
            upgrades: agent.upgrades,
            vision_radius: agent.vision_radius(&state.balance),
            claim_radius: agent.claim_radius(),
            speed: agent.speed(),
            tiles_owned: state.world.tile_count(agent.id),
            inventory: agent.inventory.view(),
        },
        current_tile: state.world.status_for(agent.position, agent.id),
        visible_tiles,
        visible_objects,
        visible_agents,
        inbound_messages,
        memory: agent.memory().map(str::to_owned).collect(),
    }
}

/// Build one context per live agent, in id order, and mark what each
/// agent sees as explored.
pub fn build_contexts(state: &mut GameState) -> Vec<AgentContext> {
    let mut contexts = Vec::new();
    let mut seen = Vec::new();
    for agent in state.agents.values().filter(|a| a.alive) {
        let visible = visible_positions(state, agent);
        contexts.push(context_for(state, agent, &visible));
        seen.push((agent.id, visible));
    }
    for (id, visible) in seen {
        if let Some(agent) = state.agents.get_mut(&id) {
            agent.explored.extend(visible);
        }
    }
    contexts
}
