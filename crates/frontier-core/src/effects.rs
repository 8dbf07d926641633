//! Derived effects of movement.
//!
//! After every action of the tick has been applied, each agent whose MOVE
//! succeeded is checked against the tile it ended on, in the order the
//! moves were applied:
//!
//! 1. A hidden trap owned by someone else fires: the trap is consumed and
//!    deals its damage, which may kill.
//! 2. A surviving agent then activates the interactive on its tile, if it
//!    auto-activates: shrines heal and go on cooldown, caches hand over
//!    their reward and vanish, portals teleport to a free destination.
//!
//! Every effect is reported as an [`ActionResult`] after the action
//! results of the tick.

use frontier_agents::kill_agent;
use frontier_types::{
    ActionDetails, ActionResult, ActionType, AgentId, InteractiveType, ObjectId, ObjectKind,
    Position, StructureType,
};
use tracing::{debug, info, warn};

use crate::state::GameState;

/// Apply trap and interactive effects for the agents that moved.
pub fn apply_move_effects(state: &mut GameState, moved: &[AgentId]) -> Vec<ActionResult> {
    let mut results = Vec::new();
    for id in moved {
        let Some(position) = state.agents.get(id).filter(|a| a.alive).map(|a| a.position) else {
            continue;
        };
        if let Some(result) = trigger_trap(state, *id, position) {
            results.push(result);
        }
        let still_alive = state.agents.get(id).is_some_and(|a| a.alive);
        if still_alive {
            if let Some(result) = activate_interactive(state, *id, position) {
                results.push(result);
            }
        }
    }
    results
}

fn trigger_trap(state: &mut GameState, agent_id: AgentId, position: Position) -> Option<ActionResult> {
    let tick = state.tick;
    let (trap_id, damage, owner) = state.objects.structure_at(position).and_then(|(o, s)| {
        (s.structure_type == StructureType::Trap && o.owner != Some(agent_id))
            .then_some((o.id, s.damage, o.owner))
    })?;

    if let Err(err) = state.objects.remove(trap_id) {
        warn!(tick, object_id = %trap_id, error = %err, "failed to remove sprung trap");
    }
    let agent = state.agents.get_mut(&agent_id)?;
    let dealt = agent.take_damage(damage);
    agent.remember(
        format!("tick {tick}: stepped on a trap at {position} (-{dealt} hp)"),
        &state.balance,
    );
    let killed = agent.hp == 0;
    if killed {
        kill_agent(agent, &mut state.world, &mut state.objects, tick, &state.balance);
        if let Some(owner) = owner.and_then(|o| state.agents.get_mut(&o)) {
            owner.kills = owner.kills.saturating_add(1);
            owner.coins = owner.coins.saturating_add(state.balance.coins_per_kill);
        }
    }
    info!(tick, agent_id = %agent_id, %position, dealt, killed, "trap sprung");

    let message = if killed {
        format!("stepped on a trap for {dealt} damage and died")
    } else {
        format!("stepped on a trap for {dealt} damage")
    };
    Some(
        ActionResult::success(tick, agent_id, ActionType::Trap, message).with_details(
            ActionDetails {
                damage_dealt: Some(dealt),
                object_id: Some(trap_id),
                target_killed: Some(killed),
                ..ActionDetails::default()
            },
        ),
    )
}

fn activate_interactive(
    state: &mut GameState,
    agent_id: AgentId,
    position: Position,
) -> Option<ActionResult> {
    let (object_id, kind) = state
        .objects
        .interactive_at(position)
        .filter(|(_, i)| i.interactive_type.auto_activates())
        .map(|(id, i)| (id, i.interactive_type))?;
    match kind {
        InteractiveType::Shrine => use_shrine(state, agent_id, object_id),
        InteractiveType::Cache => open_cache(state, agent_id, object_id),
        InteractiveType::Portal => enter_portal(state, agent_id, object_id),
        InteractiveType::Obelisk => None,
    }
}

fn activation(state: &GameState, agent_id: AgentId, message: String, details: ActionDetails) -> ActionResult {
    ActionResult::success(state.tick, agent_id, ActionType::Activate, message).with_details(details)
}

fn activation_failed(state: &GameState, agent_id: AgentId, message: &str) -> ActionResult {
    ActionResult::failure(state.tick, agent_id, ActionType::Activate, message)
}

fn use_shrine(state: &mut GameState, agent_id: AgentId, object_id: ObjectId) -> Option<ActionResult> {
    let tick = state.tick;
    let ready = matches!(
        state.objects.get(object_id).map(|o| &o.kind),
        Some(ObjectKind::Interactive(i)) if i.active && i.cooldown_until <= tick
    );
    if !ready {
        return Some(activation_failed(state, agent_id, "shrine is recharging"));
    }

    let agent = state.agents.get_mut(&agent_id)?;
    let healed = agent.heal(state.balance.shrine_heal);
    let restored = agent.restore_energy(state.balance.shrine_energy);
    agent.remember(
        format!("tick {tick}: prayed at a shrine (+{healed} hp, +{restored} energy)"),
        &state.balance,
    );
    if let Some(ObjectKind::Interactive(shrine)) = state.objects.kind_mut(object_id) {
        shrine.active = false;
        shrine.cooldown_until = tick.saturating_add(state.balance.shrine_cooldown_ticks);
    }
    debug!(tick, agent_id = %agent_id, healed, restored, "shrine used");
    Some(activation(
        state,
        agent_id,
        format!("shrine restored {healed} hp and {restored} energy"),
        ActionDetails {
            object_id: Some(object_id),
            hp_restored: Some(healed),
            energy_restored: Some(restored),
            ..ActionDetails::default()
        },
    ))
}

fn open_cache(state: &mut GameState, agent_id: AgentId, object_id: ObjectId) -> Option<ActionResult> {
    let tick = state.tick;
    let reward = match state.objects.get(object_id).map(|o| &o.kind) {
        Some(ObjectKind::Interactive(i)) => i.reward.clone(),
        _ => None,
    };
    let Some(reward) = reward else {
        // An empty cache just crumbles.
        if let Err(err) = state.objects.remove(object_id) {
            warn!(tick, object_id = %object_id, error = %err, "failed to remove empty cache");
        }
        return Some(activation_failed(state, agent_id, "cache was empty"));
    };
    let items = std::sync::Arc::clone(&state.catalogs.items);
    let Some(def) = items.get(&reward.item_id) else {
        return Some(activation_failed(state, agent_id, "cache holds an unknown item"));
    };

    let agent = state.agents.get_mut(&agent_id)?;
    if agent.inventory.room_for(def, &reward) < reward.quantity {
        return Some(activation_failed(state, agent_id, "inventory full"));
    }
    let quantity = reward.quantity;
    let _ = agent.inventory.add_instance(def, reward);
    agent.remember(
        format!("tick {tick}: found {quantity} {} in a cache", def.name),
        &state.balance,
    );
    if let Err(err) = state.objects.remove(object_id) {
        warn!(tick, object_id = %object_id, error = %err, "failed to remove opened cache");
    }
    debug!(tick, agent_id = %agent_id, item = %def.id, quantity, "cache opened");
    Some(activation(
        state,
        agent_id,
        format!("opened a cache: {quantity} {}", def.name),
        ActionDetails {
            object_id: Some(object_id),
            item_id: Some(def.id.clone()),
            quantity: Some(quantity),
            ..ActionDetails::default()
        },
    ))
}

fn enter_portal(state: &mut GameState, agent_id: AgentId, object_id: ObjectId) -> Option<ActionResult> {
    let destination = match state.objects.get(object_id).map(|o| &o.kind) {
        Some(ObjectKind::Interactive(i)) => i.destination,
        _ => None,
    }?;
    let blocked = !state.world.is_passable(destination)
        || state.objects.blocking_structure_at(destination)
        || state
            .agents
            .values()
            .any(|a| a.alive && a.id != agent_id && a.position == destination);
    if blocked {
        return Some(activation_failed(state, agent_id, "portal exit is blocked"));
    }

    let tick = state.tick;
    let agent = state.agents.get_mut(&agent_id)?;
    agent.position = destination;
    agent.remember(
        format!("tick {tick}: stepped through a portal to {destination}"),
        &state.balance,
    );
    debug!(tick, agent_id = %agent_id, %destination, "portal used");
    Some(activation(
        state,
        agent_id,
        format!("teleported to {destination}"),
        ActionDetails {
            object_id: Some(object_id),
            new_position: Some(destination),
            ..ActionDetails::default()
        },
    ))
}
