//! The tick cycle, split around the decision phase.
//!
//! Each tick runs through these phases:
//!
//! 1. **Respawn** -- dead agents whose timer ran out return on a free tile.
//! 2. **Income** -- owned land pays energy.
//! 3. **Spawn** -- maybe place a new resource node.
//! 4. **Absorb** -- nodes on owned land feed their owners.
//! 5. **Perception** -- build one context per live agent.
//! 6. **Decision** -- run by the engine without holding the state lock.
//! 7. **Resolution** -- order the tick's actions by arrival.
//! 8. **Processing** -- apply the actions one by one.
//! 9. **Effects** -- traps and interactives for agents that moved.
//! 10. **Despawn** -- sweep expired drops and exhausted nodes.
//! 11. **Delta** -- collect everything that changed.
//! 12. **Win check** -- at the tick limit the leader wins.
//!
//! [`begin_tick`] covers phases 1-5 and [`finish_tick`] phases 8-12; both
//! are synchronous and run under the engine's write lock.

use frontier_agents::{ActionProcessor, ProcessingState};
use frontier_types::{
    ActionRequest, AgentContext, AgentId, DeltaChanges, DeltaKind, GameStatus, TickDelta,
    WorldObject,
};
use tracing::{debug, info};

use crate::effects;
use crate::economy;
use crate::perception;
use crate::respawn;
use crate::spawning;
use crate::state::{GameState, is_hidden};

/// Output of the phases that run before decisions are collected.
#[derive(Debug, Clone)]
pub struct PreparedTick {
    /// The tick being run.
    pub tick: u64,
    /// One context per live agent.
    pub contexts: Vec<AgentContext>,
    /// Agents that came back this tick.
    pub respawned: Vec<AgentId>,
}

/// Advance the tick counter and run the pre-decision phases.
pub fn begin_tick(state: &mut GameState) -> PreparedTick {
    state.tick = state.tick.saturating_add(1);
    let tick = state.tick;

    let respawned = respawn::respawn_due(state);
    economy::pay_income(state);
    if spawning::spawn_resources(state) {
        debug!(tick, "resource node spawned");
    }
    economy::absorb_resources(state);
    let contexts = perception::build_contexts(state);

    debug!(
        tick,
        agents = contexts.len(),
        respawned = respawned.len(),
        "tick prepared"
    );
    PreparedTick {
        tick,
        contexts,
        respawned,
    }
}

/// Output of the phases that run after decisions are collected.
#[derive(Debug, Clone)]
pub struct FinishedTick {
    /// The public delta, safe for every observer.
    pub delta: TickDelta,
    /// Hidden structures placed this tick; each goes only to its owner.
    pub hidden_added: Vec<WorldObject>,
}

/// Apply the ordered actions, run the derived effects, and produce the
/// public delta. Finishes the game when the tick limit is reached.
pub fn finish_tick(
    state: &mut GameState,
    processor: &ActionProcessor,
    actions: &[ActionRequest],
    respawned: Vec<AgentId>,
) -> FinishedTick {
    let tick = state.tick;

    let outcome = {
        let mut processing = ProcessingState {
            world: &mut state.world,
            objects: &mut state.objects,
            agents: &mut state.agents,
            items: Some(state.catalogs.items.as_ref()),
            recipes: Some(state.catalogs.recipes.as_ref()),
            balance: &state.balance,
        };
        processor.process_all(actions, tick, &mut processing)
    };

    let effect_results = effects::apply_move_effects(state, &outcome.moved);
    spawning::despawn(state);
    state.post_messages(&outcome.messages);

    let finished = tick >= state.config.max_ticks;
    if finished {
        state.status = GameStatus::Finished;
        state.winner = state.leader();
        info!(
            game_id = %state.game_id,
            tick,
            winner = ?state.winner,
            "game finished"
        );
    }

    let object_changes = state.objects.take_changes();
    let (hidden_added, objects_added): (Vec<_>, Vec<_>) =
        object_changes.added.into_iter().partition(is_hidden);
    let mut results = outcome.results;
    results.extend(effect_results);

    let delta = TickDelta {
        kind: if finished {
            DeltaKind::GameOver
        } else {
            DeltaKind::Tick
        },
        tick,
        game_id: state.game_id,
        changes: DeltaChanges {
            tiles: state.world.take_changes(),
            agents: state.agent_snapshots(),
            messages: outcome.messages,
            results,
            objects_added,
            objects_removed: object_changes.removed,
            respawned,
            visible_tiles: None,
            player_inventory: None,
        },
        winner: state.winner,
    };
    FinishedTick {
        delta,
        hidden_added,
    }
}

/// The fogged variant of a delta for one player: the tiles they can see
/// now, their private inventory, and their own hidden structures.
///
/// Returns `None` for players no longer in the game.
pub fn player_delta(
    state: &GameState,
    finished: &FinishedTick,
    player: AgentId,
) -> Option<TickDelta> {
    let agent = state.agents.get(&player)?;
    let visible = if agent.alive {
        perception::visible_positions(state, agent).into_iter().collect()
    } else {
        Vec::new()
    };
    let mut delta = finished.delta.clone();
    delta.changes.objects_added.extend(
        finished
            .hidden_added
            .iter()
            .filter(|o| o.owner == Some(player))
            .cloned(),
    );
    delta.changes.visible_tiles = Some(visible);
    delta.changes.player_inventory = Some(agent.inventory.view());
    Some(delta)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use frontier_types::{ActionParameters, ActionType, Direction, Position};

    use super::*;
    use crate::state::testkit::{flat_game, join_at};

    fn run(state: &mut GameState, actions: &[ActionRequest]) -> FinishedTick {
        let prepared = begin_tick(state);
        finish_tick(state, &ActionProcessor::default(), actions, prepared.respawned)
    }

    #[test]
    fn claim_shows_up_in_the_delta() {
        let mut state = flat_game(10, 10);
        state.status = GameStatus::Running;
        let id = join_at(&mut state, "settler", 5, 5);

        let finished = run(&mut state, &[ActionRequest::new(id, 1, ActionParameters::Claim)]);
        let delta = &finished.delta;
        assert_eq!(delta.kind, DeltaKind::Tick);
        assert_eq!(delta.tick, 1);
        assert_eq!(delta.changes.tiles.len(), 5);
        assert!(delta.changes.tiles.iter().all(|t| t.owner_id == Some(id)));
        assert_eq!(delta.changes.agents[0].tiles_owned, 5);
        assert!(delta.changes.results[0].success);
    }

    #[test]
    fn traps_reach_only_their_owner() {
        let mut state = flat_game(10, 10);
        state.status = GameStatus::Running;
        let owner = join_at(&mut state, "owner", 5, 5);
        let other = join_at(&mut state, "other", 1, 1);
        let trap = state.catalogs.items.get("trap").cloned().unwrap();
        let _ = state.agents.get_mut(&owner).unwrap().inventory.add_item(&trap, 1);

        let use_trap = ActionRequest::new(
            owner,
            1,
            ActionParameters::Use {
                item_id: "trap".to_owned(),
            },
        );
        let finished = run(&mut state, &[use_trap]);
        assert!(finished.delta.changes.results[0].success);
        assert!(finished.delta.changes.objects_added.is_empty());
        assert_eq!(finished.hidden_added.len(), 1);

        let mine = player_delta(&state, &finished, owner).unwrap();
        assert_eq!(mine.changes.objects_added.len(), 1);
        assert!(mine.changes.player_inventory.is_some());
        assert!(mine.changes.visible_tiles.is_some_and(|v| !v.is_empty()));

        let theirs = player_delta(&state, &finished, other).unwrap();
        assert!(theirs.changes.objects_added.is_empty());
    }

    #[test]
    fn walking_into_a_trap_is_reported_after_the_move() {
        let mut state = flat_game(10, 10);
        state.status = GameStatus::Running;
        let owner = join_at(&mut state, "owner", 0, 0);
        let walker = join_at(&mut state, "walker", 4, 4);
        state
            .objects
            .insert(WorldObject::new(
                Position::new(5, 4),
                Some(owner),
                frontier_types::ObjectKind::Structure(frontier_types::StructureState {
                    structure_type: frontier_types::StructureType::Trap,
                    hp: 10,
                    max_hp: 10,
                    blocks_movement: false,
                    hidden: true,
                    damage: 30,
                }),
            ))
            .unwrap();
        let _ = state.objects.take_changes();

        let step = ActionRequest::new(
            walker,
            1,
            ActionParameters::Move {
                direction: Direction::East,
            },
        );
        let finished = run(&mut state, &[step]);
        let results = &finished.delta.changes.results;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].action_type, ActionType::Move);
        assert_eq!(results[1].action_type, ActionType::Trap);
        assert_eq!(finished.delta.changes.objects_removed.len(), 1);
        assert_eq!(state.agents.get(&walker).unwrap().hp, 70);
    }

    #[test]
    fn messages_arrive_the_tick_after_they_are_sent() {
        let mut state = flat_game(10, 10);
        state.status = GameStatus::Running;
        let sender = join_at(&mut state, "sender", 1, 1);
        let reader = join_at(&mut state, "reader", 8, 8);

        let say = ActionRequest::new(
            sender,
            1,
            ActionParameters::Message {
                target_id: Some(reader),
                text: "hello".to_owned(),
            },
        );
        let finished = run(&mut state, &[say]);
        assert_eq!(finished.delta.changes.messages.len(), 1);

        let prepared = begin_tick(&mut state);
        let context = prepared
            .contexts
            .iter()
            .find(|c| c.self_state.id == reader)
            .unwrap();
        assert_eq!(context.inbound_messages.len(), 1);
        assert_eq!(context.inbound_messages[0].text, "hello");
    }

    #[test]
    fn tick_limit_ends_the_game_with_the_leader() {
        let mut state = flat_game(10, 10);
        state.status = GameStatus::Running;
        state.config.max_ticks = 2;
        let a = join_at(&mut state, "a", 2, 2);
        let b = join_at(&mut state, "b", 7, 7);

        let first = run(&mut state, &[ActionRequest::new(b, 1, ActionParameters::Claim)]);
        assert_eq!(first.delta.kind, DeltaKind::Tick);
        assert_eq!(state.status, GameStatus::Running);

        let last = run(&mut state, &[ActionRequest::wait(a, 2)]);
        assert_eq!(last.delta.kind, DeltaKind::GameOver);
        assert_eq!(last.delta.winner, Some(b));
        assert_eq!(state.status, GameStatus::Finished);
        assert_eq!(state.winner, Some(b));
    }
}
