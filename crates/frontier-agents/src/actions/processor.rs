//! Sequential application of an ordered action list.
//!
//! The processor is the dispatch point of the state machine: agent lookup,
//! the dead-agent gate, handler lookup, context construction, and the call
//! into [`ActionHandler::process`]. Actions are applied strictly one after
//! another; no two actions ever mutate state concurrently.
//!
//! [`ActionHandler::process`]: super::ActionHandler::process

use std::collections::BTreeMap;

use frontier_types::{ActionRequest, ActionResult, ActionType, AgentId, ChatMessage};
use frontier_world::{World, WorldObjectManager};

use super::registry::HandlerRegistry;
use super::ActionContext;
use crate::agent::Agent;
use crate::config::BalanceConfig;
use crate::error::ActionError;
use crate::items::ItemRegistry;
use crate::recipes::RecipeRegistry;

/// Mutable game state the processor applies actions against.
pub struct ProcessingState<'a> {
    /// Tile grid.
    pub world: &'a mut World,
    /// Object registry.
    pub objects: &'a mut WorldObjectManager,
    /// Every agent in the game.
    pub agents: &'a mut BTreeMap<AgentId, Agent>,
    /// Item catalog.
    pub items: Option<&'a ItemRegistry>,
    /// Recipe catalog.
    pub recipes: Option<&'a RecipeRegistry>,
    /// Balance parameters.
    pub balance: &'a BalanceConfig,
}

/// Results of one processing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// One result per action, in application order.
    pub results: Vec<ActionResult>,
    /// Agents whose MOVE succeeded, in application order.
    pub moved: Vec<AgentId>,
    /// Messages sent.
    pub messages: Vec<ChatMessage>,
}

/// Applies ordered actions through a [`HandlerRegistry`].
#[derive(Debug)]
pub struct ActionProcessor {
    handlers: HandlerRegistry,
}

impl Default for ActionProcessor {
    fn default() -> Self {
        Self::new(HandlerRegistry::with_defaults())
    }
}

impl ActionProcessor {
    /// A processor over the given handlers.
    pub const fn new(handlers: HandlerRegistry) -> Self {
        Self { handlers }
    }

    /// The handler registry.
    pub const fn handlers(&self) -> &HandlerRegistry {
        &self.handlers
    }

    /// Apply `actions` in order.
    pub fn process_all(
        &self,
        actions: &[ActionRequest],
        tick: u64,
        state: &mut ProcessingState<'_>,
    ) -> ProcessOutcome {
        let mut outcome = ProcessOutcome::default();
        for request in actions {
            let result = self.process_one(request, tick, state, &mut outcome.messages);
            tracing::debug!(
                tick,
                agent_id = %request.agent_id,
                action = ?result.action_type,
                success = result.success,
                message = %result.message,
                "action processed"
            );
            if result.success && result.action_type == ActionType::Move {
                outcome.moved.push(request.agent_id);
            }
            outcome.results.push(result);
        }
        outcome
    }

    fn process_one(
        &self,
        request: &ActionRequest,
        tick: u64,
        state: &mut ProcessingState<'_>,
        outbox: &mut Vec<ChatMessage>,
    ) -> ActionResult {
        let action_type = request.action_type();
        let fail = |err: &ActionError| {
            ActionResult::failure(tick, request.agent_id, action_type, err.to_string())
        };

        let Some(agent) = state.agents.get(&request.agent_id) else {
            return fail(&ActionError::AgentNotFound(request.agent_id));
        };
        if agent.is_dead() && action_type != ActionType::Wait {
            return fail(&ActionError::AgentDead);
        }
        let Some(handler) = self.handlers.get(action_type) else {
            return fail(&ActionError::UnknownActionType(action_type));
        };

        let mut ctx = ActionContext {
            agent_id: request.agent_id,
            request,
            tick,
            world: &mut *state.world,
            objects: &mut *state.objects,
            agents: &mut *state.agents,
            items: state.items,
            recipes: state.recipes,
            balance: state.balance,
            outbox,
        };
        handler.process(&mut ctx)
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use frontier_types::{ActionParameters, Direction, Position};

    use super::*;
    use crate::actions::testkit::Fixture;

    fn process(fx: &mut Fixture, processor: &ActionProcessor, actions: &[ActionRequest]) -> ProcessOutcome {
        let mut state = ProcessingState {
            world: &mut fx.world,
            objects: &mut fx.objects,
            agents: &mut fx.agents,
            items: Some(&fx.items),
            recipes: Some(&fx.recipes),
            balance: &fx.balance,
        };
        processor.process_all(actions, fx.tick, &mut state)
    }

    #[test]
    fn unknown_agent_is_reported() {
        let mut fx = Fixture::new();
        let processor = ActionProcessor::default();
        let ghost = ActionRequest::new(AgentId::new(), 1, ActionParameters::Wait);
        let outcome = process(&mut fx, &processor, &[ghost]);
        assert!(!outcome.results[0].success);
        assert_eq!(outcome.results[0].message, "agent not found");
    }

    #[test]
    fn dead_agents_may_only_wait() {
        let mut fx = Fixture::new();
        let id = fx.spawn("ghost", 5, 5);
        fx.agent_mut(id).kill(0, 10);
        let processor = ActionProcessor::default();
        let actions = [
            ActionRequest::new(id, 1, ActionParameters::Claim),
            ActionRequest::new(id, 1, ActionParameters::Wait),
        ];
        let outcome = process(&mut fx, &processor, &actions);
        assert_eq!(outcome.results[0].message, "agent is dead");
        assert!(outcome.results[1].success);
        assert_eq!(fx.world.tile_count(id), 0);
    }

    #[test]
    fn missing_handler_is_unknown_action_type() {
        let mut fx = Fixture::new();
        let id = fx.spawn("a", 1, 1);
        let processor = ActionProcessor::new(HandlerRegistry::new());
        let outcome = process(&mut fx, &processor, &[ActionRequest::new(id, 1, ActionParameters::Harvest)]);
        assert!(outcome.results[0].message.starts_with("unknown action type"));
    }

    #[test]
    fn successful_moves_are_recorded_in_order() {
        let mut fx = Fixture::new();
        let a = fx.spawn("a", 5, 5);
        let b = fx.spawn("b", 0, 0);
        let processor = ActionProcessor::default();
        let actions = [
            ActionRequest::new(b, 1, ActionParameters::Move { direction: Direction::North }),
            ActionRequest::new(a, 1, ActionParameters::Move { direction: Direction::East }),
        ];
        let outcome = process(&mut fx, &processor, &actions);
        assert!(!outcome.results[0].success);
        assert_eq!(outcome.moved, vec![a]);
        assert_eq!(fx.agent(a).position, Position::new(6, 5));
    }

    #[test]
    fn claims_apply_in_resolved_order() {
        let mut fx = Fixture::new();
        let first = fx.spawn("first", 5, 5);
        let second = fx.spawn("second", 6, 5);
        let processor = ActionProcessor::default();
        let actions = [
            ActionRequest::new(first, 1, ActionParameters::Claim),
            ActionRequest::new(second, 1, ActionParameters::Claim),
        ];
        let outcome = process(&mut fx, &processor, &actions);
        assert!(outcome.results.iter().all(|r| r.success));
        // The second claim captures the overlap from the first.
        assert_eq!(fx.world.owner(Position::new(6, 5)), Some(second));
        assert_eq!(fx.world.owner(Position::new(4, 5)), Some(first));
        assert_eq!(outcome.results[1].details.captured, Some(2));
    }
}
