//! The action pipeline: handlers, ordering, and application.
//!
//! Every action type is implemented by one [`ActionHandler`]. A
//! [`HandlerRegistry`] resolves type tags to handlers, the
//! [`ConflictResolver`] orders a tick's actions, and the
//! [`ActionProcessor`] applies them one at a time against the game state.
//!
//! # Submodules
//!
//! - [`registry`] -- Tag -> handler lookup ([`HandlerRegistry`]).
//! - [`conflict`] -- Arrival-order resolution ([`ConflictResolver`]).
//! - [`processor`] -- Sequential application ([`ActionProcessor`]).
//! - [`movement`], [`claim`], [`combat`], [`harvest`], [`pickup`],
//!   [`use_item`], [`upgrade`], [`message`], [`wait`], [`craft`],
//!   [`equip`], [`drop`] -- One handler per action type.
//!
//! [`HandlerRegistry`]: registry::HandlerRegistry
//! [`ConflictResolver`]: conflict::ConflictResolver
//! [`ActionProcessor`]: processor::ActionProcessor

use std::collections::BTreeMap;

use frontier_types::{
    ActionDetails, ActionRequest, ActionResult, ActionType, AgentId, ChatMessage,
};
use frontier_world::{World, WorldObjectManager};

use crate::agent::Agent;
use crate::config::BalanceConfig;
use crate::error::ActionError;
use crate::items::ItemRegistry;
use crate::recipes::RecipeRegistry;

pub mod claim;
pub mod combat;
pub mod conflict;
pub mod craft;
pub mod drop;
pub mod equip;
pub mod harvest;
pub mod message;
pub mod movement;
pub mod pickup;
pub mod processor;
pub mod registry;
pub mod upgrade;
pub mod use_item;
pub mod wait;

pub use conflict::ConflictResolver;
pub use processor::{ActionProcessor, ProcessOutcome, ProcessingState};
pub use registry::HandlerRegistry;

/// Everything a handler may read or mutate while applying one action.
pub struct ActionContext<'a> {
    /// The acting agent.
    pub agent_id: AgentId,
    /// The action being applied.
    pub request: &'a ActionRequest,
    /// Current tick.
    pub tick: u64,
    /// Tile grid.
    pub world: &'a mut World,
    /// Object registry.
    pub objects: &'a mut WorldObjectManager,
    /// Every agent in the game.
    pub agents: &'a mut BTreeMap<AgentId, Agent>,
    /// Item catalog, when the game was built with one.
    pub items: Option<&'a ItemRegistry>,
    /// Recipe catalog, when the game was built with one.
    pub recipes: Option<&'a RecipeRegistry>,
    /// Balance parameters.
    pub balance: &'a BalanceConfig,
    /// Messages produced this tick.
    pub outbox: &'a mut Vec<ChatMessage>,
}

impl<'a> ActionContext<'a> {
    /// The acting agent.
    pub fn agent(&self) -> Result<&Agent, ActionError> {
        self.agents
            .get(&self.agent_id)
            .ok_or(ActionError::AgentNotFound(self.agent_id))
    }

    /// The acting agent, mutably.
    pub fn agent_mut(&mut self) -> Result<&mut Agent, ActionError> {
        self.agents
            .get_mut(&self.agent_id)
            .ok_or(ActionError::AgentNotFound(self.agent_id))
    }

    /// The item catalog.
    pub fn item_registry(&self) -> Result<&'a ItemRegistry, ActionError> {
        self.items.ok_or(ActionError::NotInitialized("item registry"))
    }

    /// The recipe catalog.
    pub fn recipe_registry(&self) -> Result<&'a RecipeRegistry, ActionError> {
        self.recipes
            .ok_or(ActionError::NotInitialized("recipe registry"))
    }

    /// Whether a live agent other than the actor stands on the tile.
    pub fn occupied_by_other(&self, position: frontier_types::Position) -> bool {
        self.agents
            .values()
            .any(|a| a.alive && a.id != self.agent_id && a.position == position)
    }

    /// A successful result for this action.
    pub fn succeed(&self, message: impl Into<String>, details: ActionDetails) -> ActionResult {
        ActionResult::success(
            self.tick,
            self.agent_id,
            self.request.action_type(),
            message,
        )
        .with_details(details)
    }

    /// A failed result for this action.
    pub fn fail(&self, err: &ActionError) -> ActionResult {
        ActionResult::failure(
            self.tick,
            self.agent_id,
            self.request.action_type(),
            err.to_string(),
        )
    }
}

/// One implementation per action type.
///
/// `validate` is a pure precondition check. `process` re-validates, then
/// mutates and returns a result; it never panics, and every failure is an
/// [`ActionResult`] with `success: false`.
pub trait ActionHandler: Send + Sync {
    /// The tag this handler serves.
    fn action_type(&self) -> ActionType;

    /// Check preconditions without mutating anything.
    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError>;

    /// Apply the action.
    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult;
}

/// Validate, then apply, folding any error into a failed result.
pub(crate) fn validate_then<H>(
    handler: &H,
    ctx: &mut ActionContext<'_>,
    apply: impl FnOnce(&mut ActionContext<'_>) -> Result<ActionResult, ActionError>,
) -> ActionResult
where
    H: ActionHandler + ?Sized,
{
    match handler.validate(ctx).and_then(|()| apply(ctx)) {
        Ok(result) => result,
        Err(err) => ctx.fail(&err),
    }
}
