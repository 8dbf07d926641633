//! Type tag -> handler lookup.

use std::collections::BTreeMap;

use frontier_types::ActionType;

use super::ActionHandler;
use super::claim::ClaimHandler;
use super::combat::FightHandler;
use super::craft::CraftHandler;
use super::drop::DropHandler;
use super::equip::{EquipHandler, UnequipHandler};
use super::harvest::HarvestHandler;
use super::message::MessageHandler;
use super::movement::MoveHandler;
use super::pickup::PickupHandler;
use super::upgrade::UpgradeHandler;
use super::use_item::UseHandler;
use super::wait::WaitHandler;

/// One handler per action type, owned by a processor.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: BTreeMap<ActionType, Box<dyn ActionHandler>>,
}

impl HandlerRegistry {
    /// An empty registry.
    pub const fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// A registry with every built-in handler.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(MoveHandler);
        registry.register(ClaimHandler);
        registry.register(FightHandler);
        registry.register(HarvestHandler);
        registry.register(PickupHandler);
        registry.register(UseHandler);
        registry.register(UpgradeHandler);
        registry.register(MessageHandler);
        registry.register(WaitHandler);
        registry.register(CraftHandler);
        registry.register(EquipHandler);
        registry.register(UnequipHandler);
        registry.register(DropHandler);
        registry
    }

    /// Register a handler, replacing any previous handler for its tag.
    pub fn register(&mut self, handler: impl ActionHandler + 'static) {
        self.handlers.insert(handler.action_type(), Box::new(handler));
    }

    /// The handler for a tag.
    pub fn get(&self, action_type: ActionType) -> Option<&dyn ActionHandler> {
        self.handlers.get(&action_type).map(Box::as_ref)
    }

    /// Whether a tag has a handler.
    pub fn contains(&self, action_type: ActionType) -> bool {
        self.handlers.contains_key(&action_type)
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl core::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}
