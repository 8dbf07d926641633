//! Error types for the `frontier-agents` crate.
//!
//! All operations that can fail return typed errors rather than panicking.
//! [`ActionError`] is special: its display strings are the exact failure
//! messages reported in [`ActionResult`]s, so handlers never format failure
//! text by hand.
//!
//! [`ActionResult`]: frontier_types::ActionResult

use std::path::PathBuf;

use frontier_types::{ActionType, AgentId, EquipmentSlot};
use frontier_world::WorldError;

/// Errors from inventory slot operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InventoryError {
    /// Tried to remove more units than are held.
    #[error("insufficient quantity: wanted {requested} of {item_id} but only have {available}")]
    InsufficientQuantity {
        /// The item definition.
        item_id: String,
        /// Units requested.
        requested: u32,
        /// Units held.
        available: u32,
    },

    /// No room for the item.
    #[error("inventory full")]
    Full,

    /// The item id is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// The item's category has no equipment slot.
    #[error("item cannot be equipped: {0}")]
    NotEquippable(String),

    /// The equipment slot is empty.
    #[error("nothing equipped in slot {0:?}")]
    NothingEquipped(EquipmentSlot),
}

/// Errors from agent state operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// The agent cannot afford an energy cost.
    #[error("not enough energy: need {required}, have {available}")]
    NotEnoughEnergy {
        /// Energy required.
        required: u32,
        /// Energy held.
        available: u32,
    },
}

/// Errors from loading item and recipe catalogs.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The catalog is not valid JSON for its record type.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two records share an id.
    #[error("duplicate catalog id: {0}")]
    Duplicate(String),

    /// A record has an unusable value.
    #[error("invalid catalog entry {id}: {reason}")]
    Invalid {
        /// Offending record.
        id: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A recipe names an item that is not in the item catalog.
    #[error("recipe {recipe} references unknown item {item}")]
    MissingReference {
        /// Recipe id.
        recipe: String,
        /// Unknown item id.
        item: String,
    },
}

/// Why an action failed. The display string is the result message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    // -- lookup failures ----------------------------------------------------
    /// The acting agent is not in the game.
    #[error("agent not found")]
    AgentNotFound(AgentId),

    /// The acting agent is dead and the action is not a wait.
    #[error("agent is dead")]
    AgentDead,

    /// No handler is registered for the action type.
    #[error("unknown action type: {0}")]
    UnknownActionType(ActionType),

    /// The FIGHT target is not in the game.
    #[error("target not found")]
    TargetNotFound,

    /// The item id is not in the item catalog.
    #[error("unknown item: {0}")]
    UnknownItem(String),

    /// The recipe id is not in the recipe catalog.
    #[error("unknown recipe: {0}")]
    UnknownRecipe(String),

    // -- configuration ------------------------------------------------------
    /// A registry the action needs was not supplied to the processor.
    #[error("system not initialized: {0}")]
    NotInitialized(&'static str),

    /// The parameters do not match the handler's action type.
    #[error("invalid parameters for {0}")]
    InvalidParameters(ActionType),

    /// A grid or registry operation failed underneath the handler.
    #[error("{0}")]
    World(WorldError),

    // -- validation failures ------------------------------------------------
    /// The agent or its destination is off the grid.
    #[error("position out of bounds")]
    OutOfBounds,

    /// MOVE could not take a single step.
    #[error("path blocked")]
    PathBlocked,

    /// FIGHT targeted the attacker.
    #[error("cannot attack yourself")]
    CannotAttackSelf,

    /// FIGHT targeted a dead agent.
    #[error("target is already dead")]
    TargetDead,

    /// FIGHT target is further than one tile away.
    #[error("target is not adjacent")]
    TargetNotAdjacent,

    /// HARVEST on a tile without a resource node.
    #[error("no resource node here")]
    NoResourceNode,

    /// HARVEST on an exhausted node.
    #[error("resource node is depleted")]
    ResourceDepleted,

    /// No room for the item.
    #[error("inventory full")]
    InventoryFull,

    /// PICKUP on a tile without a dropped item.
    #[error("no dropped item here")]
    NoDroppedItem,

    /// The agent does not hold the item.
    #[error("item not in inventory")]
    ItemNotInInventory,

    /// USE on an item that is neither usable nor placeable.
    #[error("item cannot be used")]
    ItemNotUsable,

    /// The agent cannot afford the energy cost.
    #[error("not enough energy")]
    NotEnoughEnergy,

    /// USE tried to place a structure on an occupied tile.
    #[error("a structure already occupies this tile")]
    TileOccupied,

    /// UPGRADE on a maxed track.
    #[error("upgrade already at max level")]
    UpgradeMaxed,

    /// MESSAGE with a blank body.
    #[error("message is empty")]
    EmptyMessage,

    /// MESSAGE body over the length limit.
    #[error("message too long")]
    MessageTooLong,

    /// CRAFT without every ingredient.
    #[error("missing ingredients")]
    MissingIngredients,

    /// EQUIP on an item without an equipment slot.
    #[error("item cannot be equipped")]
    NotEquippable,

    /// UNEQUIP on an empty slot.
    #[error("nothing equipped in that slot")]
    NothingEquipped,

    /// DROP with a zero or excessive quantity.
    #[error("invalid quantity")]
    InvalidQuantity,
}

impl From<InventoryError> for ActionError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::InsufficientQuantity { .. } => Self::ItemNotInInventory,
            InventoryError::Full => Self::InventoryFull,
            InventoryError::UnknownItem(id) => Self::UnknownItem(id),
            InventoryError::NotEquippable(_) => Self::NotEquippable,
            InventoryError::NothingEquipped(_) => Self::NothingEquipped,
        }
    }
}

impl From<WorldError> for ActionError {
    fn from(err: WorldError) -> Self {
        match err {
            WorldError::OutOfBounds(_) => Self::OutOfBounds,
            other => Self::World(other),
        }
    }
}

impl From<AgentError> for ActionError {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::NotEnoughEnergy { .. } => Self::NotEnoughEnergy,
        }
    }
}
