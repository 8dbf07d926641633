//! Agent state, inventories, catalogs, and the action pipeline for Frontier.
//!
//! This crate is the logic layer for agents -- everything that operates on
//! agent state without touching I/O or async. It sits between
//! `frontier-types` / `frontier-world` (the data and the grid) and
//! `frontier-core` (the tick loop and orchestration).
//!
//! # Modules
//!
//! - [`actions`] -- Handlers, ordering, and sequential application of actions.
//! - [`agent`] -- Agent state, effective stats, vitals, and memory ([`Agent`]).
//! - [`config`] -- Gameplay balance parameters ([`BalanceConfig`]).
//! - [`death`] -- The death transition ([`kill_agent`], [`DeathConsequences`]).
//! - [`error`] -- Error types for agent operations ([`ActionError`] and friends).
//! - [`inventory`] -- Slotted item storage with equipment ([`Inventory`]).
//! - [`items`] -- Item catalog ([`ItemRegistry`]).
//! - [`recipes`] -- Recipe catalog ([`RecipeRegistry`]).

pub mod actions;
pub mod agent;
pub mod config;
pub mod death;
pub mod error;
pub mod inventory;
pub mod items;
pub mod recipes;

// Re-export primary types at crate root for convenience.
pub use actions::{
    ActionContext, ActionHandler, ActionProcessor, ConflictResolver, HandlerRegistry,
    ProcessOutcome, ProcessingState,
};
pub use agent::Agent;
pub use config::{BalanceConfig, UpgradeCosts};
pub use death::{DeathConsequences, kill_agent};
pub use error::{ActionError, AgentError, CatalogError, InventoryError};
pub use inventory::Inventory;
pub use items::ItemRegistry;
pub use recipes::RecipeRegistry;
