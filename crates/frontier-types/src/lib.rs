//! Shared type definitions for the Frontier territory game.
//!
//! This crate is the single source of truth for all value types exchanged
//! between the world, the action pipeline, the engine, and observers.
//! Types flow downstream to `TypeScript` via `ts-rs` for the rendering
//! client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for games, agents, and objects
//! - [`geometry`] -- Grid positions and movement directions
//! - [`enums`] -- Enumeration types (actions, upgrades, terrain, items)
//! - [`items`] -- Item definitions, recipes, and item instances
//! - [`world`] -- Tiles and world objects
//! - [`actions`] -- Action request/result types for agent-engine communication
//! - [`agent`] -- Upgrade levels and the public agent snapshot
//! - [`perception`] -- Per-agent context delivered to decision makers
//! - [`delta`] -- Per-tick delta and full-state snapshot payloads

pub mod actions;
pub mod agent;
pub mod delta;
pub mod enums;
pub mod geometry;
pub mod ids;
pub mod items;
pub mod perception;
pub mod world;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionDetails, ActionParameters, ActionRequest, ActionResult};
pub use agent::{AgentSnapshot, Upgrades};
pub use delta::{DeltaChanges, GameSnapshot, TickDelta, TileChange};
pub use enums::{
    ActionType, DeltaKind, EquipmentSlot, GameStatus, InteractiveType, ItemCategory, Rarity,
    StructureType, Terrain, TileStatus, UpgradeKind,
};
pub use geometry::{Direction, ParseDirectionError, Position};
pub use ids::{AgentId, GameId, ObjectId};
pub use items::{Equipment, InventoryView, ItemDefinition, ItemInstance, Recipe};
pub use perception::{AgentContext, ChatMessage, SelfState, VisibleAgent};
pub use world::{
    DroppedItemState, InteractiveState, ObjectKind, ResourceNodeState, StructureState, Tile,
    WorldObject,
};
