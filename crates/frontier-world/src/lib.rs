//! Tile grid and spatial object registry for the Frontier game.
//!
//! This crate models the physical board: a rectangular grid of tiles with
//! terrain and ownership, and the registry of every non-agent entity placed
//! on it.
//!
//! # Modules
//!
//! - [`error`] -- Error types for grid and registry operations.
//! - [`grid`] -- [`World`]: tiles, terrain, and the owner -> positions index.
//! - [`objects`] -- [`WorldObjectManager`]: structures, resource nodes,
//!   interactives, and dropped items indexed by id and by position.

pub mod error;
pub mod grid;
pub mod objects;

pub use error::WorldError;
pub use grid::World;
pub use objects::{ObjectChanges, WorldObjectManager};
