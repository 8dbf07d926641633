//! Tick orchestration, decision collection, and game management for the
//! Frontier territory game.
//!
//! This crate owns the tick cycle that drives a game: respawn, income,
//! spawning, absorption, perception, decision, resolution, processing,
//! effects, despawn, delta, and the win check. It is the only async layer;
//! everything below it is synchronous.
//!
//! # Modules
//!
//! - [`broadcast`] -- [`Broadcaster`] trait and a `tokio` channel sink.
//! - [`config`] -- Configuration loading from `frontier-config.yaml` into
//!   strongly-typed structs.
//! - [`decision`] -- [`DecisionMaker`] trait and deadline-bounded collection.
//! - [`economy`] -- Land income and resource absorption.
//! - [`effects`] -- Traps and interactives triggered by movement.
//! - [`engine`] -- [`Engine`]: one game's lock, lifecycle, and ticker.
//! - [`error`] -- Engine and configuration errors.
//! - [`manager`] -- [`GameManager`]: concurrent games by id.
//! - [`perception`] -- Per-agent context assembly.
//! - [`respawn`] -- Spawn tile selection and respawn timers.
//! - [`spawning`] -- World generation and the resource lifecycle.
//! - [`state`] -- [`GameState`]: everything one game owns.
//! - [`tick`] -- The phases before and after the decision phase.
//!
//! [`Broadcaster`]: broadcast::Broadcaster
//! [`DecisionMaker`]: decision::DecisionMaker
//! [`Engine`]: engine::Engine
//! [`GameManager`]: manager::GameManager
//! [`GameState`]: state::GameState

pub mod broadcast;
pub mod config;
pub mod decision;
pub mod economy;
pub mod effects;
pub mod engine;
pub mod error;
pub mod manager;
pub mod perception;
pub mod respawn;
pub mod spawning;
pub mod state;
pub mod tick;

pub use broadcast::{Broadcaster, ChannelBroadcaster, Envelope, NullBroadcaster};
pub use config::{Catalogs, FrontierConfig};
pub use decision::{DecisionError, DecisionMaker, ScriptedDecisionMaker, StubDecisionMaker};
pub use engine::Engine;
pub use error::{ConfigError, EngineError};
pub use manager::{GameManager, GameSummary};
pub use state::GameState;
