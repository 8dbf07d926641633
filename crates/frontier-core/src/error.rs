//! Error types for the `frontier-core` crate.
//!
//! [`EngineError`] carries the engine-level sentinel errors returned
//! synchronously from [`Engine`] and [`GameManager`] methods. Per-action
//! failures never surface here; they are reported as failed
//! [`ActionResult`]s.
//!
//! [`Engine`]: crate::engine::Engine
//! [`GameManager`]: crate::manager::GameManager
//! [`ActionResult`]: frontier_types::ActionResult

use frontier_types::{AgentId, GameId};
use frontier_world::WorldError;

/// Errors returned from engine and manager operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// The game left the lobby; players can no longer join and it cannot
    /// be started again.
    #[error("game already started")]
    AlreadyStarted,

    /// The lobby holds the maximum number of players.
    #[error("game full")]
    GameFull,

    /// `start` was called on an empty lobby.
    #[error("no agents")]
    NoAgents,

    /// No game with this id is managed.
    #[error("game not found")]
    GameNotFound(GameId),

    /// No agent with this id is in the game.
    #[error("agent not found")]
    AgentNotFound(AgentId),

    /// A tick was requested while the game is not running.
    #[error("game not running")]
    NotRunning,

    /// No free passable tile was left for a new agent.
    #[error("no free spawn position")]
    NoSpawnPosition,

    /// World construction failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Errors that can occur when loading configuration and catalogs.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of its allowed range.
    #[error("invalid config value {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// An item or recipe catalog failed to load.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: frontier_agents::CatalogError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}
