//! Error types for the game server binary.
//!
//! [`AppError`] wraps every failure mode during startup and the game run
//! so that `main` can propagate with `?`.

use frontier_core::{ConfigError, EngineError};

/// Top-level error for the game server binary.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration or catalog loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// Creating or running the game failed.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },

    /// The tracing subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
