//! Game server binary for Frontier.
//!
//! Wires the engine to built-in bots and a log sink and runs one game to
//! completion. A real deployment swaps [`LogBroadcaster`] for a network
//! transport and [`RandomBot`] for remote players; the engine is the same.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `frontier-config.yaml` (or `FRONTIER_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Load the item and recipe catalogs
//! 4. Create a game and fill the lobby with bots
//! 5. Start the ticker and wait for the game to end or Ctrl-C
//! 6. Stop the game and log the result

mod bots;
mod error;
mod log_sink;

use std::path::PathBuf;
use std::sync::Arc;

use frontier_core::config::LoggingConfig;
use frontier_core::{Broadcaster, Catalogs, FrontierConfig, GameManager};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::bots::RandomBot;
use crate::error::AppError;
use crate::log_sink::LogBroadcaster;

/// Application entry point for the game server.
///
/// # Errors
///
/// Returns an error if any initialization step or the game itself fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        width = config.game.width,
        height = config.game.height,
        max_players = config.game.max_players,
        max_ticks = config.game.max_ticks,
        tick_interval_ms = config.game.tick_interval_ms,
        seed = ?config.game.seed,
        "frontier-engine starting"
    );

    // 3. Load catalogs.
    let catalogs = Catalogs::load(&config.catalogs)?;

    // 4. Create the game and its bots.
    let bot_seed = config.game.seed.unwrap_or_else(rand::random);
    let players = config.game.max_players;
    let manager = GameManager::new(config, catalogs);
    let sink = Arc::new(LogBroadcaster::new());
    let engine = manager
        .create_game(Arc::new(RandomBot::new(bot_seed)), Arc::clone(&sink) as Arc<dyn Broadcaster>)
        .await?;
    for n in 1..=players {
        let name = format!("bot-{n}");
        let id = engine.add_agent(&name).await?;
        info!(agent_id = %id, name = %name, "bot joined");
    }

    // 5. Run until the game ends or the operator interrupts.
    engine.start().await?;
    tokio::select! {
        () = sink.finished() => {}
        signal = tokio::signal::ctrl_c() => {
            if let Err(err) = signal {
                warn!(error = %err, "failed to listen for ctrl-c");
            }
            info!(tick = sink.last_tick(), "interrupted, stopping game");
        }
    }

    // 6. Shut down.
    let game_id = engine.game_id();
    manager.remove(game_id).await?;
    let winner = engine.winner().await;
    info!(%game_id, ?winner, ticks = engine.tick().await, "frontier-engine shutdown complete");
    Ok(())
}

/// Load configuration from `FRONTIER_CONFIG` or `frontier-config.yaml`
/// in the working directory. A missing file means defaults.
fn load_config() -> Result<FrontierConfig, AppError> {
    let path = std::env::var("FRONTIER_CONFIG")
        .map_or_else(|_| PathBuf::from("frontier-config.yaml"), PathBuf::from);
    if path.exists() {
        Ok(FrontierConfig::from_file(&path)?)
    } else {
        let mut config = FrontierConfig::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logging(logging: &LoggingConfig) -> Result<(), AppError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| AppError::Logging {
            message: e.to_string(),
        })?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| AppError::Logging {
        message: e.to_string(),
    })
}
