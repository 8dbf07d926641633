//! Registry of concurrent games.
//!
//! Games are independent: each [`Engine`] owns its own state, lock, and
//! ticker. The manager only maps ids to engines.

use std::collections::BTreeMap;
use std::sync::Arc;

use frontier_types::{GameId, GameStatus};
use tokio::sync::RwLock;
use tracing::info;

use crate::broadcast::Broadcaster;
use crate::config::{Catalogs, FrontierConfig};
use crate::decision::DecisionMaker;
use crate::engine::Engine;
use crate::error::EngineError;

/// Summary row for [`GameManager::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    /// Game identifier.
    pub game_id: GameId,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Current tick.
    pub tick: u64,
}

/// Creates, looks up, and removes games.
#[derive(Debug)]
pub struct GameManager {
    games: RwLock<BTreeMap<GameId, Arc<Engine>>>,
    config: FrontierConfig,
    catalogs: Catalogs,
}

impl GameManager {
    /// A manager whose games all use `config` and `catalogs`.
    pub fn new(config: FrontierConfig, catalogs: Catalogs) -> Self {
        Self {
            games: RwLock::new(BTreeMap::new()),
            config,
            catalogs,
        }
    }

    /// Create a game in the lobby.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::World`] when the map cannot be generated.
    pub async fn create_game(
        &self,
        decision_maker: Arc<dyn DecisionMaker>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Result<Arc<Engine>, EngineError> {
        let game_id = GameId::new();
        let engine = Arc::new(Engine::new(
            game_id,
            &self.config,
            self.catalogs.clone(),
            decision_maker,
            broadcaster,
        )?);
        self.games.write().await.insert(game_id, Arc::clone(&engine));
        info!(%game_id, "game registered");
        Ok(engine)
    }

    /// Look up a game.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] for unknown ids.
    pub async fn get(&self, game_id: GameId) -> Result<Arc<Engine>, EngineError> {
        self.games
            .read()
            .await
            .get(&game_id)
            .cloned()
            .ok_or(EngineError::GameNotFound(game_id))
    }

    /// Stop a game and forget it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::GameNotFound`] for unknown ids.
    pub async fn remove(&self, game_id: GameId) -> Result<(), EngineError> {
        let engine = self
            .games
            .write()
            .await
            .remove(&game_id)
            .ok_or(EngineError::GameNotFound(game_id))?;
        engine.stop().await;
        info!(%game_id, "game removed");
        Ok(())
    }

    /// Every registered game, in id order.
    pub async fn list(&self) -> Vec<GameSummary> {
        let engines: Vec<Arc<Engine>> = self.games.read().await.values().cloned().collect();
        let mut summaries = Vec::with_capacity(engines.len());
        for engine in engines {
            summaries.push(GameSummary {
                game_id: engine.game_id(),
                status: engine.status().await,
                tick: engine.tick().await,
            });
        }
        summaries
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::broadcast::NullBroadcaster;
    use crate::decision::StubDecisionMaker;

    fn manager() -> GameManager {
        let mut config = FrontierConfig::default();
        config.game.width = 10;
        config.game.height = 10;
        config.game.seed = Some(3);
        GameManager::new(config, Catalogs::builtin().unwrap())
    }

    #[tokio::test]
    async fn games_are_independent() {
        let manager = manager();
        let first = manager
            .create_game(Arc::new(StubDecisionMaker::new()), Arc::new(NullBroadcaster))
            .await
            .unwrap();
        let second = manager
            .create_game(Arc::new(StubDecisionMaker::new()), Arc::new(NullBroadcaster))
            .await
            .unwrap();
        assert_ne!(first.game_id(), second.game_id());

        first.add_agent("a").await.unwrap();
        first.begin().await.unwrap();
        first.run_tick().await.unwrap();

        let listed = manager.list().await;
        assert_eq!(listed.len(), 2);
        let row = listed.iter().find(|s| s.game_id == first.game_id()).unwrap();
        assert_eq!(row.status, GameStatus::Running);
        assert_eq!(row.tick, 1);
        assert_eq!(second.status().await, GameStatus::Lobby);
    }

    #[tokio::test]
    async fn removal_stops_and_forgets() {
        let manager = manager();
        let engine = manager
            .create_game(Arc::new(StubDecisionMaker::new()), Arc::new(NullBroadcaster))
            .await
            .unwrap();
        let id = engine.game_id();
        engine.add_agent("a").await.unwrap();
        engine.begin().await.unwrap();

        manager.remove(id).await.unwrap();
        assert_eq!(engine.status().await, GameStatus::Finished);
        assert_eq!(
            manager.get(id).await.unwrap_err(),
            EngineError::GameNotFound(id)
        );
        assert_eq!(manager.remove(id).await, Err(EngineError::GameNotFound(id)));
    }
}
