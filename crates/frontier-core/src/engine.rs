//! The per-game engine: lobby, tick loop, and read access.
//!
//! An [`Engine`] owns one [`GameState`] behind a `tokio` [`RwLock`]. A tick
//! takes the write lock for the phases before the decision phase, releases
//! it while decision makers think, and takes it again to apply the
//! results. Observers read snapshots under the read lock at any time.
//!
//! Ticks never overlap: [`Engine::run_tick`] is serialized by an internal
//! mutex, so the background ticker and manual calls cannot interleave.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use frontier_agents::{ActionProcessor, ConflictResolver};
use frontier_types::{AgentId, DeltaChanges, DeltaKind, GameId, GameSnapshot, GameStatus, TickDelta};
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::broadcast::Broadcaster;
use crate::config::{Catalogs, FrontierConfig};
use crate::decision::{DecisionMaker, collect_decisions};
use crate::error::EngineError;
use crate::state::GameState;
use crate::tick::{self, FinishedTick};

/// Drives one game.
pub struct Engine {
    game_id: GameId,
    state: RwLock<GameState>,
    decision_maker: Arc<dyn DecisionMaker>,
    broadcaster: Arc<dyn Broadcaster>,
    processor: ActionProcessor,
    resolver: ConflictResolver,
    tick_guard: Mutex<()>,
    tick_interval: Duration,
    decision_deadline: Duration,
    stop_tx: watch::Sender<bool>,
    ticker: StdMutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("game_id", &self.game_id)
            .field("tick_interval", &self.tick_interval)
            .field("decision_deadline", &self.decision_deadline)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create a game in the lobby.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::World`] when the map cannot be generated.
    pub fn new(
        game_id: GameId,
        config: &FrontierConfig,
        catalogs: Catalogs,
        decision_maker: Arc<dyn DecisionMaker>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Result<Self, EngineError> {
        let state = GameState::new(game_id, config, catalogs)?;
        let (stop_tx, _) = watch::channel(false);
        Ok(Self {
            game_id,
            state: RwLock::new(state),
            decision_maker,
            broadcaster,
            processor: ActionProcessor::default(),
            resolver: ConflictResolver::new(),
            tick_guard: Mutex::new(()),
            tick_interval: config.game.tick_interval(),
            decision_deadline: config.game.decision_deadline(),
            stop_tx,
            ticker: StdMutex::new(None),
        })
    }

    /// Game identifier.
    pub const fn game_id(&self) -> GameId {
        self.game_id
    }

    // -------------------------------------------------------------------
    // Lobby
    // -------------------------------------------------------------------

    /// Add a player to the lobby.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlreadyStarted`], [`EngineError::GameFull`],
    /// or [`EngineError::NoSpawnPosition`].
    pub async fn add_agent(&self, name: &str) -> Result<AgentId, EngineError> {
        self.state.write().await.add_agent(name)
    }

    /// Remove a player at any time. Their tiles become unowned.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AgentNotFound`] for unknown ids.
    pub async fn remove_agent(&self, agent_id: AgentId) -> Result<(), EngineError> {
        self.state.write().await.remove_agent(agent_id).map(|_| ())
    }

    // -------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------

    /// Leave the lobby and start the background ticker.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlreadyStarted`] if the game left the lobby,
    /// or [`EngineError::NoAgents`] if nobody joined.
    pub async fn start(self: &Arc<Self>) -> Result<(), EngineError> {
        self.begin().await?;

        let engine = Arc::clone(self);
        let mut stop_rx = self.stop_tx.subscribe();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(engine.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick completes immediately; the first game
            // tick runs one full interval after start.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = stop_rx.changed() => break,
                }
                match engine.run_tick().await {
                    Ok(delta) if delta.kind == DeltaKind::GameOver => break,
                    Ok(_) => {}
                    Err(EngineError::NotRunning) => break,
                    Err(err) => {
                        warn!(game_id = %engine.game_id, error = %err, "tick failed");
                        break;
                    }
                }
            }
            debug!(game_id = %engine.game_id, "ticker stopped");
        });
        *self.ticker.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(())
    }

    /// Leave the lobby without a background ticker. Ticks are then driven
    /// by calling [`Engine::run_tick`].
    ///
    /// # Errors
    ///
    /// Same as [`Engine::start`].
    pub async fn begin(&self) -> Result<(), EngineError> {
        let mut state = self.state.write().await;
        if state.status != GameStatus::Lobby {
            return Err(EngineError::AlreadyStarted);
        }
        if state.agents.is_empty() {
            return Err(EngineError::NoAgents);
        }
        state.status = GameStatus::Running;
        info!(
            game_id = %self.game_id,
            agents = state.agents.len(),
            max_ticks = state.config.max_ticks,
            "game started"
        );
        Ok(())
    }

    /// Stop the game. A running game finishes immediately with the current
    /// leader as winner and a final `game_over` delta.
    pub async fn stop(&self) {
        let _ = self.stop_tx.send_replace(true);
        let final_delta = {
            let _tick = self.tick_guard.lock().await;
            let mut state = self.state.write().await;
            let was_running = state.status == GameStatus::Running;
            state.status = GameStatus::Finished;
            was_running.then(|| {
                state.winner = state.leader();
                info!(game_id = %self.game_id, tick = state.tick, winner = ?state.winner, "game stopped");
                TickDelta {
                    kind: DeltaKind::GameOver,
                    tick: state.tick,
                    game_id: self.game_id,
                    changes: DeltaChanges {
                        tiles: state.world.take_changes(),
                        agents: state.agent_snapshots(),
                        ..DeltaChanges::default()
                    },
                    winner: state.winner,
                }
            })
        };
        if let Some(delta) = final_delta {
            self.broadcaster.broadcast(&delta);
        }
        let ticker = self.ticker.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(handle) = ticker {
            if let Err(err) = handle.await {
                warn!(game_id = %self.game_id, error = %err, "ticker task failed");
            }
        }
    }

    /// Run one full tick and broadcast its deltas.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotRunning`] unless the game is running.
    pub async fn run_tick(&self) -> Result<TickDelta, EngineError> {
        let _tick = self.tick_guard.lock().await;

        let prepared = {
            let mut state = self.state.write().await;
            if state.status != GameStatus::Running {
                return Err(EngineError::NotRunning);
            }
            tick::begin_tick(&mut state)
        };

        // No lock is held while decision makers think.
        let requests =
            collect_decisions(&self.decision_maker, prepared.contexts, self.decision_deadline)
                .await;
        self.resolver.add_actions(requests);
        let ordered = self.resolver.resolve();

        let (finished, private) = {
            let mut state = self.state.write().await;
            let finished = tick::finish_tick(&mut state, &self.processor, &ordered, prepared.respawned);
            let private: Vec<(AgentId, TickDelta)> = self
                .broadcaster
                .connected_players()
                .into_iter()
                .filter_map(|player| {
                    tick::player_delta(&state, &finished, player).map(|d| (player, d))
                })
                .collect();
            (finished, private)
        };

        self.deliver(&finished, private);
        Ok(finished.delta)
    }

    fn deliver(&self, finished: &FinishedTick, private: Vec<(AgentId, TickDelta)>) {
        self.broadcaster.broadcast(&finished.delta);
        for (player, delta) in private {
            self.broadcaster.send_to_player(player, &delta);
        }
        debug!(
            game_id = %self.game_id,
            tick = finished.delta.tick,
            results = finished.delta.changes.results.len(),
            "tick broadcast"
        );
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    /// Full state for a spectator (`None`) or one player.
    pub async fn snapshot(&self, viewer: Option<AgentId>) -> GameSnapshot {
        self.state.read().await.snapshot(viewer)
    }

    /// Lifecycle status.
    pub async fn status(&self) -> GameStatus {
        self.state.read().await.status
    }

    /// Current tick.
    pub async fn tick(&self) -> u64 {
        self.state.read().await.tick
    }

    /// Winner, once finished.
    pub async fn winner(&self) -> Option<AgentId> {
        self.state.read().await.winner
    }

    /// Run a closure against the game state under the write lock.
    ///
    /// Intended for tests and tooling that need to arrange exact positions
    /// or inventories.
    pub async fn with_state<R>(&self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut *self.state.write().await)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use frontier_types::{ActionParameters, Position};

    use super::*;
    use crate::broadcast::{ChannelBroadcaster, NullBroadcaster};
    use crate::config::SpawningConfig;
    use crate::decision::{ScriptedDecisionMaker, StubDecisionMaker};

    fn flat_config(max_ticks: u64) -> FrontierConfig {
        let mut config = FrontierConfig::default();
        config.game.width = 12;
        config.game.height = 12;
        config.game.seed = Some(5);
        config.game.max_ticks = max_ticks;
        config.game.tick_interval_ms = 100;
        config.game.decision_margin_ms = 20;
        config.spawning = SpawningConfig {
            forest_pct: 0,
            desert_pct: 0,
            mountain_pct: 0,
            water_pct: 0,
            initial_resources: 0,
            shrines: 0,
            caches: 0,
            portal_pairs: 0,
            obelisks: 0,
            resource_spawn_chance: 0.0,
            ..SpawningConfig::default()
        };
        config
    }

    fn engine(
        max_ticks: u64,
        maker: Arc<dyn DecisionMaker>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Arc<Engine> {
        Arc::new(
            Engine::new(
                GameId::new(),
                &flat_config(max_ticks),
                Catalogs::builtin().unwrap(),
                maker,
                broadcaster,
            )
            .unwrap(),
        )
    }

    #[tokio::test]
    async fn lifecycle_errors() {
        let engine = engine(10, Arc::new(StubDecisionMaker::new()), Arc::new(NullBroadcaster));
        assert_eq!(engine.run_tick().await.unwrap_err(), EngineError::NotRunning);
        assert_eq!(engine.begin().await, Err(EngineError::NoAgents));

        engine.add_agent("solo").await.unwrap();
        engine.begin().await.unwrap();
        assert_eq!(engine.status().await, GameStatus::Running);
        assert_eq!(engine.begin().await, Err(EngineError::AlreadyStarted));
        assert_eq!(
            engine.add_agent("late").await,
            Err(EngineError::AlreadyStarted)
        );
    }

    #[tokio::test]
    async fn scripted_claim_is_broadcast_publicly_and_privately() {
        let maker = Arc::new(ScriptedDecisionMaker::new());
        let broadcaster = Arc::new(ChannelBroadcaster::new(16));
        let mut rx = broadcaster.subscribe();
        let engine = engine(10, maker.clone(), broadcaster.clone());

        let id = engine.add_agent("settler").await.unwrap();
        engine
            .with_state(|state| {
                state.agents.get_mut(&id).unwrap().position = Position::new(6, 6);
            })
            .await;
        broadcaster.connect(id);
        maker.push(id, ActionParameters::Claim);
        engine.begin().await.unwrap();

        let delta = engine.run_tick().await.unwrap();
        assert_eq!(delta.tick, 1);
        assert_eq!(delta.changes.tiles.len(), 5);
        assert!(delta.changes.visible_tiles.is_none());

        let public = rx.recv().await.unwrap();
        assert_eq!(public.recipient, None);
        let private = rx.recv().await.unwrap();
        assert_eq!(private.recipient, Some(id));
        assert!(private.delta.changes.player_inventory.is_some());

        let snapshot = engine.snapshot(Some(id)).await;
        assert_eq!(snapshot.tick, 1);
    }

    #[tokio::test]
    async fn stop_declares_the_leader() {
        let maker = Arc::new(ScriptedDecisionMaker::new());
        let broadcaster = Arc::new(ChannelBroadcaster::new(16));
        let mut rx = broadcaster.subscribe();
        let engine = engine(100, maker.clone(), broadcaster);

        let a = engine.add_agent("a").await.unwrap();
        let b = engine.add_agent("b").await.unwrap();
        maker.push(b, ActionParameters::Claim);
        engine.begin().await.unwrap();
        engine.run_tick().await.unwrap();
        let _tick = rx.recv().await.unwrap();

        engine.stop().await;
        assert_eq!(engine.status().await, GameStatus::Finished);
        assert_eq!(engine.winner().await, Some(b));
        assert_ne!(engine.winner().await, Some(a));

        let last = rx.recv().await.unwrap();
        assert_eq!(last.delta.kind, DeltaKind::GameOver);
        assert_eq!(last.delta.winner, Some(b));
        assert_eq!(engine.run_tick().await.unwrap_err(), EngineError::NotRunning);
    }

    #[tokio::test(start_paused = true)]
    async fn background_ticker_runs_to_the_tick_limit() {
        let engine = engine(3, Arc::new(StubDecisionMaker::new()), Arc::new(NullBroadcaster));
        engine.add_agent("idle").await.unwrap();
        engine.start().await.unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(engine.status().await, GameStatus::Finished);
        assert_eq!(engine.tick().await, 3);

        // Stopping a finished game changes nothing.
        engine.stop().await;
        assert_eq!(engine.tick().await, 3);
    }
}
