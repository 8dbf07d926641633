//! The mutable state of one game.
//!
//! [`GameState`] bundles every aggregate the tick phases touch: the tile
//! grid, the object registry, the agents, the catalogs, and the game RNG.
//! The engine owns it behind a single lock; phase functions take it by
//! `&mut` and never hold it across an await point.

use std::collections::{BTreeMap, VecDeque};

use frontier_agents::{Agent, BalanceConfig};
use frontier_types::{
    AgentId, AgentSnapshot, ChatMessage, GameId, GameSnapshot, GameStatus, ObjectKind, WorldObject,
};
use frontier_world::{World, WorldObjectManager};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use crate::config::{Catalogs, FrontierConfig, GameConfig, SpawningConfig};
use crate::error::EngineError;
use crate::{respawn, spawning};

/// Messages kept for snapshots.
pub const MESSAGE_HISTORY_LIMIT: usize = 100;

/// Everything one game owns.
#[derive(Debug)]
pub struct GameState {
    /// Game identifier.
    pub game_id: GameId,
    /// Map size, player limit, and timing.
    pub config: GameConfig,
    /// Lifecycle status.
    pub status: GameStatus,
    /// Current tick; 0 until the first tick runs.
    pub tick: u64,
    /// Tile grid.
    pub world: World,
    /// Object registry.
    pub objects: WorldObjectManager,
    /// Agents keyed by id, in join order.
    pub agents: BTreeMap<AgentId, Agent>,
    /// Item and recipe catalogs.
    pub catalogs: Catalogs,
    /// Gameplay balance.
    pub balance: BalanceConfig,
    /// Generation and spawning parameters.
    pub spawning: SpawningConfig,
    /// Game RNG. Seeded from the config when a seed is set.
    pub rng: StdRng,
    /// Messages sent last tick, delivered in this tick's contexts.
    pub inbox: Vec<ChatMessage>,
    /// Recent messages, oldest first.
    pub message_history: VecDeque<ChatMessage>,
    /// Winner, once the game is finished.
    pub winner: Option<AgentId>,
}

impl GameState {
    /// Generate a new game in the lobby.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::World`] when the map cannot be built.
    pub fn new(
        game_id: GameId,
        config: &FrontierConfig,
        catalogs: Catalogs,
    ) -> Result<Self, EngineError> {
        let mut rng = config
            .game
            .seed
            .map_or_else(|| StdRng::from_rng(&mut rand::rng()), StdRng::seed_from_u64);
        let (mut world, mut objects) =
            spawning::generate_world(&mut rng, &config.game, &config.spawning)?;
        // Generation is part of the initial snapshot, not of the first delta.
        let _ = world.take_changes();
        let _ = objects.take_changes();

        info!(
            game_id = %game_id,
            width = config.game.width,
            height = config.game.height,
            seed = ?config.game.seed,
            "game created"
        );

        Ok(Self {
            game_id,
            config: config.game.clone(),
            status: GameStatus::Lobby,
            tick: 0,
            world,
            objects,
            agents: BTreeMap::new(),
            catalogs,
            balance: config.balance.clone(),
            spawning: config.spawning.clone(),
            rng,
            inbox: Vec::new(),
            message_history: VecDeque::new(),
            winner: None,
        })
    }

    /// Add a player to the lobby on a free spawn tile.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AlreadyStarted`] outside the lobby,
    /// [`EngineError::GameFull`] at the player limit, and
    /// [`EngineError::NoSpawnPosition`] when no free tile is left.
    pub fn add_agent(&mut self, name: &str) -> Result<AgentId, EngineError> {
        if self.status != GameStatus::Lobby {
            return Err(EngineError::AlreadyStarted);
        }
        let players = u32::try_from(self.agents.len()).unwrap_or(u32::MAX);
        if players >= self.config.max_players {
            return Err(EngineError::GameFull);
        }
        let position = respawn::find_spawn_position(
            &mut self.rng,
            &self.world,
            &self.objects,
            &self.agents,
        )
        .ok_or(EngineError::NoSpawnPosition)?;

        let agent = Agent::new(name, position, &self.balance);
        let id = agent.id;
        info!(game_id = %self.game_id, agent_id = %id, name, %position, "agent joined");
        self.agents.insert(id, agent);
        Ok(id)
    }

    /// Remove a player, releasing their tiles.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::AgentNotFound`] for unknown ids.
    pub fn remove_agent(&mut self, agent_id: AgentId) -> Result<Agent, EngineError> {
        let agent = self
            .agents
            .remove(&agent_id)
            .ok_or(EngineError::AgentNotFound(agent_id))?;
        let released = self.world.release_all(agent_id);
        info!(
            game_id = %self.game_id,
            agent_id = %agent_id,
            released = released.len(),
            "agent removed"
        );
        Ok(agent)
    }

    /// Record messages sent this tick: they reach their recipients next
    /// tick and stay in the bounded history.
    pub fn post_messages(&mut self, messages: &[ChatMessage]) {
        self.inbox = messages.to_vec();
        self.message_history.extend(messages.iter().cloned());
        while self.message_history.len() > MESSAGE_HISTORY_LIMIT {
            self.message_history.pop_front();
        }
    }

    /// Public snapshots of every agent, in id order.
    pub fn agent_snapshots(&self) -> Vec<AgentSnapshot> {
        self.agents
            .values()
            .map(|a| a.snapshot(self.world.tile_count(a.id)))
            .collect()
    }

    /// The agent owning the most tiles; ties go to the lowest id.
    pub fn leader(&self) -> Option<AgentId> {
        // BTreeMap iterates ascending, so keeping only strictly greater
        // counts leaves the lowest id on a tie.
        let mut best: Option<(AgentId, u32)> = None;
        for id in self.agents.keys() {
            let count = self.world.tile_count(*id);
            if best.is_none_or(|(_, top)| count > top) {
                best = Some((*id, count));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Full state, optionally restricted to what one player may see.
    ///
    /// A player view holds only explored tiles, hides other players' traps,
    /// and carries the player's private inventory. The spectator view
    /// (`None`) shows the whole map but no hidden traps and no inventories.
    pub fn snapshot(&self, viewer: Option<AgentId>) -> GameSnapshot {
        let player = viewer.and_then(|id| self.agents.get(&id));
        let tiles = match player {
            Some(agent) => self
                .world
                .tiles()
                .iter()
                .filter(|t| agent.explored.contains(&t.position))
                .cloned()
                .collect(),
            None => self.world.tiles().to_vec(),
        };
        let objects = match player {
            Some(agent) => self.objects.all_visible_to(agent.id),
            None => self
                .objects
                .iter()
                .filter(|o| !is_hidden(o))
                .cloned()
                .collect(),
        };
        GameSnapshot {
            game_id: self.game_id,
            status: self.status,
            tick: self.tick,
            max_ticks: self.config.max_ticks,
            width: self.world.width(),
            height: self.world.height(),
            tiles,
            agents: self.agent_snapshots(),
            objects,
            messages: self.message_history.iter().cloned().collect(),
            winner: self.winner,
            player_inventory: player.map(|a| a.inventory.view()),
        }
    }
}

/// Whether an object is hidden from everyone but its owner.
pub fn is_hidden(object: &WorldObject) -> bool {
    matches!(&object.kind, ObjectKind::Structure(s) if s.hidden)
}
