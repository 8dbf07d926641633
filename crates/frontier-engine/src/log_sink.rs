//! Broadcaster that writes deltas to the log.
//!
//! Stands in for a network transport: every tick becomes one `info` line
//! with counts, and the full JSON payload at `trace`. The final delta
//! wakes [`LogBroadcaster::finished`].

use std::sync::atomic::{AtomicU64, Ordering};

use frontier_core::Broadcaster;
use frontier_types::{AgentId, DeltaKind, TickDelta};
use tokio::sync::Notify;
use tracing::{info, trace, warn};

/// Logs every public delta.
#[derive(Debug, Default)]
pub struct LogBroadcaster {
    last_tick: AtomicU64,
    finished: Notify,
}

impl LogBroadcaster {
    /// A sink that has seen nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tick of the last delta seen.
    pub fn last_tick(&self) -> u64 {
        self.last_tick.load(Ordering::Relaxed)
    }

    /// Resolves once a `game_over` delta has been broadcast.
    pub async fn finished(&self) {
        self.finished.notified().await;
    }
}

impl Broadcaster for LogBroadcaster {
    fn broadcast(&self, delta: &TickDelta) {
        self.last_tick.store(delta.tick, Ordering::Relaxed);
        let changes = &delta.changes;
        let alive = changes.agents.iter().filter(|a| a.alive).count();
        info!(
            game_id = %delta.game_id,
            tick = delta.tick,
            tiles_changed = changes.tiles.len(),
            results = changes.results.len(),
            messages = changes.messages.len(),
            alive,
            "tick"
        );
        match serde_json::to_string(delta) {
            Ok(json) => trace!(payload = %json, "delta"),
            Err(err) => warn!(error = %err, "delta did not serialize"),
        }
        if delta.kind == DeltaKind::GameOver {
            let standings: Vec<(String, u32)> = changes
                .agents
                .iter()
                .map(|a| (a.name.clone(), a.tiles_owned))
                .collect();
            info!(tick = delta.tick, winner = ?delta.winner, ?standings, "game over");
            // notify_one stores a permit, so a waiter that arrives late
            // still wakes.
            self.finished.notify_one();
        }
    }

    fn connected_players(&self) -> Vec<AgentId> {
        Vec::new()
    }

    fn send_to_player(&self, _player: AgentId, _delta: &TickDelta) {}
}
