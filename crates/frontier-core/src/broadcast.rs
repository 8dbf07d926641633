//! Outbound delivery of tick deltas.
//!
//! The engine never talks to sockets. After each tick it hands the public
//! [`TickDelta`] to a [`Broadcaster`], then sends every connected player
//! their fogged variant. A transport (WebSocket server, test harness, log
//! sink) implements the trait.

use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

use frontier_types::{AgentId, TickDelta};
use tokio::sync::broadcast;
use tracing::trace;

/// Default capacity of a [`ChannelBroadcaster`].
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Sink for tick deltas.
pub trait Broadcaster: Send + Sync {
    /// Deliver the public delta to every observer.
    fn broadcast(&self, delta: &TickDelta);

    /// Players that should also receive a private delta.
    fn connected_players(&self) -> Vec<AgentId>;

    /// Deliver a private delta to one player.
    fn send_to_player(&self, player: AgentId, delta: &TickDelta);
}

/// A broadcaster that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullBroadcaster;

impl Broadcaster for NullBroadcaster {
    fn broadcast(&self, _delta: &TickDelta) {}

    fn connected_players(&self) -> Vec<AgentId> {
        Vec::new()
    }

    fn send_to_player(&self, _player: AgentId, _delta: &TickDelta) {}
}

/// One delivery on a [`ChannelBroadcaster`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// `None` for the public delta, otherwise the only intended reader.
    pub recipient: Option<AgentId>,
    /// The payload.
    pub delta: TickDelta,
}

/// Fans deltas out over a `tokio` broadcast channel.
///
/// Every subscriber sees every envelope; a transport forwards public
/// envelopes to all its sockets and private ones only to the matching
/// player's socket. Players are registered with [`connect`] so the engine
/// knows whose private deltas to build.
///
/// [`connect`]: ChannelBroadcaster::connect
#[derive(Debug)]
pub struct ChannelBroadcaster {
    sender: broadcast::Sender<Envelope>,
    players: Mutex<BTreeSet<AgentId>>,
}

impl Default for ChannelBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl ChannelBroadcaster {
    /// A broadcaster whose channel buffers `capacity` envelopes per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            players: Mutex::new(BTreeSet::new()),
        }
    }

    /// A new receiver of every envelope sent from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Envelope> {
        self.sender.subscribe()
    }

    /// Start building private deltas for a player.
    pub fn connect(&self, player: AgentId) {
        self.players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(player);
    }

    /// Stop building private deltas for a player.
    pub fn disconnect(&self, player: AgentId) {
        self.players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&player);
    }

    fn send(&self, envelope: Envelope) {
        // No subscribers is not an error: nobody is watching yet.
        if let Err(err) = self.sender.send(envelope) {
            trace!(tick = err.0.delta.tick, "no subscribers for delta");
        }
    }
}

impl Broadcaster for ChannelBroadcaster {
    fn broadcast(&self, delta: &TickDelta) {
        self.send(Envelope {
            recipient: None,
            delta: delta.clone(),
        });
    }

    fn connected_players(&self) -> Vec<AgentId> {
        self.players
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .copied()
            .collect()
    }

    fn send_to_player(&self, player: AgentId, delta: &TickDelta) {
        self.send(Envelope {
            recipient: Some(player),
            delta: delta.clone(),
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use frontier_types::{DeltaChanges, DeltaKind, GameId};

    use super::*;

    fn delta(tick: u64) -> TickDelta {
        TickDelta {
            kind: DeltaKind::Tick,
            tick,
            game_id: GameId::new(),
            changes: DeltaChanges::default(),
            winner: None,
        }
    }

    #[tokio::test]
    async fn subscribers_receive_public_and_private_envelopes() {
        let broadcaster = ChannelBroadcaster::new(8);
        let mut rx = broadcaster.subscribe();
        let player = AgentId::new();

        broadcaster.broadcast(&delta(1));
        broadcaster.send_to_player(player, &delta(1));

        let public = rx.recv().await.unwrap();
        assert_eq!(public.recipient, None);
        let private = rx.recv().await.unwrap();
        assert_eq!(private.recipient, Some(player));
    }

    #[test]
    fn sending_without_subscribers_is_harmless() {
        let broadcaster = ChannelBroadcaster::default();
        broadcaster.broadcast(&delta(3));
    }

    #[test]
    fn connections_are_tracked() {
        let broadcaster = ChannelBroadcaster::default();
        let a = AgentId::new();
        let b = AgentId::new();
        broadcaster.connect(a);
        broadcaster.connect(b);
        broadcaster.connect(a);
        assert_eq!(broadcaster.connected_players().len(), 2);
        broadcaster.disconnect(a);
        assert_eq!(broadcaster.connected_players(), vec![b]);
        assert!(NullBroadcaster.connected_players().is_empty());
    }
}
