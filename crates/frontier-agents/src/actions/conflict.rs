//! Ordering of a tick's actions.
//!
//! Decision tasks hand their actions to the [`ConflictResolver`]
//! concurrently; [`ConflictResolver::resolve`] then produces the single
//! canonical order in which they are applied: arrival time ascending, ties
//! broken by append order. Two agents claiming the same tile in one tick
//! therefore resolve in favor of whichever decision arrived first. The
//! resolver performs no game-state validation.

use std::sync::{Mutex, PoisonError};

use frontier_types::ActionRequest;

/// Buffer of actions submitted during one tick.
#[derive(Debug, Default)]
pub struct ConflictResolver {
    buffer: Mutex<Vec<ActionRequest>>,
}

impl ConflictResolver {
    /// An empty resolver.
    pub const fn new() -> Self {
        Self {
            buffer: Mutex::new(Vec::new()),
        }
    }

    /// Append a batch of actions.
    pub fn add_actions(&self, batch: impl IntoIterator<Item = ActionRequest>) {
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.extend(batch);
    }

    /// Take every buffered action, ordered by `submitted_at` ascending.
    /// Equal timestamps keep their append order. The buffer is left empty.
    pub fn resolve(&self) -> Vec<ActionRequest> {
        let mut actions = {
            let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *buffer)
        };
        // Stable sort: append order survives for equal timestamps.
        actions.sort_by_key(|a| a.submitted_at);
        actions
    }

    /// Number of buffered actions.
    pub fn len(&self) -> usize {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing
)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, TimeZone, Utc};
    use frontier_types::{ActionParameters, AgentId};

    use super::*;

    fn at(agent: AgentId, millis: i64) -> ActionRequest {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        ActionRequest {
            agent_id: agent,
            tick: 1,
            parameters: ActionParameters::Wait,
            submitted_at: base + Duration::milliseconds(millis),
        }
    }

    #[test]
    fn resolve_orders_by_arrival() {
        let resolver = ConflictResolver::new();
        let agents: Vec<AgentId> = (0..4).map(|_| AgentId::new()).collect();
        resolver.add_actions([at(agents[0], 30), at(agents[1], 10)]);
        resolver.add_actions([at(agents[2], 20), at(agents[3], 0)]);

        let order: Vec<AgentId> = resolver.resolve().iter().map(|a| a.agent_id).collect();
        assert_eq!(order, vec![agents[3], agents[1], agents[2], agents[0]]);
    }

    #[test]
    fn ties_keep_append_order() {
        let resolver = ConflictResolver::new();
        let first = AgentId::new();
        let second = AgentId::new();
        let third = AgentId::new();
        resolver.add_actions([at(second, 5), at(first, 5)]);
        resolver.add_actions([at(third, 5)]);

        let order: Vec<AgentId> = resolver.resolve().iter().map(|a| a.agent_id).collect();
        assert_eq!(order, vec![second, first, third]);
    }

    #[test]
    fn resolve_clears_the_buffer() {
        let resolver = ConflictResolver::new();
        resolver.add_actions([at(AgentId::new(), 1)]);
        assert_eq!(resolver.len(), 1);
        assert_eq!(resolver.resolve().len(), 1);
        assert!(resolver.is_empty());
        assert!(resolver.resolve().is_empty());
    }

    #[test]
    fn output_is_non_decreasing_for_any_input() {
        let resolver = ConflictResolver::new();
        let offsets = [17_i64, 3, 99, 42, 3, 0, 64, 8, 8, 51];
        resolver.add_actions(offsets.iter().map(|m| at(AgentId::new(), *m)));
        let resolved = resolver.resolve();
        assert_eq!(resolved.len(), offsets.len());
        assert!(resolved.windows(2).all(|w| w[0].submitted_at <= w[1].submitted_at));
    }

    #[test]
    fn concurrent_submitters_are_all_kept() {
        let resolver = Arc::new(ConflictResolver::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let resolver = Arc::clone(&resolver);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        resolver.add_actions([at(AgentId::new(), i * 100 + j)]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(resolver.resolve().len(), 200);
    }
}
