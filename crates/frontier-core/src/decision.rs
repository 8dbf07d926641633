//! Decision makers and the concurrent decision-collection phase.
//!
//! During the decision phase the engine hands each live agent's
//! [`AgentContext`] to a [`DecisionMaker`] and awaits an
//! [`ActionParameters`] in response. The trait abstracts the mechanism --
//! it could be an LLM backend, a scripted bot, a human player behind a
//! socket, or a test stub.
//!
//! [`collect_decisions`] fans out one task per agent and bounds the whole
//! phase by a deadline. A decision that errors, panics, or misses the
//! deadline becomes a `Wait`. Cancellation is soft: a late task is left to
//! finish on its own and its answer is discarded.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use frontier_types::{ActionParameters, ActionRequest, AgentContext, AgentId};
use tracing::{debug, warn};

/// Errors a decision maker may report for one agent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecisionError {
    /// The agent did not respond within the deadline.
    #[error("agent {agent_id} timed out (deadline: {deadline_ms}ms)")]
    Timeout {
        /// The agent that timed out.
        agent_id: AgentId,
        /// The deadline in milliseconds.
        deadline_ms: u64,
    },

    /// The decision task ended without producing an answer.
    #[error("decision task for agent {agent_id} failed: {message}")]
    TaskFailed {
        /// The agent whose task failed.
        agent_id: AgentId,
        /// Description of the failure.
        message: String,
    },

    /// An internal error in the decision maker.
    #[error("decision maker error: {message}")]
    Internal {
        /// Description of the error.
        message: String,
    },
}

/// A source of agent decisions.
#[async_trait]
pub trait DecisionMaker: Send + Sync {
    /// Choose one action for the agent described by `ctx`.
    async fn decide(&self, ctx: &AgentContext) -> Result<ActionParameters, DecisionError>;
}

/// A decision maker that always waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubDecisionMaker;

impl StubDecisionMaker {
    /// Create a new stub decision maker.
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DecisionMaker for StubDecisionMaker {
    async fn decide(&self, _ctx: &AgentContext) -> Result<ActionParameters, DecisionError> {
        Ok(ActionParameters::Wait)
    }
}

/// A decision maker that replays queued actions per agent, then waits.
///
/// Used by tests and demos to drive exact scenarios through the full tick.
#[derive(Debug, Default)]
pub struct ScriptedDecisionMaker {
    queues: Mutex<BTreeMap<AgentId, VecDeque<ActionParameters>>>,
}

impl ScriptedDecisionMaker {
    /// An empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an action for an agent's next unscripted tick.
    pub fn push(&self, agent_id: AgentId, action: ActionParameters) {
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(agent_id)
            .or_default()
            .push_back(action);
    }

    /// Actions still queued for an agent.
    pub fn pending(&self, agent_id: AgentId) -> usize {
        self.queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&agent_id)
            .map_or(0, VecDeque::len)
    }
}

#[async_trait]
impl DecisionMaker for ScriptedDecisionMaker {
    async fn decide(&self, ctx: &AgentContext) -> Result<ActionParameters, DecisionError> {
        let next = self
            .queues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&ctx.self_state.id)
            .and_then(VecDeque::pop_front);
        Ok(next.unwrap_or(ActionParameters::Wait))
    }
}

/// Ask every agent for a decision concurrently, bounded by `deadline`.
///
/// Returns one request per context, in context order. Each request is
/// stamped when its decision arrives, so earlier answers sort first in
/// conflict resolution. No game state is touched here.
pub async fn collect_decisions(
    maker: &Arc<dyn DecisionMaker>,
    contexts: Vec<AgentContext>,
    deadline: Duration,
) -> Vec<ActionRequest> {
    let deadline_at = tokio::time::Instant::now()
        .checked_add(deadline)
        .unwrap_or_else(tokio::time::Instant::now);
    let deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX);

    let pending = contexts.into_iter().map(|ctx| {
        let maker = Arc::clone(maker);
        let agent_id = ctx.self_state.id;
        let tick = ctx.tick;
        let handle = tokio::spawn(async move {
            let decision = maker.decide(&ctx).await;
            decision.map(|params| ActionRequest::new(agent_id, tick, params))
        });
        async move {
            let outcome = match tokio::time::timeout_at(deadline_at, handle).await {
                Ok(Ok(decision)) => decision,
                Ok(Err(join_err)) => Err(DecisionError::TaskFailed {
                    agent_id,
                    message: join_err.to_string(),
                }),
                Err(_elapsed) => Err(DecisionError::Timeout {
                    agent_id,
                    deadline_ms,
                }),
            };
            match outcome {
                Ok(request) => {
                    debug!(tick, agent_id = %agent_id, action = ?request.action_type(), "decision received");
                    request
                }
                Err(err) => {
                    warn!(tick, agent_id = %agent_id, error = %err, "decision failed, defaulting to wait");
                    ActionRequest::wait(agent_id, tick)
                }
            }
        }
    });

    futures::future::join_all(pending).await
}
