//! MESSAGE: talk to one agent or to everyone.
//!
//! A target that does not exist, or is the sender, turns the message into a
//! broadcast. The sender remembers what they said.

use frontier_types::{ActionDetails, ActionParameters, ActionResult, ActionType, AgentId, ChatMessage};

use super::{ActionContext, ActionHandler, validate_then};
use crate::error::ActionError;

/// Handler for [`ActionType::Message`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageHandler;

fn params<'r>(ctx: &ActionContext<'r>) -> Result<(Option<AgentId>, &'r str), ActionError> {
    match &ctx.request.parameters {
        ActionParameters::Message { target_id, text } => Ok((*target_id, text.as_str())),
        _ => Err(ActionError::InvalidParameters(ActionType::Message)),
    }
}

impl ActionHandler for MessageHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Message
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let (_, text) = params(ctx)?;
        ctx.agent()?;
        if text.trim().is_empty() {
            return Err(ActionError::EmptyMessage);
        }
        if text.chars().count() > ctx.balance.max_message_length {
            return Err(ActionError::MessageTooLong);
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let (target, text) = params(ctx)?;
            let recipient =
                target.filter(|t| *t != ctx.agent_id && ctx.agents.contains_key(t));
            let text = text.trim().to_owned();
            let (tick, balance) = (ctx.tick, ctx.balance);

            let memory = match recipient.and_then(|t| ctx.agents.get(&t)) {
                Some(to) => format!("tick {tick}: told {}: {text}", to.name),
                None => format!("tick {tick}: said to all: {text}"),
            };
            ctx.agent_mut()?.remember(memory, balance);
            ctx.outbox.push(ChatMessage {
                tick,
                from: ctx.agent_id,
                to: recipient,
                text,
            });

            let message = if recipient.is_some() {
                "message sent"
            } else {
                "message broadcast"
            };
            Ok(ctx.succeed(
                message,
                ActionDetails {
                    recipient,
                    ..ActionDetails::default()
                },
            ))
        })
    }
}

#[cfg(test)]
#[allow(clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::actions::testkit::Fixture;

    fn say(target_id: Option<AgentId>, text: &str) -> ActionParameters {
        ActionParameters::Message {
            target_id,
            text: text.to_owned(),
        }
    }

    #[test]
    fn direct_message_reaches_only_target() {
        let mut fx = Fixture::new();
        let alice = fx.spawn("alice", 0, 0);
        let bob = fx.spawn("bob", 5, 5);
        let carol = fx.spawn("carol", 9, 9);

        let result = fx.run(&MessageHandler, alice, say(Some(bob), "truce?"));
        assert!(result.success);
        assert_eq!(result.details.recipient, Some(bob));
        assert_eq!(fx.outbox.len(), 1);
        let sent = &fx.outbox[0];
        assert!(sent.is_for(bob));
        assert!(!sent.is_for(carol));
        assert_eq!(fx.agent(alice).memory_len(), 1);
    }

    #[test]
    fn unknown_or_self_target_broadcasts() {
        let mut fx = Fixture::new();
        let alice = fx.spawn("alice", 0, 0);
        for target in [Some(AgentId::new()), Some(alice), None] {
            let result = fx.run(&MessageHandler, alice, say(target, "hello"));
            assert!(result.success);
            assert_eq!(result.details.recipient, None);
        }
        assert!(fx.outbox.iter().all(|m| m.to.is_none()));
    }

    #[test]
    fn blank_and_oversized_messages_fail() {
        let mut fx = Fixture::new();
        let alice = fx.spawn("alice", 0, 0);
        assert_eq!(fx.run(&MessageHandler, alice, say(None, "   ")).message, "message is empty");

        let long = "x".repeat(fx.balance.max_message_length.saturating_add(1));
        assert_eq!(fx.run(&MessageHandler, alice, say(None, &long)).message, "message too long");
        assert!(fx.outbox.is_empty());
        assert_eq!(fx.agent(alice).memory_len(), 0);
    }
}
