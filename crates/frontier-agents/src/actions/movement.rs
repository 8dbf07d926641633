//! MOVE: walk up to the agent's speed in one direction.
//!
//! The walk stops before the first tile that is off the grid, impassable,
//! blocked by a structure, or occupied by a live agent. Dead agents are not
//! obstacles. Zero steps is a failure.

use frontier_types::{ActionDetails, ActionParameters, ActionResult, ActionType, Direction, Position};

use super::{ActionContext, ActionHandler, validate_then};
use crate::error::ActionError;

/// Handler for [`ActionType::Move`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveHandler;

fn direction(ctx: &ActionContext<'_>) -> Result<Direction, ActionError> {
    match &ctx.request.parameters {
        ActionParameters::Move { direction } => Ok(*direction),
        _ => Err(ActionError::InvalidParameters(ActionType::Move)),
    }
}

/// The farthest reachable tile and the steps taken to reach it.
fn plan(ctx: &ActionContext<'_>) -> Result<(Position, u32), ActionError> {
    let direction = direction(ctx)?;
    let agent = ctx.agent()?;
    let mut position = agent.position;
    let mut steps = 0_u32;

    for _ in 0..agent.speed() {
        let next = position.offset(direction, 1);
        if !ctx.world.in_bounds(next) {
            if steps == 0 {
                return Err(ActionError::OutOfBounds);
            }
            break;
        }
        if !ctx.world.is_passable(next)
            || ctx.objects.blocking_structure_at(next)
            || ctx.occupied_by_other(next)
        {
            break;
        }
        position = next;
        steps = steps.saturating_add(1);
    }

    if steps == 0 {
        return Err(ActionError::PathBlocked);
    }
    Ok((position, steps))
}

impl ActionHandler for MoveHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Move
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        plan(ctx).map(|_| ())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let (destination, steps) = plan(ctx)?;
            ctx.agent_mut()?.position = destination;
            Ok(ctx.succeed(
                format!("moved {steps} tile(s) to {destination}"),
                ActionDetails {
                    new_position: Some(destination),
                    steps: Some(steps),
                    ..ActionDetails::default()
                },
            ))
        })
    }
}
