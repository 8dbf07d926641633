//! WAIT: do nothing. Always succeeds, dead or alive.

use frontier_types::{ActionDetails, ActionResult, ActionType};

use super::{ActionContext, ActionHandler};
use crate::error::ActionError;

/// Handler for [`ActionType::Wait`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WaitHandler;

impl ActionHandler for WaitHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Wait
    }

    fn validate(&self, _ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        ctx.succeed("holding position", ActionDetails::default())
    }
}
