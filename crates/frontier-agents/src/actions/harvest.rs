//! HARVEST: take one unit from the resource node on the agent's tile.

use frontier_types::{ActionDetails, ActionResult, ActionType, ObjectKind};

use super::{ActionContext, ActionHandler, validate_then};
use crate::error::ActionError;

/// Handler for [`ActionType::Harvest`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HarvestHandler;

impl ActionHandler for HarvestHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Harvest
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let agent = ctx.agent()?;
        let (_, node) = ctx
            .objects
            .resource_at(agent.position)
            .ok_or(ActionError::NoResourceNode)?;
        if node.remaining == 0 {
            return Err(ActionError::ResourceDepleted);
        }
        let def = ctx
            .item_registry()?
            .get(&node.resource_type)
            .ok_or_else(|| ActionError::UnknownItem(node.resource_type.clone()))?;
        if !agent.inventory.can_fit(def, 1) {
            return Err(ActionError::InventoryFull);
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let items = ctx.item_registry()?;
            let position = ctx.agent()?.position;
            let (node_id, node) = ctx
                .objects
                .resource_at(position)
                .ok_or(ActionError::NoResourceNode)?;
            let resource = node.resource_type.clone();
            let def = items
                .get(&resource)
                .ok_or_else(|| ActionError::UnknownItem(resource.clone()))?;

            if ctx.agent_mut()?.inventory.add_item(def, 1) > 0 {
                return Err(ActionError::InventoryFull);
            }
            let remaining = match ctx.objects.kind_mut(node_id) {
                Some(ObjectKind::Resource(node)) => {
                    node.remaining = node.remaining.saturating_sub(1);
                    node.remaining
                }
                _ => 0,
            };

            Ok(ctx.succeed(
                format!("harvested 1 {resource} ({remaining} left)"),
                ActionDetails {
                    item_id: Some(resource),
                    quantity: Some(1),
                    object_id: Some(node_id),
                    ..ActionDetails::default()
                },
            ))
        })
    }
}
