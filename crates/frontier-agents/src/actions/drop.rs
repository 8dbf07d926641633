//! DROP: put items from the inventory on the ground.
//!
//! Dropped units keep their durability and metadata. Units that do not
//! stack together land as separate objects on the same tile.

use frontier_types::{
    ActionDetails, ActionParameters, ActionResult, ActionType, DroppedItemState, ObjectKind,
    WorldObject,
};

use super::{ActionContext, ActionHandler, validate_then};
use crate::error::ActionError;

/// Handler for [`ActionType::Drop`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DropHandler;

fn params<'r>(ctx: &ActionContext<'r>) -> Result<(&'r str, u32), ActionError> {
    match &ctx.request.parameters {
        ActionParameters::Drop { item_id, quantity } => Ok((item_id.as_str(), *quantity)),
        _ => Err(ActionError::InvalidParameters(ActionType::Drop)),
    }
}

impl ActionHandler for DropHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Drop
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let (item_id, quantity) = params(ctx)?;
        if quantity == 0 {
            return Err(ActionError::InvalidQuantity);
        }
        let held = ctx.agent()?.inventory.count(item_id);
        if held == 0 {
            return Err(ActionError::ItemNotInInventory);
        }
        if held < quantity {
            return Err(ActionError::InvalidQuantity);
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let (item_id, quantity) = params(ctx)?;
            let despawn_tick = ctx.tick.saturating_add(ctx.balance.dropped_item_ttl_ticks);
            let agent = ctx.agent_mut()?;
            let position = agent.position;
            let portions = agent.inventory.take_item(item_id, quantity)?;
            let mut object_id = None;
            for item in portions {
                let object = WorldObject::new(
                    position,
                    None,
                    ObjectKind::DroppedItem(DroppedItemState { item, despawn_tick }),
                );
                let id = ctx.objects.insert(object)?;
                if object_id.is_none() {
                    object_id = Some(id);
                }
            }
            Ok(ctx.succeed(
                format!("dropped {quantity} {item_id}"),
                ActionDetails {
                    item_id: Some(item_id.to_owned()),
                    quantity: Some(quantity),
                    object_id,
                    ..ActionDetails::default()
                },
            ))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use frontier_types::{ItemInstance, Position};

    use super::*;
    use crate::actions::pickup::PickupHandler;
    use crate::actions::testkit::Fixture;

    fn drop(item: &str, quantity: u32) -> ActionParameters {
        ActionParameters::Drop {
            item_id: item.to_owned(),
            quantity,
        }
    }

    #[test]
    fn dropped_items_land_on_tile_with_ttl() {
        let mut fx = Fixture::new();
        let id = fx.spawn("litterbug", 7, 7);
        fx.give(id, "stone", 5);

        let result = fx.run(&DropHandler, id, drop("stone", 2));
        assert!(result.success, "{}", result.message);
        assert_eq!(fx.agent(id).inventory.count("stone"), 3);

        let (_, dropped) = fx.objects.dropped_item_at(Position::new(7, 7)).unwrap();
        assert_eq!(dropped.item.quantity, 2);
        assert_eq!(dropped.despawn_tick, fx.tick + fx.balance.dropped_item_ttl_ticks);
    }

    #[test]
    fn dropped_gear_keeps_durability_and_metadata() {
        let mut fx = Fixture::new();
        let id = fx.spawn("smith", 4, 4);
        let def = fx.items.get("iron_sword").cloned().unwrap();
        let mut worn = ItemInstance::new("iron_sword", 1);
        worn.durability = Some(7);
        worn.metadata.insert("maker".to_owned(), "smith".to_owned());
        assert_eq!(fx.agent_mut(id).inventory.add_instance(&def, worn.clone()), 0);

        let dropped = fx.run(&DropHandler, id, drop("iron_sword", 1));
        assert!(dropped.success, "{}", dropped.message);
        let (_, on_ground) = fx.objects.dropped_item_at(Position::new(4, 4)).unwrap();
        assert_eq!(on_ground.item, worn);

        let picked = fx.run(&PickupHandler, id, ActionParameters::Pickup);
        assert!(picked.success, "{}", picked.message);
        let held: Vec<&ItemInstance> = fx.agent(id).inventory.slots().iter().flatten().collect();
        assert_eq!(held, vec![&worn]);
    }

    #[test]
    fn quantity_is_checked() {
        let mut fx = Fixture::new();
        let id = fx.spawn("litterbug", 7, 7);
        assert_eq!(fx.run(&DropHandler, id, drop("stone", 1)).message, "item not in inventory");
        fx.give(id, "stone", 1);
        assert_eq!(fx.run(&DropHandler, id, drop("stone", 0)).message, "invalid quantity");
        assert_eq!(fx.run(&DropHandler, id, drop("stone", 2)).message, "invalid quantity");
        assert!(fx.objects.is_empty());
    }
}
