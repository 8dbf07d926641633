//! PICKUP: collect the dropped item on the agent's tile.
//!
//! Takes as much of the stack as fits. A partial pickup leaves the rest on
//! the ground; a complete one removes the object.

use frontier_types::{ActionDetails, ActionResult, ActionType, ObjectKind};

use super::{ActionContext, ActionHandler, validate_then};
use crate::error::ActionError;

/// Handler for [`ActionType::Pickup`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PickupHandler;

impl ActionHandler for PickupHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Pickup
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let agent = ctx.agent()?;
        let (_, dropped) = ctx
            .objects
            .dropped_item_at(agent.position)
            .ok_or(ActionError::NoDroppedItem)?;
        let def = ctx
            .item_registry()?
            .get(&dropped.item.item_id)
            .ok_or_else(|| ActionError::UnknownItem(dropped.item.item_id.clone()))?;
        if agent.inventory.room_for(def, &dropped.item) == 0 {
            return Err(ActionError::InventoryFull);
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let items = ctx.item_registry()?;
            let position = ctx.agent()?.position;
            let (object_id, dropped) = ctx
                .objects
                .dropped_item_at(position)
                .ok_or(ActionError::NoDroppedItem)?;
            let instance = dropped.item.clone();
            let def = items
                .get(&instance.item_id)
                .ok_or_else(|| ActionError::UnknownItem(instance.item_id.clone()))?;

            let item_id = instance.item_id.clone();
            let offered = instance.quantity;
            let leftover = ctx.agent_mut()?.inventory.add_instance(def, instance);
            let taken = offered.saturating_sub(leftover);

            if leftover == 0 {
                ctx.objects.remove(object_id)?;
            } else if let Some(ObjectKind::DroppedItem(state)) = ctx.objects.kind_mut(object_id) {
                state.item.quantity = leftover;
            }

            Ok(ctx.succeed(
                format!("picked up {taken} {item_id}"),
                ActionDetails {
                    item_id: Some(item_id),
                    quantity: Some(taken),
                    object_id: Some(object_id),
                    ..ActionDetails::default()
                },
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use frontier_types::{
        ActionParameters, DroppedItemState, ItemInstance, Position, WorldObject,
    };

    use super::*;
    use crate::actions::testkit::Fixture;

    fn drop_at(fx: &mut Fixture, x: i32, y: i32, item: &str, quantity: u32) {
        let object = WorldObject::new(
            Position::new(x, y),
            None,
            ObjectKind::DroppedItem(DroppedItemState {
                item: ItemInstance::new(item, quantity),
                despawn_tick: 100,
            }),
        );
        assert!(fx.objects.insert(object).is_ok());
    }

    #[test]
    fn full_pickup_removes_object() {
        let mut fx = Fixture::new();
        let id = fx.spawn("looter", 4, 4);
        drop_at(&mut fx, 4, 4, "stone", 3);

        let result = fx.run(&PickupHandler, id, ActionParameters::Pickup);
        assert!(result.success, "{}", result.message);
        assert_eq!(result.details.quantity, Some(3));
        assert_eq!(fx.agent(id).inventory.count("stone"), 3);
        assert!(fx.objects.dropped_item_at(Position::new(4, 4)).is_none());
    }

    #[test]
    fn partial_pickup_leaves_remainder() {
        let mut fx = Fixture::new();
        let id = fx.spawn("looter", 4, 4);
        let capacity = fx.agent(id).inventory.capacity();
        for _ in 0..capacity {
            fx.give(id, "iron_sword", 1);
        }
        // Free exactly one slot.
        assert!(fx.agent_mut(id).inventory.remove_item("iron_sword", 1).is_ok());
        let max_stack = fx.items.get("iron_sword").map_or(0, |d| d.max_stack);
        assert_eq!(max_stack, 1);
        drop_at(&mut fx, 4, 4, "iron_sword", 3);

        let result = fx.run(&PickupHandler, id, ActionParameters::Pickup);
        assert!(result.success);
        assert_eq!(result.details.quantity, Some(1));
        let left = fx
            .objects
            .dropped_item_at(Position::new(4, 4))
            .map(|(_, d)| d.item.quantity);
        assert_eq!(left, Some(2));
    }

    #[test]
    fn nothing_to_pick_up() {
        let mut fx = Fixture::new();
        let id = fx.spawn("looter", 4, 4);
        let result = fx.run(&PickupHandler, id, ActionParameters::Pickup);
        assert!(!result.success);
        assert_eq!(result.message, "no dropped item here");
    }
}
