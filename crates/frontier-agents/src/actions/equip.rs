//! EQUIP and UNEQUIP: move gear between the inventory and equipment slots.

use frontier_types::{ActionDetails, ActionParameters, ActionResult, ActionType, EquipmentSlot};

use super::{ActionContext, ActionHandler, validate_then};
use crate::error::ActionError;

/// Handler for [`ActionType::Equip`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EquipHandler;

/// Handler for [`ActionType::Unequip`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnequipHandler;

fn equip_item<'r>(ctx: &ActionContext<'r>) -> Result<&'r str, ActionError> {
    match &ctx.request.parameters {
        ActionParameters::Equip { item_id } => Ok(item_id),
        _ => Err(ActionError::InvalidParameters(ActionType::Equip)),
    }
}

fn unequip_slot(ctx: &ActionContext<'_>) -> Result<EquipmentSlot, ActionError> {
    match &ctx.request.parameters {
        ActionParameters::Unequip { slot } => Ok(*slot),
        _ => Err(ActionError::InvalidParameters(ActionType::Unequip)),
    }
}

impl ActionHandler for EquipHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Equip
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let item_id = equip_item(ctx)?;
        if !ctx.agent()?.inventory.has_item(item_id, 1) {
            return Err(ActionError::ItemNotInInventory);
        }
        let def = ctx
            .item_registry()?
            .get(item_id)
            .ok_or_else(|| ActionError::UnknownItem(item_id.to_owned()))?;
        if def.category.equipment_slot().is_none() {
            return Err(ActionError::NotEquippable);
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let item_id = equip_item(ctx)?;
            let items = ctx.item_registry()?;
            let slot = ctx.agent_mut()?.inventory.equip(item_id, items)?;
            Ok(ctx.succeed(
                format!("equipped {item_id} as {slot:?}"),
                ActionDetails {
                    item_id: Some(item_id.to_owned()),
                    ..ActionDetails::default()
                },
            ))
        })
    }
}

impl ActionHandler for UnequipHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Unequip
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let slot = unequip_slot(ctx)?;
        if ctx.agent()?.inventory.equipped(slot).is_none() {
            return Err(ActionError::NothingEquipped);
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let slot = unequip_slot(ctx)?;
            let items = ctx.item_registry()?;
            let removed = ctx.agent_mut()?.inventory.unequip(slot, items)?;
            Ok(ctx.succeed(
                format!("unequipped {}", removed.item_id),
                ActionDetails {
                    item_id: Some(removed.item_id),
                    ..ActionDetails::default()
                },
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testkit::Fixture;

    fn equip(id: &str) -> ActionParameters {
        ActionParameters::Equip {
            item_id: id.to_owned(),
        }
    }

    #[test]
    fn equip_swaps_previous_weapon_back() {
        let mut fx = Fixture::new();
        let id = fx.spawn("knight", 0, 0);
        fx.give(id, "wooden_sword", 1);
        fx.give(id, "iron_sword", 1);

        assert!(fx.run(&EquipHandler, id, equip("wooden_sword")).success);
        let result = fx.run(&EquipHandler, id, equip("iron_sword"));
        assert!(result.success, "{}", result.message);

        let inventory = &fx.agent(id).inventory;
        assert_eq!(
            inventory.equipped(EquipmentSlot::Weapon).map(|i| i.item_id.as_str()),
            Some("iron_sword")
        );
        assert_eq!(inventory.count("wooden_sword"), 1);
        assert_eq!(inventory.count("iron_sword"), 0);
    }

    #[test]
    fn equip_rejects_non_gear() {
        let mut fx = Fixture::new();
        let id = fx.spawn("knight", 0, 0);
        fx.give(id, "wood", 1);
        assert_eq!(fx.run(&EquipHandler, id, equip("wood")).message, "item cannot be equipped");
        assert_eq!(fx.run(&EquipHandler, id, equip("iron_armor")).message, "item not in inventory");
    }

    #[test]
    fn unequip_returns_item_or_reports_empty_slot() {
        let mut fx = Fixture::new();
        let id = fx.spawn("knight", 0, 0);
        let slot = ActionParameters::Unequip {
            slot: EquipmentSlot::Armor,
        };
        assert_eq!(
            fx.run(&UnequipHandler, id, slot.clone()).message,
            "nothing equipped in that slot"
        );

        fx.give(id, "leather_armor", 1);
        assert!(fx.run(&EquipHandler, id, equip("leather_armor")).success);
        let result = fx.run(&UnequipHandler, id, slot);
        assert!(result.success);
        assert_eq!(fx.agent(id).inventory.count("leather_armor"), 1);
        assert!(!fx.agent(id).inventory.has_equipment());
    }

    #[test]
    fn unequip_into_full_inventory_fails() {
        let mut fx = Fixture::new();
        let id = fx.spawn("knight", 0, 0);
        fx.give(id, "lucky_charm", 1);
        assert!(fx.run(&EquipHandler, id, equip("lucky_charm")).success);
        let capacity = fx.agent(id).inventory.capacity();
        for _ in 0..capacity {
            fx.give(id, "iron_sword", 1);
        }
        let result = fx.run(
            &UnequipHandler,
            id,
            ActionParameters::Unequip {
                slot: EquipmentSlot::Trinket,
            },
        );
        assert_eq!(result.message, "inventory full");
        assert!(fx.agent(id).inventory.has_equipment());
    }
}
