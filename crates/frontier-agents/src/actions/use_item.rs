//! USE: consume an item for its effect, or place it as a structure.
//!
//! Consumables heal and restore energy, capped at the maxima. Placeables
//! cost their `energy_cost` and become a structure owned by the agent on
//! the agent's tile; walls block movement and traps are hidden from
//! everyone but their owner.

use frontier_types::{
    ActionDetails, ActionParameters, ActionResult, ActionType, ItemDefinition, ObjectKind,
    StructureState, StructureType, WorldObject,
};

use super::{ActionContext, ActionHandler, validate_then};
use crate::config::BalanceConfig;
use crate::error::ActionError;

/// Handler for [`ActionType::Use`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UseHandler;

fn item_id<'r>(ctx: &ActionContext<'r>) -> Result<&'r str, ActionError> {
    match &ctx.request.parameters {
        ActionParameters::Use { item_id } => Ok(item_id),
        _ => Err(ActionError::InvalidParameters(ActionType::Use)),
    }
}

/// The structure a placeable item turns into.
fn structure_for(def: &ItemDefinition, balance: &BalanceConfig) -> StructureState {
    let structure_type = def.structure_type().unwrap_or(StructureType::Wall);
    let hp = match def.property_u32("structure_hp") {
        0 => balance.default_structure_hp,
        hp => hp,
    };
    StructureState {
        structure_type,
        hp,
        max_hp: hp,
        blocks_movement: structure_type == StructureType::Wall,
        hidden: structure_type == StructureType::Trap,
        damage: def.property_u32("trap_damage"),
    }
}

impl ActionHandler for UseHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Use
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let item_id = item_id(ctx)?;
        let agent = ctx.agent()?;
        if !agent.inventory.has_item(item_id, 1) {
            return Err(ActionError::ItemNotInInventory);
        }
        let def = ctx
            .item_registry()?
            .get(item_id)
            .ok_or_else(|| ActionError::UnknownItem(item_id.to_owned()))?;
        if def.placeable {
            if agent.energy < def.energy_cost {
                return Err(ActionError::NotEnoughEnergy);
            }
            if ctx.objects.structure_at(agent.position).is_some() {
                return Err(ActionError::TileOccupied);
            }
        } else if !def.usable {
            return Err(ActionError::ItemNotUsable);
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let item_id = item_id(ctx)?;
            let def = ctx
                .item_registry()?
                .get(item_id)
                .ok_or_else(|| ActionError::UnknownItem(item_id.to_owned()))?;

            if def.placeable {
                let state = structure_for(def, ctx.balance);
                let structure_type = state.structure_type;
                let agent = ctx.agent_mut()?;
                agent.spend_energy(def.energy_cost)?;
                agent.inventory.remove_item(item_id, 1)?;
                let object = WorldObject::new(
                    agent.position,
                    Some(agent.id),
                    ObjectKind::Structure(state),
                );
                let position = object.position;
                let object_id = ctx.objects.insert(object)?;
                tracing::debug!(agent_id = %ctx.agent_id, %position, ?structure_type, "structure placed");
                return Ok(ctx.succeed(
                    format!("placed {item_id} at {position}"),
                    ActionDetails {
                        item_id: Some(item_id.to_owned()),
                        object_id: Some(object_id),
                        energy_spent: Some(def.energy_cost),
                        ..ActionDetails::default()
                    },
                ));
            }

            let agent = ctx.agent_mut()?;
            agent.inventory.remove_item(item_id, 1)?;
            let hp_restored = agent.heal(def.heal());
            let energy_restored = agent.restore_energy(def.energy());
            Ok(ctx.succeed(
                format!("used {item_id}: +{hp_restored} hp, +{energy_restored} energy"),
                ActionDetails {
                    item_id: Some(item_id.to_owned()),
                    quantity: Some(1),
                    hp_restored: Some(hp_restored),
                    energy_restored: Some(energy_restored),
                    ..ActionDetails::default()
                },
            ))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use frontier_types::Position;

    use super::*;
    use crate::actions::testkit::Fixture;

    fn use_item(id: &str) -> ActionParameters {
        ActionParameters::Use {
            item_id: id.to_owned(),
        }
    }

    #[test]
    fn potion_heals_up_to_max() {
        let mut fx = Fixture::new();
        let id = fx.spawn("drinker", 2, 2);
        fx.give(id, "health_potion", 2);
        fx.agent_mut(id).hp = 80;

        let result = fx.run(&UseHandler, id, use_item("health_potion"));
        assert!(result.success, "{}", result.message);
        assert_eq!(result.details.hp_restored, Some(20));
        assert_eq!(fx.agent(id).hp, fx.agent(id).max_hp);
        assert_eq!(fx.agent(id).inventory.count("health_potion"), 1);
    }

    #[test]
    fn placing_a_wall_creates_blocking_structure() {
        let mut fx = Fixture::new();
        let id = fx.spawn("builder", 6, 6);
        fx.give(id, "wall", 1);
        let energy = fx.agent(id).energy;

        let result = fx.run(&UseHandler, id, use_item("wall"));
        assert!(result.success, "{}", result.message);
        assert_eq!(result.details.energy_spent, Some(10));
        assert_eq!(fx.agent(id).energy, energy - 10);
        assert!(fx.objects.blocking_structure_at(Position::new(6, 6)));
        assert_eq!(fx.agent(id).inventory.count("wall"), 0);

        fx.give(id, "trap", 1);
        let again = fx.run(&UseHandler, id, use_item("trap"));
        assert_eq!(again.message, "a structure already occupies this tile");
    }

    #[test]
    fn traps_are_hidden_from_others() {
        let mut fx = Fixture::new();
        let id = fx.spawn("trapper", 6, 6);
        let other = fx.spawn("victim", 9, 9);
        fx.give(id, "trap", 1);
        let result = fx.run(&UseHandler, id, use_item("trap"));
        assert!(result.success);

        let (object, state) = fx.objects.structure_at(Position::new(6, 6)).unwrap();
        assert_eq!(state.damage, 30);
        assert!(object.is_hidden_from(other));
        assert!(!object.is_hidden_from(id));
    }

    #[test]
    fn failures_leave_inventory_alone() {
        let mut fx = Fixture::new();
        let id = fx.spawn("user", 1, 1);
        assert_eq!(
            fx.run(&UseHandler, id, use_item("health_potion")).message,
            "item not in inventory"
        );

        fx.give(id, "wood", 1);
        assert_eq!(fx.run(&UseHandler, id, use_item("wood")).message, "item cannot be used");
        assert_eq!(fx.agent(id).inventory.count("wood"), 1);

        fx.give(id, "beacon", 1);
        fx.agent_mut(id).energy = 5;
        assert_eq!(fx.run(&UseHandler, id, use_item("beacon")).message, "not enough energy");
        assert_eq!(fx.agent(id).inventory.count("beacon"), 1);
    }
}
