//! UPGRADE: raise one track by a level for energy.
//!
//! The cost scales with the current level. Memory capacity follows the new
//! level on its own; storage grows the inventory immediately.

use frontier_types::{
    ActionDetails, ActionParameters, ActionResult, ActionType, UpgradeKind, Upgrades,
};

use super::{ActionContext, ActionHandler, validate_then};
use crate::error::ActionError;

/// Handler for [`ActionType::Upgrade`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UpgradeHandler;

fn kind(ctx: &ActionContext<'_>) -> Result<UpgradeKind, ActionError> {
    match &ctx.request.parameters {
        ActionParameters::Upgrade { upgrade } => Ok(*upgrade),
        _ => Err(ActionError::InvalidParameters(ActionType::Upgrade)),
    }
}

impl ActionHandler for UpgradeHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Upgrade
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let kind = kind(ctx)?;
        let agent = ctx.agent()?;
        if agent.upgrades.is_maxed(kind) {
            return Err(ActionError::UpgradeMaxed);
        }
        if agent.energy < agent.upgrade_cost(kind, ctx.balance) {
            return Err(ActionError::NotEnoughEnergy);
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let kind = kind(ctx)?;
            let balance = ctx.balance;
            let agent = ctx.agent_mut()?;
            let cost = agent.upgrade_cost(kind, balance);
            agent.spend_energy(cost)?;
            let level = agent
                .upgrades
                .raise(kind)
                .ok_or(ActionError::UpgradeMaxed)?;
            if kind == UpgradeKind::Storage {
                let slots = agent.inventory_slots(balance);
                agent.inventory.expand(slots);
            }
            Ok(ctx.succeed(
                format!(
                    "{kind:?} upgraded to level {level}/{}",
                    Upgrades::max_level(kind)
                ),
                ActionDetails {
                    new_level: Some(level),
                    energy_spent: Some(cost),
                    ..ActionDetails::default()
                },
            ))
        })
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use crate::actions::testkit::Fixture;

    fn upgrade(kind: UpgradeKind) -> ActionParameters {
        ActionParameters::Upgrade { upgrade: kind }
    }

    #[test]
    fn cost_scales_with_level() {
        let mut fx = Fixture::new();
        let id = fx.spawn("grinder", 0, 0);
        fx.agent_mut(id).energy = 200;

        let first = fx.run(&UpgradeHandler, id, upgrade(UpgradeKind::Vision));
        assert!(first.success, "{}", first.message);
        assert_eq!(first.details.new_level, Some(2));
        assert_eq!(first.details.energy_spent, Some(20));

        let second = fx.run(&UpgradeHandler, id, upgrade(UpgradeKind::Vision));
        assert_eq!(second.details.energy_spent, Some(40));
        assert_eq!(fx.agent(id).energy, 200 - 20 - 40);
        assert_eq!(fx.agent(id).vision_radius(&fx.balance), fx.balance.base_vision + 2);
    }

    #[test]
    fn storage_grows_inventory() {
        let mut fx = Fixture::new();
        let id = fx.spawn("packer", 0, 0);
        let before = fx.agent(id).inventory.capacity();
        let result = fx.run(&UpgradeHandler, id, upgrade(UpgradeKind::Storage));
        assert!(result.success, "{}", result.message);
        let slots = usize::try_from(fx.balance.slots_per_storage_level).unwrap_or(0);
        assert_eq!(fx.agent(id).inventory.capacity(), before + slots);
    }

    #[test]
    fn maxed_track_is_rejected() {
        let mut fx = Fixture::new();
        let id = fx.spawn("runner", 0, 0);
        fx.agent_mut(id).upgrades.speed = 3;
        let energy = fx.agent(id).energy;
        let result = fx.run(&UpgradeHandler, id, upgrade(UpgradeKind::Speed));
        assert_eq!(result.message, "upgrade already at max level");
        assert_eq!(fx.agent(id).energy, energy);
    }

    #[test]
    fn poor_agents_cannot_upgrade() {
        let mut fx = Fixture::new();
        let id = fx.spawn("broke", 0, 0);
        fx.agent_mut(id).energy = 1;
        let result = fx.run(&UpgradeHandler, id, upgrade(UpgradeKind::Claim));
        assert_eq!(result.message, "not enough energy");
        assert_eq!(fx.agent(id).upgrades.claim, 1);
    }
}
