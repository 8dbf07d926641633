//! FIGHT: melee attack against an adjacent agent.
//!
//! Damage is `strength + weapon bonus − armor bonus`, never below 1. `damage_dealt` reports the HP actually removed. A lethal
//! hit runs the full death transition and pays the attacker a kill bounty.

use frontier_types::{ActionDetails, ActionParameters, ActionResult, ActionType, AgentId};

use super::{ActionContext, ActionHandler, validate_then};
use crate::agent::Agent;
use crate::death::kill_agent;
use crate::error::ActionError;

/// Handler for [`ActionType::Fight`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FightHandler;

fn target_id(ctx: &ActionContext<'_>) -> Result<AgentId, ActionError> {
    match &ctx.request.parameters {
        ActionParameters::Fight { target_id } => Ok(*target_id),
        _ => Err(ActionError::InvalidParameters(ActionType::Fight)),
    }
}

/// Bonus from equipped items; needs the item catalog only when something
/// is actually equipped.
fn gear_bonus(ctx: &ActionContext<'_>, agent: &Agent, property: &str) -> Result<u32, ActionError> {
    if !agent.inventory.has_equipment() {
        return Ok(0);
    }
    let items = ctx.item_registry()?;
    Ok(agent.inventory.equipment_bonus(items, property))
}

/// Damage the attacker would deal to the target.
pub fn compute_damage(ctx: &ActionContext<'_>, attacker: &Agent, target: &Agent) -> Result<u32, ActionError> {
    let weapon = gear_bonus(ctx, attacker, "damage_bonus")?;
    let armor = gear_bonus(ctx, target, "armor_bonus")?;
    Ok(attacker.strength().saturating_add(weapon).saturating_sub(armor).max(1))
}

impl ActionHandler for FightHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Fight
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let target_id = target_id(ctx)?;
        let attacker = ctx.agent()?;
        if target_id == attacker.id {
            return Err(ActionError::CannotAttackSelf);
        }
        let target = ctx
            .agents
            .get(&target_id)
            .ok_or(ActionError::TargetNotFound)?;
        if target.is_dead() {
            return Err(ActionError::TargetDead);
        }
        if attacker.position.chebyshev_distance(target.position) > 1 {
            return Err(ActionError::TargetNotAdjacent);
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let target_id = target_id(ctx)?;
            let attacker = ctx.agent()?;
            let target = ctx
                .agents
                .get(&target_id)
                .ok_or(ActionError::TargetNotFound)?;
            let damage = compute_damage(ctx, attacker, target)?;
            let attacker_name = attacker.name.clone();
            let (tick, balance) = (ctx.tick, ctx.balance);

            let target = ctx
                .agents
                .get_mut(&target_id)
                .ok_or(ActionError::TargetNotFound)?;
            let dealt = target.take_damage(damage);
            let killed = target.hp == 0;
            let target_name = target.name.clone();
            if killed {
                kill_agent(target, ctx.world, ctx.objects, tick, balance);
                target.remember(format!("tick {tick}: killed by {attacker_name}"), balance);
            } else {
                target.remember(
                    format!("tick {tick}: attacked by {attacker_name} for {dealt}"),
                    balance,
                );
            }

            let attacker = ctx.agent_mut()?;
            if killed {
                attacker.kills = attacker.kills.saturating_add(1);
                attacker.coins = attacker.coins.saturating_add(balance.coins_per_kill);
                attacker.remember(format!("tick {tick}: killed {target_name}"), balance);
            }

            let message = if killed {
                format!("hit {target_name} for {dealt} and killed them")
            } else {
                format!("hit {target_name} for {dealt}")
            };
            Ok(ctx.succeed(
                message,
                ActionDetails {
                    damage_dealt: Some(dealt),
                    target_id: Some(target_id),
                    target_killed: Some(killed),
                    ..ActionDetails::default()
                },
            ))
        })
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use frontier_types::Position;

    use super::*;
    use crate::actions::testkit::Fixture;

    fn fight(target_id: AgentId) -> ActionParameters {
        ActionParameters::Fight { target_id }
    }

    #[test]
    fn lethal_hit_kills_and_releases_territory() {
        let mut fx = Fixture::new();
        let attacker = fx.spawn("attacker", 5, 5);
        let defender = fx.spawn("defender", 6, 5);
        fx.agent_mut(defender).hp = 1;
        fx.give(defender, "wood", 3);
        for p in [Position::new(6, 5), Position::new(7, 5)] {
            assert!(fx.world.set_owner(p, Some(defender)).is_ok());
        }
        assert_eq!(fx.agent(attacker).strength(), 1);

        let result = fx.run(&FightHandler, attacker, fight(defender));
        assert!(result.success);
        assert_eq!(result.details.damage_dealt, Some(1));
        assert_eq!(result.details.target_killed, Some(true));

        let target = fx.agent(defender);
        assert!(target.is_dead());
        assert_eq!(target.hp, 0);
        assert!(target.inventory.is_empty());
        assert_eq!(fx.world.owner(Position::new(6, 5)), None);
        assert_eq!(fx.world.owner(Position::new(7, 5)), None);
        assert_eq!(fx.world.tile_count(defender), 0);
        assert!(fx.objects.dropped_item_at(Position::new(6, 5)).is_some());

        let winner = fx.agent(attacker);
        assert_eq!(winner.kills, 1);
        assert_eq!(winner.coins, fx.balance.coins_per_kill);
    }

    #[test]
    fn bare_handed_hit_deals_strength() {
        let mut fx = Fixture::new();
        let attacker = fx.spawn("attacker", 5, 5);
        let defender = fx.spawn("defender", 6, 6);
        assert_eq!(fx.agent(attacker).strength(), 1);
        let result = fx.run(&FightHandler, attacker, fight(defender));
        assert_eq!(result.details.damage_dealt, Some(1));
        assert_eq!(fx.agent(defender).hp, fx.balance.max_hp - 1);
        assert!(!fx.agent(defender).is_dead());
    }

    #[test]
    fn gear_adjusts_damage_with_floor_of_one() {
        let mut fx = Fixture::new();
        let attacker = fx.spawn("attacker", 5, 5);
        let defender = fx.spawn("defender", 5, 6);
        fx.give(attacker, "wooden_sword", 1);
        let items = fx.items.clone();
        assert!(fx.agent_mut(attacker).inventory.equip("wooden_sword", &items).is_ok());
        let hit = fx.run(&FightHandler, attacker, fight(defender));
        assert_eq!(hit.details.damage_dealt, Some(1 + 5));

        fx.give(defender, "iron_armor", 1);
        assert!(fx.agent_mut(defender).inventory.equip("iron_armor", &items).is_ok());
        let glance = fx.run(&FightHandler, attacker, fight(defender));
        assert_eq!(glance.details.damage_dealt, Some(1));
    }

    #[test]
    fn distinct_failure_messages() {
        let mut fx = Fixture::new();
        let attacker = fx.spawn("attacker", 5, 5);
        let far = fx.spawn("far", 9, 9);
        let dead = fx.spawn("dead", 5, 4);
        fx.agent_mut(dead).kill(0, 5);

        let cases = [
            (attacker, "cannot attack yourself"),
            (AgentId::new(), "target not found"),
            (dead, "target is already dead"),
            (far, "target is not adjacent"),
        ];
        for (target, expected) in cases {
            let result = fx.run(&FightHandler, attacker, fight(target));
            assert!(!result.success);
            assert_eq!(result.message, expected);
        }
    }

    #[test]
    fn gear_without_catalog_is_not_initialized() {
        let mut fx = Fixture::new();
        let attacker = fx.spawn("attacker", 5, 5);
        let defender = fx.spawn("defender", 5, 6);
        fx.give(attacker, "iron_sword", 1);
        let items = fx.items.clone();
        assert!(fx.agent_mut(attacker).inventory.equip("iron_sword", &items).is_ok());
        let result = fx.run_without_catalogs(&FightHandler, attacker, fight(defender));
        assert!(result.message.starts_with("system not initialized"));
        assert_eq!(fx.agent(defender).hp, fx.balance.max_hp);
    }
}
