//! CLAIM: take every tile within the claim radius.

use frontier_types::{ActionDetails, ActionResult, ActionType};

use super::{ActionContext, ActionHandler, validate_then};
use crate::error::ActionError;

/// Handler for [`ActionType::Claim`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimHandler;

impl ActionHandler for ClaimHandler {
    fn action_type(&self) -> ActionType {
        ActionType::Claim
    }

    fn validate(&self, ctx: &ActionContext<'_>) -> Result<(), ActionError> {
        let agent = ctx.agent()?;
        if !ctx.world.in_bounds(agent.position) {
            return Err(ActionError::OutOfBounds);
        }
        Ok(())
    }

    fn process(&self, ctx: &mut ActionContext<'_>) -> ActionResult {
        validate_then(self, ctx, |ctx| {
            let agent = ctx.agent()?;
            let (id, center, radius) = (agent.id, agent.position, agent.claim_radius());

            let mut claimed = Vec::new();
            let mut captured = 0_u32;
            for position in ctx.world.positions_within(center, radius) {
                let previous = ctx.world.owner(position);
                if previous == Some(id) {
                    continue;
                }
                ctx.world.set_owner(position, Some(id))?;
                if previous.is_some() {
                    captured = captured.saturating_add(1);
                }
                claimed.push(position);
            }

            if claimed.is_empty() {
                return Ok(ctx.succeed(
                    "all tiles in radius already owned",
                    ActionDetails {
                        captured: Some(0),
                        ..ActionDetails::default()
                    },
                ));
            }

            let reward = captured.saturating_mul(ctx.balance.coins_per_capture);
            let agent = ctx.agent_mut()?;
            agent.coins = agent.coins.saturating_add(reward);

            let count = claimed.len();
            Ok(ctx.succeed(
                format!("claimed {count} tile(s), {captured} captured"),
                ActionDetails {
                    claimed_tiles: claimed,
                    captured: Some(captured),
                    ..ActionDetails::default()
                },
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use frontier_types::{ActionParameters, Position, UpgradeKind};

    use super::*;
    use crate::actions::testkit::Fixture;
    use crate::death::kill_agent;

    #[test]
    fn claims_the_whole_radius() {
        let mut fx = Fixture::new();
        let id = fx.spawn("settler", 10, 10);
        for _ in 0..3 {
            let _ = fx.agent_mut(id).upgrades.raise(UpgradeKind::Claim);
        }
        assert_eq!(fx.agent(id).claim_radius(), 4);

        let result = fx.run(&ClaimHandler, id, ActionParameters::Claim);
        assert!(result.success);
        assert!(result.message.contains("claimed"));
        assert_eq!(fx.world.owner(Position::new(10, 10)), Some(id));
        assert_eq!(fx.world.owner(Position::new(14, 10)), Some(id));
        assert_eq!(fx.world.owner(Position::new(13, 13)), None);
        assert_eq!(
            u32::try_from(result.details.claimed_tiles.len()).ok(),
            Some(fx.world.tile_count(id))
        );
    }

    #[test]
    fn reclaiming_is_a_successful_no_op() {
        let mut fx = Fixture::new();
        let id = fx.spawn("settler", 3, 3);
        assert!(fx.run(&ClaimHandler, id, ActionParameters::Claim).success);
        let before = fx.world.tile_count(id);

        let again = fx.run(&ClaimHandler, id, ActionParameters::Claim);
        assert!(again.success);
        assert_eq!(again.message, "all tiles in radius already owned");
        assert!(again.details.claimed_tiles.is_empty());
        assert_eq!(fx.world.tile_count(id), before);
    }

    #[test]
    fn claim_after_death_reclaims_normally() {
        let mut fx = Fixture::new();
        let id = fx.spawn("settler", 3, 3);
        assert!(fx.run(&ClaimHandler, id, ActionParameters::Claim).success);
        let owned = fx.world.tile_count(id);

        let balance = fx.balance.clone();
        let agent = fx.agents.get_mut(&id);
        assert!(agent.is_some());
        if let Some(agent) = agent {
            kill_agent(agent, &mut fx.world, &mut fx.objects, 1, &balance);
            agent.revive(Position::new(3, 3), &balance);
        }
        assert_eq!(fx.world.tile_count(id), 0);

        let result = fx.run(&ClaimHandler, id, ActionParameters::Claim);
        assert!(result.message.contains("claimed"));
        assert_eq!(fx.world.tile_count(id), owned);
    }

    #[test]
    fn capturing_enemy_tiles_pays_coins() {
        let mut fx = Fixture::new();
        let rival = fx.spawn("rival", 5, 5);
        let id = fx.spawn("raider", 5, 6);
        assert!(fx.run(&ClaimHandler, rival, ActionParameters::Claim).success);

        let result = fx.run(&ClaimHandler, id, ActionParameters::Claim);
        assert_eq!(result.details.captured, Some(2));
        assert_eq!(fx.agent(id).coins, 2 * fx.balance.coins_per_capture);
        assert_eq!(fx.world.owner(Position::new(5, 5)), Some(id));
        assert!(!fx.world.owned_by(rival).contains(&Position::new(5, 6)));
    }

    #[test]
    fn corner_claim_is_clipped_to_the_grid() {
        let mut fx = Fixture::new();
        let id = fx.spawn("settler", 0, 0);
        let result = fx.run(&ClaimHandler, id, ActionParameters::Claim);
        assert!(result.success);
        assert_eq!(fx.world.tile_count(id), 3);
    }
}
