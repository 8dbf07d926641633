//! Built-in bots that keep a game moving without external players.
//!
//! A [`RandomBot`] is a [`DecisionMaker`] with a simple priority list:
//! fight an adjacent rival, harvest the node underfoot, claim unowned
//! ground, otherwise wander. It sees only the context it is given.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use frontier_core::{DecisionError, DecisionMaker};
use frontier_types::{ActionParameters, AgentContext, Direction, ObjectKind, TileStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Percent chance that a bot attacks a rival standing next to it.
const AGGRESSION_PCT: u32 = 40;

/// A seeded bot shared by every agent in a game.
#[derive(Debug)]
pub struct RandomBot {
    rng: Mutex<StdRng>,
}

impl RandomBot {
    /// A bot whose choices are reproducible from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn choose(&self, ctx: &AgentContext) -> ActionParameters {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let me = &ctx.self_state;

        let rival = ctx
            .visible_agents
            .iter()
            .find(|a| a.position.chebyshev_distance(me.position) <= 1);
        if let Some(rival) = rival {
            if rng.random_range(0..100) < AGGRESSION_PCT {
                return ActionParameters::Fight {
                    target_id: rival.id,
                };
            }
        }

        let on_resource = ctx.visible_objects.iter().any(|o| {
            o.position == me.position && matches!(o.kind, ObjectKind::Resource(_))
        });
        if on_resource && me.inventory.slots.iter().any(Option::is_none) {
            return ActionParameters::Harvest;
        }

        if ctx.current_tile != TileStatus::OwnedBySelf {
            return ActionParameters::Claim;
        }

        let index = rng.random_range(0..Direction::ALL.len());
        Direction::ALL
            .get(index)
            .map_or(ActionParameters::Wait, |direction| ActionParameters::Move {
                direction: *direction,
            })
    }
}

#[async_trait]
impl DecisionMaker for RandomBot {
    async fn decide(&self, ctx: &AgentContext) -> Result<ActionParameters, DecisionError> {
        Ok(self.choose(ctx))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use frontier_types::{
        AgentId, InventoryView, Position, ResourceNodeState, SelfState, Upgrades, VisibleAgent,
        WorldObject,
    };

    use super::*;

    fn context(current_tile: TileStatus) -> AgentContext {
        AgentContext {
            tick: 1,
            max_ticks: 100,
            world_width: 10,
            world_height: 10,
            self_state: SelfState {
                id: AgentId::new(),
                name: "bot".to_owned(),
                position: Position::new(4, 4),
                hp: 100,
                max_hp: 100,
                energy: 50,
                max_energy: 200,
                coins: 0,
                upgrades: Upgrades::default(),
                vision_radius: 3,
                claim_radius: 1,
                speed: 1,
                tiles_owned: 0,
                inventory: InventoryView {
                    slots: vec![None; 4],
                    ..InventoryView::default()
                },
            },
            current_tile,
            visible_tiles: Vec::new(),
            visible_objects: Vec::new(),
            visible_agents: Vec::new(),
            inbound_messages: Vec::new(),
            memory: Vec::new(),
        }
    }

    #[tokio::test]
    async fn claims_unowned_ground() {
        let bot = RandomBot::new(1);
        let action = bot.decide(&context(TileStatus::Unowned)).await.unwrap();
        assert_eq!(action, ActionParameters::Claim);
    }

    #[tokio::test]
    async fn harvests_the_node_underfoot() {
        let bot = RandomBot::new(1);
        let mut ctx = context(TileStatus::OwnedBySelf);
        ctx.visible_objects.push(WorldObject::new(
            Position::new(4, 4),
            None,
            ObjectKind::Resource(ResourceNodeState {
                resource_type: "wood".to_owned(),
                remaining: 3,
            }),
        ));
        assert_eq!(bot.decide(&ctx).await.unwrap(), ActionParameters::Harvest);
    }

    #[tokio::test]
    async fn wanders_on_owned_ground_and_sometimes_fights() {
        let bot = RandomBot::new(7);
        let mut ctx = context(TileStatus::OwnedBySelf);
        let action = bot.decide(&ctx).await.unwrap();
        assert!(matches!(action, ActionParameters::Move { .. }));

        let rival = AgentId::new();
        ctx.visible_agents.push(VisibleAgent {
            id: rival,
            name: "rival".to_owned(),
            position: Position::new(5, 4),
            hp: 100,
        });
        let mut fought = false;
        for _ in 0..50 {
            if bot.decide(&ctx).await.unwrap() == (ActionParameters::Fight { target_id: rival }) {
                fought = true;
            }
        }
        assert!(fought);
    }
}
