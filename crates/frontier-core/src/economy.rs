//! Passive income and resource absorption.
//!
//! Owned land pays energy every tick: each tile contributes the base
//! per-tile income scaled by its terrain multiplier, and each obelisk
//! standing on an owned tile adds a flat bonus. Resource nodes on owned
//! land feed one unit per tick into the owner's inventory.

use frontier_types::{AgentId, InteractiveType, ObjectId, ObjectKind};
use tracing::{debug, trace};

use crate::state::GameState;

/// Energy an agent earns this tick from the land it owns.
pub fn income_for(state: &GameState, agent_id: AgentId) -> u32 {
    let owned = state.world.owned_by(agent_id);
    let pct_total = owned
        .iter()
        .filter_map(|p| state.world.terrain(*p))
        .fold(0_u64, |acc, t| acc.saturating_add(u64::from(t.income_pct())));
    let land = u64::from(state.balance.income_per_tile)
        .saturating_mul(pct_total)
        .checked_div(100)
        .unwrap_or(0);

    let obelisks = owned
        .iter()
        .filter(|p| {
            state
                .objects
                .interactive_at(**p)
                .is_some_and(|(_, i)| i.interactive_type == InteractiveType::Obelisk)
        })
        .count();
    let bonus = u64::from(state.balance.obelisk_bonus_energy)
        .saturating_mul(u64::try_from(obelisks).unwrap_or(u64::MAX));

    u32::try_from(land.saturating_add(bonus)).unwrap_or(u32::MAX)
}

/// Pay every live agent its income, capped at max energy.
pub fn pay_income(state: &mut GameState) {
    let payouts: Vec<(AgentId, u32)> = state
        .agents
        .values()
        .filter(|a| a.alive)
        .map(|a| (a.id, income_for(state, a.id)))
        .filter(|(_, income)| *income > 0)
        .collect();
    for (id, income) in payouts {
        if let Some(agent) = state.agents.get_mut(&id) {
            let gained = agent.restore_energy(income);
            trace!(tick = state.tick, agent_id = %id, income, gained, "income paid");
        }
    }
}

/// Move one unit from every resource node on owned land into its owner's
/// inventory. The unit stays in the node when the owner is dead, the item
/// is unknown, or the inventory has no room.
///
/// Returns the number of units absorbed.
pub fn absorb_resources(state: &mut GameState) -> u32 {
    let claims: Vec<(ObjectId, AgentId, String)> = state
        .objects
        .iter()
        .filter_map(|o| match &o.kind {
            ObjectKind::Resource(r) if r.remaining > 0 => state
                .world
                .owner(o.position)
                .map(|owner| (o.id, owner, r.resource_type.clone())),
            _ => None,
        })
        .collect();

    let items = std::sync::Arc::clone(&state.catalogs.items);
    let mut absorbed = 0_u32;
    for (node_id, owner, resource) in claims {
        let Some(def) = items.get(&resource) else {
            continue;
        };
        let Some(agent) = state.agents.get_mut(&owner) else {
            continue;
        };
        if !agent.alive || !agent.inventory.can_fit(def, 1) {
            continue;
        }
        if agent.inventory.add_item(def, 1) > 0 {
            continue;
        }
        if let Some(ObjectKind::Resource(node)) = state.objects.kind_mut(node_id) {
            node.remaining = node.remaining.saturating_sub(1);
        }
        absorbed = absorbed.saturating_add(1);
    }
    if absorbed > 0 {
        debug!(tick = state.tick, absorbed, "resources absorbed");
    }
    absorbed
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use frontier_types::{
        InteractiveState, Position, ResourceNodeState, Terrain, WorldObject,
    };

    use super::*;
    use crate::state::testkit::{flat_game, join_at};

    fn node(position: Position, remaining: u32) -> WorldObject {
        WorldObject::new(
            position,
            None,
            ObjectKind::Resource(ResourceNodeState {
                resource_type: "wood".to_owned(),
                remaining,
            }),
        )
    }

    #[test]
    fn terrain_scales_income() {
        let mut state = flat_game(10, 10);
        let id = join_at(&mut state, "farmer", 0, 0);
        state.world.set_terrain(Position::new(1, 1), Terrain::Forest).unwrap();
        state.world.set_terrain(Position::new(2, 1), Terrain::Desert).unwrap();
        for x in 0..3 {
            state.world.set_owner(Position::new(x, 1), Some(id)).unwrap();
        }
        // plains 100% + forest 150% + desert 50% = 3 energy
        assert_eq!(income_for(&state, id), 3);
    }

    #[test]
    fn obelisk_pays_a_bonus() {
        let mut state = flat_game(10, 10);
        let id = join_at(&mut state, "priest", 0, 0);
        let obelisk = WorldObject::new(
            Position::new(4, 4),
            None,
            ObjectKind::Interactive(InteractiveState {
                interactive_type: InteractiveType::Obelisk,
                active: true,
                cooldown_until: 0,
                destination: None,
                reward: None,
            }),
        );
        state.objects.insert(obelisk).unwrap();
        state.world.set_owner(Position::new(4, 4), Some(id)).unwrap();
        assert_eq!(
            income_for(&state, id),
            state.balance.income_per_tile + state.balance.obelisk_bonus_energy
        );
    }

    #[test]
    fn income_is_capped_and_skips_the_dead() {
        let mut state = flat_game(10, 10);
        let rich = join_at(&mut state, "rich", 0, 0);
        let dead = join_at(&mut state, "dead", 9, 9);
        state.world.set_owner(Position::new(0, 0), Some(rich)).unwrap();
        state.agents.get_mut(&rich).unwrap().energy = state.balance.max_energy;
        state.agents.get_mut(&dead).unwrap().kill(0, 10);
        state.agents.get_mut(&dead).unwrap().energy = 0;

        pay_income(&mut state);
        assert_eq!(state.agents.get(&rich).unwrap().energy, state.balance.max_energy);
        assert_eq!(state.agents.get(&dead).unwrap().energy, 0);
    }

    #[test]
    fn owned_nodes_feed_the_owner() {
        let mut state = flat_game(10, 10);
        let id = join_at(&mut state, "owner", 0, 0);
        let node_id = state.objects.insert(node(Position::new(2, 2), 2)).unwrap();
        state.objects.insert(node(Position::new(7, 7), 2)).unwrap();
        state.world.set_owner(Position::new(2, 2), Some(id)).unwrap();

        assert_eq!(absorb_resources(&mut state), 1);
        assert_eq!(state.agents.get(&id).unwrap().inventory.count("wood"), 1);
        let remaining = match &state.objects.get(node_id).unwrap().kind {
            ObjectKind::Resource(r) => r.remaining,
            _ => 0,
        };
        assert_eq!(remaining, 1);
    }

    #[test]
    fn full_inventory_leaves_the_unit_in_the_node() {
        let mut state = flat_game(10, 10);
        let id = join_at(&mut state, "hoarder", 0, 0);
        let stone = state.catalogs.items.get("stone").cloned().unwrap();
        let agent = state.agents.get_mut(&id).unwrap();
        // Full stacks in every slot leave no room for wood.
        while !agent.inventory.is_full() {
            let _ = agent.inventory.add_item(&stone, stone.max_stack);
        }
        let node_id = state.objects.insert(node(Position::new(2, 2), 3)).unwrap();
        state.world.set_owner(Position::new(2, 2), Some(id)).unwrap();

        assert_eq!(absorb_resources(&mut state), 0);
        let remaining = match &state.objects.get(node_id).unwrap().kind {
            ObjectKind::Resource(r) => r.remaining,
            _ => 0,
        };
        assert_eq!(remaining, 3);
    }
}
