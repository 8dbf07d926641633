//! World generation, resource spawning, and despawn.
//!
//! Generation scatters terrain by the configured percentages, then places
//! the initial resource nodes and the interactive objects (shrines, caches,
//! linked portal pairs, obelisks) on free passable tiles. During play, one
//! node may appear per tick, and expired or exhausted objects are swept at
//! the end of the tick.

use frontier_types::{
    InteractiveState, InteractiveType, ItemInstance, ObjectKind, Position, ResourceNodeState,
    Terrain, WorldObject,
};
use frontier_world::{World, WorldObjectManager};
use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, trace};

use crate::config::{GameConfig, SpawningConfig};
use crate::error::EngineError;
use crate::state::GameState;

/// Generate a fresh world and its initial objects.
///
/// # Errors
///
/// Returns [`EngineError::World`] for invalid map dimensions.
pub fn generate_world(
    rng: &mut StdRng,
    game: &GameConfig,
    spawning: &SpawningConfig,
) -> Result<(World, WorldObjectManager), EngineError> {
    let world = World::new(game.width, game.height, |_| roll_terrain(rng, spawning))?;
    let mut objects = WorldObjectManager::new();

    let max_nodes = spawning.max_resources(world.area());
    for _ in 0..spawning.initial_resources {
        if u64::try_from(objects.count_resources()).unwrap_or(u64::MAX) >= max_nodes {
            break;
        }
        place_resource(rng, &world, &mut objects, spawning);
    }

    for _ in 0..spawning.shrines {
        place_interactive(rng, &world, &mut objects, shrine());
    }
    for _ in 0..spawning.caches {
        let reward = random_index(rng, spawning.cache_loot.len())
            .and_then(|i| spawning.cache_loot.get(i))
            .map(|item_id| ItemInstance::new(item_id.clone(), 1));
        place_interactive(rng, &world, &mut objects, cache(reward));
    }
    for _ in 0..spawning.portal_pairs {
        place_portal_pair(rng, &world, &mut objects);
    }
    for _ in 0..spawning.obelisks {
        place_interactive(rng, &world, &mut objects, obelisk());
    }

    debug!(
        width = game.width,
        height = game.height,
        objects = objects.len(),
        "world generated"
    );
    Ok((world, objects))
}

fn roll_terrain(rng: &mut StdRng, spawning: &SpawningConfig) -> Terrain {
    let roll: u32 = rng.random_range(0..100);
    let bands = [
        (spawning.forest_pct, Terrain::Forest),
        (spawning.desert_pct, Terrain::Desert),
        (spawning.mountain_pct, Terrain::Mountain),
        (spawning.water_pct, Terrain::Water),
    ];
    let mut ceiling = 0_u32;
    for (pct, terrain) in bands {
        ceiling = ceiling.saturating_add(pct);
        if roll < ceiling {
            return terrain;
        }
    }
    Terrain::Plains
}

/// A uniformly random index below `len`, or `None` for an empty range.
pub(crate) fn random_index(rng: &mut StdRng, len: usize) -> Option<usize> {
    (len > 0).then(|| rng.random_range(0..len))
}

/// A random passable tile with no object on it.
pub(crate) fn random_free_tile(
    rng: &mut StdRng,
    world: &World,
    objects: &WorldObjectManager,
) -> Option<Position> {
    let free: Vec<Position> = world
        .tiles()
        .iter()
        .filter(|t| t.terrain.is_passable() && !objects.is_occupied(t.position))
        .map(|t| t.position)
        .collect();
    random_index(rng, free.len()).and_then(|i| free.get(i).copied())
}

/// The item a new node on this terrain yields. Impassable terrain yields
/// nothing.
pub fn resource_for(terrain: Terrain, rng: &mut StdRng) -> Option<&'static str> {
    match terrain {
        Terrain::Forest => Some("wood"),
        Terrain::Desert => Some(if rng.random_bool(0.5) { "stone" } else { "iron_ore" }),
        Terrain::Plains => Some(if rng.random_bool(0.5) { "berries" } else { "stone" }),
        Terrain::Mountain | Terrain::Water => None,
    }
}

fn place_resource(
    rng: &mut StdRng,
    world: &World,
    objects: &mut WorldObjectManager,
    spawning: &SpawningConfig,
) -> bool {
    let Some(position) = random_free_tile(rng, world, objects) else {
        return false;
    };
    let Some(resource) = world.terrain(position).and_then(|t| resource_for(t, rng)) else {
        return false;
    };
    let remaining = rng.random_range(spawning.min_yield..=spawning.max_yield.max(spawning.min_yield));
    let node = WorldObject::new(
        position,
        None,
        ObjectKind::Resource(ResourceNodeState {
            resource_type: resource.to_owned(),
            remaining,
        }),
    );
    match objects.insert(node) {
        Ok(id) => {
            trace!(object_id = %id, %position, resource, remaining, "resource node spawned");
            true
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to place resource node");
            false
        }
    }
}

fn place_interactive(
    rng: &mut StdRng,
    world: &World,
    objects: &mut WorldObjectManager,
    state: InteractiveState,
) -> Option<Position> {
    let position = random_free_tile(rng, world, objects)?;
    objects
        .insert(WorldObject::new(position, None, ObjectKind::Interactive(state)))
        .ok()
        .map(|_| position)
}

fn place_portal_pair(rng: &mut StdRng, world: &World, objects: &mut WorldObjectManager) {
    let Some(first) = random_free_tile(rng, world, objects) else {
        return;
    };
    let free: Vec<Position> = world
        .tiles()
        .iter()
        .map(|t| t.position)
        .filter(|p| *p != first && world.is_passable(*p) && !objects.is_occupied(*p))
        .collect();
    let Some(second) = random_index(rng, free.len()).and_then(|i| free.get(i).copied()) else {
        return;
    };
    for (at, to) in [(first, second), (second, first)] {
        let object = WorldObject::new(at, None, ObjectKind::Interactive(portal(to)));
        if let Err(err) = objects.insert(object) {
            tracing::warn!(error = %err, "failed to place portal");
        }
    }
}

const fn shrine() -> InteractiveState {
    InteractiveState {
        interactive_type: InteractiveType::Shrine,
        active: true,
        cooldown_until: 0,
        destination: None,
        reward: None,
    }
}

const fn cache(reward: Option<ItemInstance>) -> InteractiveState {
    InteractiveState {
        interactive_type: InteractiveType::Cache,
        active: true,
        cooldown_until: 0,
        destination: None,
        reward,
    }
}

const fn portal(destination: Position) -> InteractiveState {
    InteractiveState {
        interactive_type: InteractiveType::Portal,
        active: true,
        cooldown_until: 0,
        destination: Some(destination),
        reward: None,
    }
}

const fn obelisk() -> InteractiveState {
    InteractiveState {
        interactive_type: InteractiveType::Obelisk,
        active: true,
        cooldown_until: 0,
        destination: None,
        reward: None,
    }
}

// ---------------------------------------------------------------------------
// Per-tick phases
// ---------------------------------------------------------------------------

/// Maybe place one resource node, respecting the density cap.
///
/// Returns whether a node was placed.
pub fn spawn_resources(state: &mut GameState) -> bool {
    let cap = state.spawning.max_resources(state.world.area());
    let count = u64::try_from(state.objects.count_resources()).unwrap_or(u64::MAX);
    if count >= cap {
        return false;
    }
    if !state.rng.random_bool(state.spawning.resource_spawn_chance) {
        return false;
    }
    place_resource(
        &mut state.rng,
        &state.world,
        &mut state.objects,
        &state.spawning,
    )
}

/// Remove expired dropped items and exhausted resource nodes, and wake
/// shrines whose cooldown has elapsed.
pub fn despawn(state: &mut GameState) {
    let tick = state.tick;
    let mut doomed = state.objects.expired_dropped_items(tick);
    doomed.extend(state.objects.depleted_resources());
    for id in doomed {
        if let Err(err) = state.objects.remove(id) {
            tracing::warn!(tick, object_id = %id, error = %err, "despawn failed");
        }
    }

    let dormant: Vec<_> = state
        .objects
        .iter()
        .filter_map(|o| match &o.kind {
            ObjectKind::Interactive(i) if !i.active && i.cooldown_until <= tick => Some(o.id),
            _ => None,
        })
        .collect();
    for id in dormant {
        if let Some(ObjectKind::Interactive(i)) = state.objects.kind_mut(id) {
            i.active = true;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn generation_places_interactives_on_passable_tiles() {
        let game = GameConfig::default();
        let spawning = SpawningConfig::default();
        let (world, objects) = generate_world(&mut rng(), &game, &spawning).unwrap();

        let count = |kind: InteractiveType| {
            objects
                .iter()
                .filter(|o| {
                    matches!(&o.kind, ObjectKind::Interactive(i) if i.interactive_type == kind)
                })
                .count()
        };
        assert_eq!(count(InteractiveType::Shrine), 2);
        assert_eq!(count(InteractiveType::Cache), 3);
        assert_eq!(count(InteractiveType::Portal), 2);
        assert_eq!(count(InteractiveType::Obelisk), 2);
        assert_eq!(objects.count_resources(), 12);
        assert!(objects.iter().all(|o| world.is_passable(o.position)));
        assert!(objects.is_consistent());
    }

    #[test]
    fn portals_point_at_each_other() {
        let spawning = SpawningConfig {
            shrines: 0,
            caches: 0,
            obelisks: 0,
            initial_resources: 0,
            ..SpawningConfig::default()
        };
        let (_, objects) = generate_world(&mut rng(), &GameConfig::default(), &spawning).unwrap();
        let portals: Vec<(Position, Option<Position>)> = objects
            .iter()
            .filter_map(|o| match &o.kind {
                ObjectKind::Interactive(i) => Some((o.position, i.destination)),
                _ => None,
            })
            .collect();
        assert_eq!(portals.len(), 2);
        let (a, to_b) = portals.first().copied().unwrap();
        let (b, to_a) = portals.get(1).copied().unwrap();
        assert_eq!(to_b, Some(b));
        assert_eq!(to_a, Some(a));
    }

    #[test]
    fn same_seed_same_map() {
        let game = GameConfig::default();
        let spawning = SpawningConfig::default();
        let (w1, o1) = generate_world(&mut rng(), &game, &spawning).unwrap();
        let (w2, o2) = generate_world(&mut rng(), &game, &spawning).unwrap();
        assert_eq!(w1.tiles(), w2.tiles());
        let mut p1: Vec<Position> = o1.iter().map(|o| o.position).collect();
        let mut p2: Vec<Position> = o2.iter().map(|o| o.position).collect();
        p1.sort();
        p2.sort();
        assert_eq!(p1, p2);
    }

    #[test]
    fn all_plains_map_with_no_bands() {
        let spawning = SpawningConfig {
            forest_pct: 0,
            desert_pct: 0,
            mountain_pct: 0,
            water_pct: 0,
            ..SpawningConfig::default()
        };
        let game = GameConfig {
            width: 8,
            height: 8,
            ..GameConfig::default()
        };
        let (world, _) = generate_world(&mut rng(), &game, &spawning).unwrap();
        assert!(world.tiles().iter().all(|t| t.terrain == Terrain::Plains));
    }

    #[test]
    fn impassable_terrain_yields_nothing() {
        let mut r = rng();
        assert_eq!(resource_for(Terrain::Forest, &mut r), Some("wood"));
        assert_eq!(resource_for(Terrain::Water, &mut r), None);
        assert_eq!(resource_for(Terrain::Mountain, &mut r), None);
        let desert = resource_for(Terrain::Desert, &mut r).unwrap();
        assert!(desert == "stone" || desert == "iron_ore");
    }

    #[test]
    fn random_index_of_empty_range_is_none() {
        assert_eq!(random_index(&mut rng(), 0), None);
        assert!(random_index(&mut rng(), 3).is_some_and(|i| i < 3));
    }
}
