//! The tile grid: terrain, ownership, and the owner index.
//!
//! [`World::set_owner`] is the only way tile ownership changes. It keeps the
//! per-tile owner and the owner -> positions index in agreement: a position
//! appears in exactly one owner's entry, or in none. Every change is also
//! recorded so the engine can emit tile deltas once per tick.

use std::collections::{BTreeMap, BTreeSet};

use frontier_types::{AgentId, Position, Terrain, Tile, TileChange, TileStatus};

use crate::error::WorldError;

static NO_TILES: BTreeSet<Position> = BTreeSet::new();

/// The rectangular tile grid of one game.
#[derive(Debug, Clone)]
pub struct World {
    width: u32,
    height: u32,
    /// Row-major tiles.
    tiles: Vec<Tile>,
    /// Owner -> owned positions. Entries are never empty.
    owners: BTreeMap<AgentId, BTreeSet<Position>>,
    /// Latest owner per position changed since the last drain.
    changes: BTreeMap<Position, Option<AgentId>>,
}

impl World {
    /// Build a grid, asking `terrain` for the terrain of each position.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] when either side is zero or
    /// does not fit the coordinate type.
    pub fn new(
        width: u32,
        height: u32,
        mut terrain: impl FnMut(Position) -> Terrain,
    ) -> Result<Self, WorldError> {
        let invalid = WorldError::InvalidDimensions { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let (Ok(w), Ok(h), Ok(capacity)) = (
            i32::try_from(width),
            i32::try_from(height),
            usize::try_from(u64::from(width).saturating_mul(u64::from(height))),
        ) else {
            return Err(invalid);
        };

        let mut tiles = Vec::with_capacity(capacity);
        for y in 0..h {
            for x in 0..w {
                let position = Position::new(x, y);
                tiles.push(Tile {
                    position,
                    owner: None,
                    terrain: terrain(position),
                });
            }
        }

        Ok(Self {
            width,
            height,
            tiles,
            owners: BTreeMap::new(),
            changes: BTreeMap::new(),
        })
    }

    /// Build an all-plains grid.
    pub fn flat(width: u32, height: u32) -> Result<Self, WorldError> {
        Self::new(width, height, |_| Terrain::Plains)
    }

    /// Grid width in tiles.
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of tiles.
    pub fn area(&self) -> u64 {
        u64::from(self.width).saturating_mul(u64::from(self.height))
    }

    /// Whether the position lies on the grid.
    pub fn in_bounds(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    fn index(&self, position: Position) -> Option<usize> {
        let x = u32::try_from(position.x).ok()?;
        let y = u32::try_from(position.y).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        let flat = u64::from(y)
            .checked_mul(u64::from(self.width))?
            .checked_add(u64::from(x))?;
        usize::try_from(flat).ok()
    }

    /// The tile at a position.
    pub fn tile(&self, position: Position) -> Option<&Tile> {
        self.index(position).and_then(|i| self.tiles.get(i))
    }

    /// All tiles, row-major.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Terrain at a position.
    pub fn terrain(&self, position: Position) -> Option<Terrain> {
        self.tile(position).map(|t| t.terrain)
    }

    /// Replace the terrain of one tile.
    pub fn set_terrain(&mut self, position: Position, terrain: Terrain) -> Result<(), WorldError> {
        let index = self
            .index(position)
            .ok_or(WorldError::OutOfBounds(position))?;
        let tile = self
            .tiles
            .get_mut(index)
            .ok_or(WorldError::OutOfBounds(position))?;
        tile.terrain = terrain;
        Ok(())
    }

    /// Owner of a tile; `None` for unowned or out-of-bounds tiles.
    pub fn owner(&self, position: Position) -> Option<AgentId> {
        self.tile(position).and_then(|t| t.owner)
    }

    /// Ownership of a tile as seen by `viewer`.
    pub fn status_for(&self, position: Position, viewer: AgentId) -> TileStatus {
        match self.owner(position) {
            None => TileStatus::Unowned,
            Some(owner) if owner == viewer => TileStatus::OwnedBySelf,
            Some(owner) => TileStatus::OwnedByOther(owner),
        }
    }

    /// Whether agents may stand on the tile. Out-of-bounds is impassable.
    pub fn is_passable(&self, position: Position) -> bool {
        self.terrain(position).is_some_and(Terrain::is_passable)
    }

    /// Change the owner of a tile, returning the previous owner.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::OutOfBounds`] for positions off the grid.
    pub fn set_owner(
        &mut self,
        position: Position,
        owner: Option<AgentId>,
    ) -> Result<Option<AgentId>, WorldError> {
        let index = self
            .index(position)
            .ok_or(WorldError::OutOfBounds(position))?;
        let tile = self
            .tiles
            .get_mut(index)
            .ok_or(WorldError::OutOfBounds(position))?;
        let previous = tile.owner;
        if previous == owner {
            return Ok(previous);
        }
        tile.owner = owner;

        if let Some(prev) = previous {
            if let Some(set) = self.owners.get_mut(&prev) {
                set.remove(&position);
                if set.is_empty() {
                    self.owners.remove(&prev);
                }
            }
        }
        if let Some(next) = owner {
            self.owners.entry(next).or_default().insert(position);
        }
        self.changes.insert(position, owner);
        Ok(previous)
    }

    /// Positions owned by an agent.
    pub fn owned_by(&self, agent: AgentId) -> &BTreeSet<Position> {
        self.owners.get(&agent).unwrap_or(&NO_TILES)
    }

    /// Number of tiles owned by an agent.
    pub fn tile_count(&self, agent: AgentId) -> u32 {
        u32::try_from(self.owned_by(agent).len()).unwrap_or(u32::MAX)
    }

    /// Tile counts for every agent that owns at least one tile.
    pub fn tile_counts(&self) -> BTreeMap<AgentId, u32> {
        self.owners
            .iter()
            .map(|(agent, set)| (*agent, u32::try_from(set.len()).unwrap_or(u32::MAX)))
            .collect()
    }

    /// Release every tile owned by an agent, returning the released
    /// positions.
    pub fn release_all(&mut self, agent: AgentId) -> Vec<Position> {
        let Some(owned) = self.owners.remove(&agent) else {
            return Vec::new();
        };
        for position in &owned {
            if let Some(tile) = self.index(*position).and_then(|i| self.tiles.get_mut(i)) {
                tile.owner = None;
            }
            self.changes.insert(*position, None);
        }
        tracing::trace!(agent_id = %agent, released = owned.len(), "released tiles");
        owned.into_iter().collect()
    }

    /// In-bounds positions inside the circle of `radius` around `center`
    /// (Euclidean, inclusive), row-major.
    pub fn positions_within(&self, center: Position, radius: u32) -> Vec<Position> {
        let r = i32::try_from(radius).unwrap_or(i32::MAX);
        let mut out = Vec::new();
        for y in center.y.saturating_sub(r)..=center.y.saturating_add(r) {
            for x in center.x.saturating_sub(r)..=center.x.saturating_add(r) {
                let position = Position::new(x, y);
                if self.in_bounds(position) && center.within_radius(position, radius) {
                    out.push(position);
                }
            }
        }
        out
    }

    /// Every position on the outer border of the grid, without duplicates.
    pub fn edge_positions(&self) -> Vec<Position> {
        self.tiles
            .iter()
            .map(|t| t.position)
            .filter(|p| self.is_edge(*p))
            .collect()
    }

    fn is_edge(&self, position: Position) -> bool {
        let max_x = i64::from(self.width).saturating_sub(1);
        let max_y = i64::from(self.height).saturating_sub(1);
        position.x == 0
            || position.y == 0
            || i64::from(position.x) == max_x
            || i64::from(position.y) == max_y
    }

    /// Drain the ownership changes recorded since the last call, in
    /// position order. Several changes to one tile collapse to the latest.
    pub fn take_changes(&mut self) -> Vec<TileChange> {
        std::mem::take(&mut self.changes)
            .into_iter()
            .map(|(position, owner)| TileChange::new(position, owner))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn world() -> World {
        World::flat(20, 20).unwrap()
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(World::flat(0, 5).is_err());
        assert!(World::flat(5, 0).is_err());
    }

    #[test]
    fn bounds_are_half_open() {
        let w = world();
        assert!(w.in_bounds(Position::new(0, 0)));
        assert!(w.in_bounds(Position::new(19, 19)));
        assert!(!w.in_bounds(Position::new(20, 0)));
        assert!(!w.in_bounds(Position::new(-1, 3)));
    }

    #[test]
    fn set_owner_moves_position_between_index_entries() {
        let mut w = world();
        let a = AgentId::new();
        let b = AgentId::new();
        let p = Position::new(3, 4);

        assert_eq!(w.set_owner(p, Some(a)).unwrap(), None);
        assert!(w.owned_by(a).contains(&p));

        assert_eq!(w.set_owner(p, Some(b)).unwrap(), Some(a));
        assert!(!w.owned_by(a).contains(&p));
        assert!(w.owned_by(b).contains(&p));
        assert_eq!(w.owner(p), Some(b));
        assert!(!w.tile_counts().contains_key(&a));
    }

    #[test]
    fn set_owner_out_of_bounds_is_an_error() {
        let mut w = world();
        let err = w.set_owner(Position::new(50, 50), Some(AgentId::new()));
        assert_eq!(err, Err(WorldError::OutOfBounds(Position::new(50, 50))));
    }

    #[test]
    fn index_and_tiles_agree_after_many_changes() {
        let mut w = world();
        let agents = [AgentId::new(), AgentId::new(), AgentId::new()];
        for i in 0..60_i32 {
            let p = Position::new(i % 7, i % 5);
            let owner = agents.get(usize::try_from(i % 4).unwrap()).copied();
            w.set_owner(p, owner).unwrap();
        }
        for tile in w.tiles() {
            for agent in agents {
                assert_eq!(
                    w.owned_by(agent).contains(&tile.position),
                    tile.owner == Some(agent)
                );
            }
        }
    }

    #[test]
    fn release_all_clears_ownership() {
        let mut w = world();
        let a = AgentId::new();
        w.set_owner(Position::new(1, 1), Some(a)).unwrap();
        w.set_owner(Position::new(2, 1), Some(a)).unwrap();
        let _ = w.take_changes();

        let released = w.release_all(a);
        assert_eq!(released.len(), 2);
        assert_eq!(w.tile_count(a), 0);
        assert_eq!(w.owner(Position::new(1, 1)), None);
        assert_eq!(w.take_changes().len(), 2);
    }

    #[test]
    fn changes_collapse_per_tile() {
        let mut w = world();
        let p = Position::new(5, 5);
        w.set_owner(p, Some(AgentId::new())).unwrap();
        w.set_owner(p, None).unwrap();
        let changes = w.take_changes();
        assert_eq!(changes, vec![TileChange::new(p, None)]);
        assert!(w.take_changes().is_empty());
    }

    #[test]
    fn positions_within_is_circular_and_clipped() {
        let w = world();
        let inner = w.positions_within(Position::new(10, 10), 1);
        assert_eq!(inner.len(), 5);
        let corner = w.positions_within(Position::new(0, 0), 2);
        assert!(corner.iter().all(|p| p.x >= 0 && p.y >= 0));
        assert!(!corner.contains(&Position::new(2, 2)));
    }

    #[test]
    fn edge_positions_cover_the_border_once() {
        let w = World::flat(4, 3).unwrap();
        let edges = w.edge_positions();
        assert_eq!(edges.len(), 10);
        assert!(!edges.contains(&Position::new(1, 1)));
    }

    #[test]
    fn impassable_terrain_blocks() {
        let mut w = world();
        let p = Position::new(2, 2);
        w.set_terrain(p, Terrain::Water).unwrap();
        assert!(!w.is_passable(p));
        assert!(!w.is_passable(Position::new(-1, 0)));
        assert!(w.is_passable(Position::new(3, 2)));
    }
}
