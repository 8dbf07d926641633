//! Grid coordinates and directions.
//!
//! The world is a rectangular grid of integer coordinates with `(0, 0)` in
//! the north-west corner. `y` grows southwards, so [`Direction::North`] is
//! `y - 1`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// An integer grid coordinate. Equality is by value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Column, growing eastwards.
    pub x: i32,
    /// Row, growing southwards.
    pub y: i32,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position `steps` tiles away in `direction`.
    ///
    /// Saturates at the `i32` limits instead of overflowing; such positions
    /// are always out of bounds for any real world.
    pub const fn offset(self, direction: Direction, steps: i32) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx.saturating_mul(steps)),
            y: self.y.saturating_add(dy.saturating_mul(steps)),
        }
    }

    /// Chebyshev (king-move) distance to `other`.
    pub const fn chebyshev_distance(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }

    /// Squared Euclidean distance to `other`, widened to avoid overflow.
    pub fn distance_squared(self, other: Self) -> u64 {
        let dx = u64::from(self.x.abs_diff(other.x));
        let dy = u64::from(self.y.abs_diff(other.y));
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Whether `other` lies inside the circle of the given radius centred
    /// on `self` (inclusive, Euclidean).
    pub fn within_radius(self, other: Self, radius: u32) -> bool {
        let r = u64::from(radius);
        self.distance_squared(other) <= r.saturating_mul(r)
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four cardinal movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// Towards `y - 1`.
    North,
    /// Towards `y + 1`.
    South,
    /// Towards `x + 1`.
    East,
    /// Towards `x - 1`.
    West,
}

impl Direction {
    /// All directions, in a fixed order.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// The `(dx, dy)` unit step for this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }
}

/// Error returned when text does not name a direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(pub String);

impl core::fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown direction: {}", self.0)
    }
}

impl std::error::Error for ParseDirectionError {}

impl core::str::FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts full names, initials, and screen-relative synonyms
    /// (`up`/`down`/`left`/`right`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" | "up" => Ok(Self::North),
            "south" | "s" | "down" => Ok(Self::South),
            "east" | "e" | "right" => Ok(Self::East),
            "west" | "w" | "left" => Ok(Self::West),
            _ => Err(ParseDirectionError(s.to_owned())),
        }
    }
}
