//! Grid coordinates, cardinal sides, and world-space positions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A grid cell address. The start room is always at `(0, 0)`; `y` grows
/// southward so that `North` is "up" on a rendered map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// String form used as a map key, `"x,y"`.
    pub fn key(&self) -> String {
        format!("{},{}", self.x, self.y)
    }

    /// Parse a `"x,y"` key back into a coordinate.
    pub fn parse_key(key: &str) -> Option<Coord> {
        let (x, y) = key.split_once(',')?;
        Some(Coord {
            x: x.parse().ok()?,
            y: y.parse().ok()?,
        })
    }

    /// The neighboring cell one step toward `side`.
    pub const fn step(&self, side: Side) -> Coord {
        let (dx, dy) = side.delta();
        Coord {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// All four axis-aligned neighbors, in fixed N/E/S/W order.
    pub fn neighbors(&self) -> [Coord; 4] {
        [
            self.step(Side::North),
            self.step(Side::East),
            self.step(Side::South),
            self.step(Side::West),
        ]
    }

    pub const fn manhattan(&self, other: Coord) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// The side of this cell facing `other`, if the two are unit-adjacent.
    pub fn side_toward(&self, other: Coord) -> Option<Side> {
        Side::ALL.into_iter().find(|&side| self.step(side) == other)
    }
}

impl core::fmt::Display for Coord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// One side of a room. Iteration order is fixed so that side-dependent
/// decisions stay reproducible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Side {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::North, Side::East, Side::South, Side::West];

    /// Grid delta of one step toward this side.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Side::North => (0, -1),
            Side::East => (1, 0),
            Side::South => (0, 1),
            Side::West => (-1, 0),
        }
    }

    pub const fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::East => Side::West,
            Side::South => Side::North,
            Side::West => Side::East,
        }
    }

    /// Index into per-side arrays.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// A position in world units inside the current room. `(0, 0)` is the
/// room's northwest corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
