//! Replay records exchanged with the entity collaborator.
//!
//! When the player leaves a room the engine asks the collaborator for its
//! live state and keeps only these minimal records; on re-entry it hands
//! them back for re-instantiation. The core never simulates entities itself.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::dungeon::Vec2;

/// Broad behavior class of an enemy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum EnemyKind {
    #[default]
    Grunt = 0,
    Ranged = 1,
    Charger = 2,
    /// Ambient haunts; they neither persist across visits nor hold the
    /// room locked unless explicitly flagged.
    Ghost = 3,
    Boss = 4,
}

impl EnemyKind {
    pub const fn is_ghost(&self) -> bool {
        matches!(self, EnemyKind::Ghost)
    }
}

/// How an enemy moves, for faithful re-instantiation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum MoveStyle {
    #[default]
    Walk = 0,
    Fly = 1,
    Dash = 2,
    Fixed = 3,
}

/// Minimal replay record for one enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyRecord {
    pub template: String,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub hp: i32,
    pub hp_max: i32,
    pub movement: MoveStyle,
    pub speed: f32,
    pub solid: bool,
}

/// An enemy as reported live by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveEntity {
    pub record: EnemyRecord,
    pub alive: bool,
    /// Owned by the player (summons, decoys); never hostile.
    pub player_owned: bool,
    /// Ghosts normally ignore the combat gate; this flag opts one in.
    pub locks_room: bool,
}

impl LiveEntity {
    /// Whether this entity keeps the room combat-locked.
    pub fn holds_room_locked(&self) -> bool {
        self.alive && !self.player_owned && (!self.record.kind.is_ghost() || self.locks_room)
    }

    /// Whether this entity is written into the exit snapshot.
    pub fn should_persist(&self) -> bool {
        self.alive && !self.player_owned && !self.record.kind.is_ghost()
    }
}

/// Replay record for a timed explosive. `fires_at_ms` is an absolute
/// timestamp, never a countdown, so time spent outside the room counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BombRecord {
    pub template: String,
    pub pos: Vec2,
    pub fires_at_ms: u64,
}

/// An explosive as reported live by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveBomb {
    pub record: BombRecord,
    pub armed: bool,
    pub exploded: bool,
}

impl LiveBomb {
    pub fn should_persist(&self) -> bool {
        self.armed && !self.exploded
    }
}

/// Loot lying on the floor, captured verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub template: String,
    pub pos: Vec2,
    pub quantity: u32,
}

/// A container and its remaining contents, captured verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChestRecord {
    pub template: String,
    pub pos: Vec2,
    pub opened: bool,
    pub contents: Vec<ItemRecord>,
}
