//! Seams between the dungeon engine and the game runtime.
//!
//! The engine owns graph state and timing but never touches entities,
//! currency, or disk itself. The runtime plugs in behind these traits: an
//! [`EntityHost`] that spawns and despawns room-scoped actors, a
//! [`RewardSink`] that prices out reward events, and a [`ProgressStore`]
//! for the handful of values that survive a process restart.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::dungeon::{Coord, DoorLock, RoomInstance};
use crate::records::{BombRecord, ChestRecord, EnemyRecord, ItemRecord, LiveBomb, LiveEntity};

/// Persisted-progress key for the active seed label.
pub const KEY_SEED: &str = "run.seed";
/// Persisted-progress key for the furthest confirmed golden path index.
pub const KEY_GOLDEN_INDEX: &str = "run.golden_index";
/// Persisted-progress key for the golden path forfeit flag ("0" or "1").
pub const KEY_GOLDEN_FAILED: &str = "run.golden_failed";

/// Something the player earned. The engine only names the occasion; the
/// sink decides what it pays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RewardEvent {
    /// A locked room was fought down to empty.
    RoomCleared {
        coord: Coord,
        /// Cleared within the fast-clear window.
        fast: bool,
        /// Consecutive fast clears including this one, 0 if not fast.
        streak: u32,
    },
    /// The player advanced the golden path to `index` and cleared the room.
    GoldenStep { index: usize },
    /// The whole golden path was walked in order.
    GoldenPathComplete { length: usize },
    /// A standard key was spent on a locked door.
    KeyUsed { lock: DoorLock },
}

/// The runtime side of room population. The engine calls these on every
/// crossing: snapshot reads before leaving, a wipe, then spawns for the
/// room being entered.
pub trait EntityHost {
    /// Every room-scoped enemy currently alive, with ownership flags.
    fn live_entities(&self) -> Vec<LiveEntity>;
    /// Every armed explosive currently ticking.
    fn live_bombs(&self) -> Vec<LiveBomb>;
    /// Loose pickups on the floor.
    fn floor_items(&self) -> Vec<ItemRecord>;
    /// Chests, opened or not.
    fn chests(&self) -> Vec<ChestRecord>;

    /// Despawn everything room-scoped. Persistent actors (the player, its
    /// summons) stay.
    fn clear_room(&mut self);
    /// First visit: spawn the template's enemies, items, and chests.
    fn populate_from_template(&mut self, room: &RoomInstance);
    fn spawn_enemies(&mut self, enemies: &[EnemyRecord]);
    fn spawn_bombs(&mut self, bombs: &[BombRecord]);
    fn spawn_items(&mut self, items: &[ItemRecord]);
    fn spawn_chests(&mut self, chests: &[ChestRecord]);
}

/// Receives reward events as they happen.
pub trait RewardSink {
    fn reward(&mut self, event: RewardEvent);
}

/// Key-value progress that outlives the process. Values are plain strings;
/// the engine formats and parses its own.
pub trait ProgressStore {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&mut self, key: &str, value: &str);
}

/// In-memory [`ProgressStore`], for tests and headless runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }
}
