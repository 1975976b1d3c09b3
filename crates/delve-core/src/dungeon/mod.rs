//! Dungeon structure
//!
//! Contains the cell grid, room templates and instances, doors, the golden
//! path, and the floor generator.

mod coord;
mod door;
mod generation;
mod golden;
mod levelmap;
mod room;
mod stitch;
mod template;

pub use coord::{Coord, Side, Vec2};
pub use door::{Door, DoorFlags, DoorLock};
pub use generation::{generate, GeneratedLevel, SecretPlacement, SpecialRooms, UPGRADE_SLOT};
pub use golden::{GoldenPath, PathEvent};
pub use levelmap::{LevelMap, RoomEntry};
pub use room::RoomInstance;
pub use template::{DoorHint, RoomRole, RoomTemplate, SpawnDesc, TemplateCatalog};
