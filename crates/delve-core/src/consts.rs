//! Tuning constants shared by the dungeon and the transition engine.

/// Edge length of one tile in world units.
pub const TILE_SIZE: f32 = 16.0;

/// Default room footprint, in tiles, when a template gives no dimensions.
pub const DEFAULT_ROOM_TILES_X: u32 = 30;
pub const DEFAULT_ROOM_TILES_Y: u32 = 20;

/// Depth of the strip in front of a door that accepts crossing input.
pub const DOOR_TRIGGER_BAND: f32 = 14.0;

/// Half-width of the walkable gap centered on a door's offset.
pub const DOOR_HALF_SPAN: f32 = 24.0;

/// Distance from the arrival door at which the player is placed after a
/// room change. Kept larger than [`DOOR_TRIGGER_BAND`] so a fresh arrival
/// does not stand inside the opposite trigger strip.
pub const SPAWN_GAP: f32 = 18.0;

/// Minimum stay in a room before the next crossing is accepted (ms).
pub const ENTRY_DWELL_MS: u64 = 450;

/// Enemy-freeze and invulnerability window granted after a room change (ms).
pub const ENTRY_FREEZE_MS: u64 = 800;

/// Radius around a detonation inside which doors are breached.
pub const BLAST_RADIUS: f32 = 48.0;

/// Clear time at or under which a room clear counts as fast (ms).
pub const FAST_CLEAR_MS: u64 = 6_000;
