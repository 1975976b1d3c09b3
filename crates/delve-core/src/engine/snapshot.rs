//! Room state capture and restore.
//!
//! Leaving a room snapshots what matters into its [`RoomEntry`]; entering
//! one either plays the template for the first visit or replays the
//! snapshot. Snapshots are consumed on restore, so each exit writes a
//! fresh one.

use crate::BLAST_RADIUS;
use crate::dungeon::{Coord, LevelMap, RoomEntry, Side, Vec2};
use crate::errors::TransitionError;
use crate::hooks::EntityHost;
use crate::records::BombRecord;

/// Snapshot the host's live room state into `entry`.
///
/// Dead enemies, player summons, and plain ghosts are dropped; an empty
/// survivor list marks the room cleared. Armed explosives keep their
/// absolute detonation timestamps.
pub(crate) fn capture_room(entry: &mut RoomEntry, host: &dyn EntityHost) {
    let enemies: Vec<_> = host
        .live_entities()
        .iter()
        .filter(|e| e.should_persist())
        .map(|e| e.record.clone())
        .collect();
    let bombs: Vec<_> = host
        .live_bombs()
        .iter()
        .filter(|b| b.should_persist())
        .map(|b| b.record.clone())
        .collect();
    if enemies.is_empty() {
        entry.cleared = true;
    }
    entry.saved_enemies = Some(enemies);
    entry.saved_bombs = Some(bombs);
    entry.saved_items = Some(host.floor_items());
    entry.saved_chests = Some(host.chests());
}

/// Bring the room at `coord` to life in the host.
///
/// First visit spawns from the template and returns `Ok(true)`. Later
/// visits consume the snapshot: enemies, items, and chests come back as
/// recorded, still-ticking explosives respawn, and explosives whose
/// timestamp has passed detonate on the spot instead.
pub(crate) fn restore_room(
    map: &mut LevelMap,
    coord: Coord,
    host: &mut dyn EntityHost,
    now_ms: u64,
) -> Result<bool, TransitionError> {
    let entry = map
        .get_mut(coord)
        .ok_or(TransitionError::MissingRoom { coord })?;
    if !entry.visited {
        entry.visited = true;
        host.populate_from_template(&entry.room);
        return Ok(true);
    }

    let enemies = entry.saved_enemies.take().unwrap_or_default();
    let bombs = entry.saved_bombs.take().unwrap_or_default();
    let items = entry.saved_items.take().unwrap_or_default();
    let chests = entry.saved_chests.take().unwrap_or_default();

    host.spawn_enemies(&enemies);
    let (pending, expired): (Vec<BombRecord>, Vec<BombRecord>) =
        bombs.into_iter().partition(|b| b.fires_at_ms > now_ms);
    host.spawn_bombs(&pending);
    host.spawn_items(&items);
    host.spawn_chests(&chests);

    // fuses that ran out while the room was unloaded go off now, at their
    // recorded spot
    for bomb in &expired {
        let opened = apply_blast(map, coord, bomb.pos);
        if !opened.is_empty() {
            log::debug!(
                "stale explosive at {coord} breached {} door(s)",
                opened.len()
            );
        }
    }
    Ok(false)
}

/// Breach every active door of the room at `coord` within blast radius of
/// `origin`. Returns the sides opened. The same path serves a live
/// detonation and a stale one discovered on re-entry.
pub fn apply_blast(map: &mut LevelMap, coord: Coord, origin: Vec2) -> Vec<Side> {
    let Some(entry) = map.get(coord) else {
        return Vec::new();
    };
    let mut hit = Vec::new();
    for side in Side::ALL {
        if let Some(door) = entry.room.door(side)
            && door.is_active()
            && let Some(pos) = entry.room.door_position(side)
            && pos.distance(origin) <= BLAST_RADIUS
        {
            hit.push(side);
        }
    }
    for &side in &hit {
        map.breach_pair(coord, side);
    }
    hit
}
