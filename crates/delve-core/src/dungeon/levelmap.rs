//! The per-run map from grid coordinate to generated room.

use hashbrown::HashMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

use super::coord::{Coord, Side};
use super::door::DoorLock;
use super::room::RoomInstance;
use super::template::RoomRole;
use crate::records::{BombRecord, ChestRecord, EnemyRecord, ItemRecord};

/// One generated room plus everything the engine tracks about it across
/// visits. Snapshot arrays are written on exit and consumed on the next
/// re-entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomEntry {
    pub room: RoomInstance,
    /// Entered at least once; decides template spawn vs. snapshot restore.
    pub visited: bool,
    pub cleared: bool,
    /// Clear reward fired; never fires twice for one room.
    pub bonus_awarded: bool,
    /// Golden-path clear bonus fired for this room.
    pub golden_bonus_awarded: bool,
    pub saved_enemies: Option<Vec<EnemyRecord>>,
    pub saved_bombs: Option<Vec<BombRecord>>,
    pub saved_items: Option<Vec<ItemRecord>>,
    pub saved_chests: Option<Vec<ChestRecord>>,
}

impl RoomEntry {
    pub fn new(room: RoomInstance) -> Self {
        Self {
            room,
            visited: false,
            cleared: false,
            bonus_awarded: false,
            golden_bonus_awarded: false,
            saved_enemies: None,
            saved_bombs: None,
            saved_items: None,
            saved_chests: None,
        }
    }
}

/// Mapping from coordinate to room entry. Owned by the run, rebuilt from
/// scratch on every new seed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelMap {
    rooms: HashMap<Coord, RoomEntry>,
}

impl LevelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, coord: Coord, entry: RoomEntry) {
        self.rooms.insert(coord, entry);
    }

    pub fn get(&self, coord: Coord) -> Option<&RoomEntry> {
        self.rooms.get(&coord)
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut RoomEntry> {
        self.rooms.get_mut(&coord)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.rooms.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Coord, &RoomEntry)> {
        self.rooms.iter()
    }

    /// Coordinates sorted by `(y, x)`. Map iteration order is arbitrary;
    /// use this wherever the walk order can be observed.
    pub fn sorted_coords(&self) -> Vec<Coord> {
        let mut coords: Vec<Coord> = self.rooms.keys().copied().collect();
        coords.sort_by_key(|c| (c.y, c.x));
        coords
    }

    /// Breach the door pair between `coord` and its neighbor on `side`.
    /// Both directions open together, the way a blown wall reads from
    /// either room. Inactive doors are never breached.
    pub fn breach_pair(&mut self, coord: Coord, side: Side) -> bool {
        let mut changed = false;
        if let Some(entry) = self.rooms.get_mut(&coord)
            && let Some(door) = entry.room.door_mut(side)
            && door.is_active()
        {
            door.breach();
            changed = true;
        }
        if changed
            && let Some(entry) = self.rooms.get_mut(&coord.step(side))
            && let Some(door) = entry.room.door_mut(side.opposite())
            && door.is_active()
        {
            door.breach();
        }
        changed
    }

    /// Clear the lock on the door pair between `coord` and its neighbor on
    /// `side`. Used when a spent key opens a door for good.
    pub fn unlock_pair(&mut self, coord: Coord, side: Side) {
        if let Some(entry) = self.rooms.get_mut(&coord)
            && let Some(door) = entry.room.door_mut(side)
        {
            door.lock = DoorLock::None;
        }
        if let Some(entry) = self.rooms.get_mut(&coord.step(side))
            && let Some(door) = entry.room.door_mut(side.opposite())
        {
            door.lock = DoorLock::None;
        }
    }

    /// Integrity sweep: every active door must lead to an existing entry
    /// whose opposite door is active too. Returns one message per fault.
    pub fn validate(&self) -> Vec<String> {
        let mut faults = Vec::new();
        for coord in self.sorted_coords() {
            let Some(entry) = self.get(coord) else {
                continue;
            };
            for side in Side::ALL {
                let Some(door) = entry.room.door(side) else {
                    continue;
                };
                if !door.is_active() {
                    continue;
                }
                let neighbor = coord.step(side);
                match self.get(neighbor) {
                    None => faults.push(format!(
                        "active door at {coord} {side} leads to missing cell {neighbor}"
                    )),
                    Some(other) => {
                        let paired = other
                            .room
                            .door(side.opposite())
                            .is_some_and(|d| d.is_active());
                        if !paired {
                            faults.push(format!(
                                "door pair {coord} {side} is one-way into {neighbor}"
                            ));
                        }
                    }
                }
            }
        }
        faults
    }

    /// ASCII sketch of the floor, one glyph per cell, for logs and tests.
    pub fn render(&self) -> String {
        if self.rooms.is_empty() {
            return String::new();
        }
        let min_x = self.rooms.keys().map(|c| c.x).min().unwrap_or(0);
        let max_x = self.rooms.keys().map(|c| c.x).max().unwrap_or(0);
        let min_y = self.rooms.keys().map(|c| c.y).min().unwrap_or(0);
        let max_y = self.rooms.keys().map(|c| c.y).max().unwrap_or(0);

        let mut out = String::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let glyph = match self.get(Coord::new(x, y)) {
                    Some(entry) => role_glyph(entry.room.role),
                    None => ' ',
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

fn role_glyph(role: RoomRole) -> char {
    match role {
        RoomRole::Start => 'S',
        RoomRole::Normal => '.',
        RoomRole::Boss => 'B',
        RoomRole::Shop => '$',
        RoomRole::Upgrade => 'U',
        RoomRole::Secret => '?',
        RoomRole::Trophy => 'T',
        RoomRole::Home => 'H',
        RoomRole::Matrix => 'M',
    }
}

// Serde writes the map with "x,y" string keys so the JSON form is readable
// and key order independent.
impl Serialize for LevelMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut ser_map = serializer.serialize_map(Some(self.rooms.len()))?;
        for coord in self.sorted_coords() {
            if let Some(entry) = self.get(coord) {
                ser_map.serialize_entry(&coord.key(), entry)?;
            }
        }
        ser_map.end()
    }
}

impl<'de> Deserialize<'de> for LevelMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct LevelMapVisitor;

        impl<'de> Visitor<'de> for LevelMapVisitor {
            type Value = LevelMap;

            fn expecting(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
                f.write_str("a map with \"x,y\" string keys")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut rooms = HashMap::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, RoomEntry>()? {
                    let coord = Coord::parse_key(&key)
                        .ok_or_else(|| de::Error::custom(format!("invalid cell key: {key}")))?;
                    rooms.insert(coord, value);
                }
                Ok(LevelMap { rooms })
            }
        }

        deserializer.deserialize_map(LevelMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Door, RoomTemplate};

    fn blank_room(role: RoomRole) -> RoomInstance {
        RoomInstance::from_template(&RoomTemplate::new(format!("{role}"), role))
    }

    fn linked_pair() -> LevelMap {
        let mut map = LevelMap::new();
        let a = Coord::ORIGIN;
        let b = Coord::new(1, 0);
        let mut room_a = blank_room(RoomRole::Start);
        let mut room_b = blank_room(RoomRole::Normal);
        *room_a.ensure_door(Side::East) = Door::open(100.0);
        *room_b.ensure_door(Side::West) = Door::open(100.0);
        map.insert(a, RoomEntry::new(room_a));
        map.insert(b, RoomEntry::new(room_b));
        map
    }

    #[test]
    fn test_serde_round_trips_with_string_keys() {
        let map = linked_pair();
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("\"0,0\""));
        assert!(json.contains("\"1,0\""));
        let back: LevelMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_validate_accepts_linked_pair() {
        assert!(linked_pair().validate().is_empty());
    }

    #[test]
    fn test_validate_flags_dangling_door() {
        let mut map = linked_pair();
        let mut stray = blank_room(RoomRole::Normal);
        *stray.ensure_door(Side::North) = Door::open(40.0);
        map.insert(Coord::new(5, 5), RoomEntry::new(stray));

        let faults = map.validate();
        assert_eq!(faults.len(), 1);
        assert!(faults[0].contains("missing cell"));
    }

    #[test]
    fn test_validate_flags_one_way_door() {
        let mut map = linked_pair();
        map.get_mut(Coord::new(1, 0))
            .unwrap()
            .room
            .door_mut(Side::West)
            .unwrap()
            .set_active(false);

        let faults = map.validate();
        assert_eq!(faults.len(), 1);
        assert!(faults[0].contains("one-way"));
    }

    #[test]
    fn test_breach_pair_opens_both_directions() {
        let mut map = linked_pair();
        map.get_mut(Coord::ORIGIN)
            .unwrap()
            .room
            .door_mut(Side::East)
            .unwrap()
            .set_hidden(true);

        assert!(map.breach_pair(Coord::ORIGIN, Side::East));

        let east = *map.get(Coord::ORIGIN).unwrap().room.door(Side::East).unwrap();
        assert!(east.is_forced_open());
        assert!(!east.is_hidden());
        let west = *map
            .get(Coord::new(1, 0))
            .unwrap()
            .room
            .door(Side::West)
            .unwrap();
        assert!(west.is_forced_open());
    }

    #[test]
    fn test_breach_pair_ignores_inactive_doors() {
        let mut map = linked_pair();
        map.get_mut(Coord::ORIGIN)
            .unwrap()
            .room
            .door_mut(Side::East)
            .unwrap()
            .set_active(false);
        assert!(!map.breach_pair(Coord::ORIGIN, Side::East));
        assert!(
            !map.get(Coord::new(1, 0))
                .unwrap()
                .room
                .door(Side::West)
                .unwrap()
                .is_forced_open()
        );
    }

    #[test]
    fn test_render_sketch() {
        let map = linked_pair();
        assert_eq!(map.render(), "S.\n");
    }
}
