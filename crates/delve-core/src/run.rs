//! Run lifecycle state.
//!
//! A [`RunState`] is the whole run in one value: the floor, the golden
//! path attempt, the player's cell and keys, and the RNG mid-stream. It
//! serializes as a unit, so saving and reloading resumes exactly where
//! the run left off.

use delve_rng::{DeterministicRng, Seed};
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::dungeon::{
    generate, Coord, GoldenPath, LevelMap, RoomEntry, SpecialRooms, TemplateCatalog, Vec2,
};
use crate::errors::GenerationError;
use crate::hooks::{ProgressStore, KEY_GOLDEN_FAILED, KEY_GOLDEN_INDEX, KEY_SEED};

/// Keys the player is carrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyRing {
    /// Consumable standard keys.
    pub keys: u32,
    /// Held once, never spent.
    pub house_key: bool,
    pub matrix_key: bool,
}

/// Everything one run carries between rooms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub rng: DeterministicRng,
    pub map: LevelMap,
    pub golden: GoldenPath,
    pub special: SpecialRooms,
    pub player_cell: Coord,
    /// Player position in room-local pixels.
    pub player_pos: Vec2,
    pub keys: KeyRing,
    /// When the current room was entered (ms).
    pub entered_at_ms: u64,
    /// Entry freeze deadline: enemies stand still and the player is
    /// untouchable until then.
    pub freeze_until_ms: u64,
    pub fast_clear_streak: u32,
}

impl RunState {
    /// Roll a new run: prime the RNG from `seed`, generate the floor, and
    /// record the attempt in the progress store. The player starts in the
    /// center of the origin room.
    pub fn new_run(
        seed: impl Into<Seed>,
        room_count: usize,
        catalog: &TemplateCatalog,
        config: &GenerationConfig,
        store: &mut dyn ProgressStore,
    ) -> Result<Self, GenerationError> {
        let seed = seed.into();
        let mut rng = DeterministicRng::with_seed(seed.clone());
        let level = generate(room_count, &mut rng, catalog, config)?;

        store.write(KEY_SEED, &seed.label());
        store.write(KEY_GOLDEN_INDEX, "0");
        store.write(KEY_GOLDEN_FAILED, "0");

        let player_pos = level
            .map
            .get(Coord::ORIGIN)
            .map(|entry| entry.room.center())
            .unwrap_or(Vec2::ZERO);
        Ok(Self {
            rng,
            map: level.map,
            golden: level.golden,
            special: level.special,
            player_cell: Coord::ORIGIN,
            player_pos,
            keys: KeyRing::default(),
            entered_at_ms: 0,
            freeze_until_ms: 0,
            fast_clear_streak: 0,
        })
    }

    /// The room entry the player is standing in.
    pub fn current_room(&self) -> Option<&RoomEntry> {
        self.map.get(self.player_cell)
    }

    /// Seed label this run was rolled from, for save metadata.
    pub fn seed_label(&self) -> Option<&str> {
        self.rng.seed_label()
    }

    /// Whether entry freeze still protects the player at `now_ms`.
    pub fn is_frozen(&self, now_ms: u64) -> bool {
        now_ms < self.freeze_until_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{RoomRole, RoomTemplate};
    use crate::hooks::MemoryStore;

    fn catalog() -> TemplateCatalog {
        let mut catalog = TemplateCatalog::new();
        catalog.insert(RoomTemplate::new("start", RoomRole::Start));
        catalog.insert(RoomTemplate::new("plain", RoomRole::Normal));
        catalog.insert(RoomTemplate::new("boss", RoomRole::Boss));
        catalog
    }

    #[test]
    fn test_new_run_starts_at_origin_center() {
        let mut store = MemoryStore::new();
        let run = RunState::new_run(
            "first-light",
            5,
            &catalog(),
            &GenerationConfig::default(),
            &mut store,
        )
        .unwrap();
        assert_eq!(run.player_cell, Coord::ORIGIN);
        let center = run.current_room().unwrap().room.center();
        assert_eq!(run.player_pos, center);
        assert_eq!(run.keys, KeyRing::default());
        assert_eq!(run.seed_label(), Some("first-light"));
        assert_eq!(store.read(KEY_SEED).as_deref(), Some("first-light"));
        assert_eq!(store.read(KEY_GOLDEN_INDEX).as_deref(), Some("0"));
        assert_eq!(store.read(KEY_GOLDEN_FAILED).as_deref(), Some("0"));
    }

    #[test]
    fn test_numeric_seed_matches_its_text_form() {
        let mut store = MemoryStore::new();
        let config = GenerationConfig::default();
        let a = RunState::new_run(42i64, 6, &catalog(), &config, &mut store).unwrap();
        let b = RunState::new_run("42", 6, &catalog(), &config, &mut store).unwrap();
        assert_eq!(a.map, b.map);
        assert_eq!(a.golden, b.golden);
        assert_eq!(store.read(KEY_SEED).as_deref(), Some("42"));
    }

    #[test]
    fn test_run_state_serialization_round_trip() {
        let mut store = MemoryStore::new();
        let mut run = RunState::new_run(
            "persist",
            4,
            &catalog(),
            &GenerationConfig::default(),
            &mut store,
        )
        .unwrap();
        run.keys.keys = 2;
        run.entered_at_ms = 1_234;
        let text = serde_json::to_string(&run).unwrap();
        let back: RunState = serde_json::from_str(&text).unwrap();
        assert_eq!(back.map, run.map);
        assert_eq!(back.golden, run.golden);
        assert_eq!(back.keys, run.keys);
        assert_eq!(back.entered_at_ms, run.entered_at_ms);
        // the restored RNG continues the same stream
        let mut rng_a = run.rng.clone();
        let mut rng_b = back.rng;
        assert_eq!(rng_a.rn2(1_000), rng_b.rn2(1_000));
    }

    #[test]
    fn test_freeze_window() {
        let mut store = MemoryStore::new();
        let mut run = RunState::new_run(
            "freeze",
            3,
            &catalog(),
            &GenerationConfig::default(),
            &mut store,
        )
        .unwrap();
        run.freeze_until_ms = 800;
        assert!(run.is_frozen(799));
        assert!(!run.is_frozen(800));
    }
}
