//! The room crossing protocol.
//!
//! [`TransitionEngine::try_cross`] is the only way the player moves between
//! cells. A request passes through the gates in a fixed order: door
//! presence, activity, visibility, trigger geometry, dwell time, locks,
//! and the combat gate. Only a request that clears every gate mutates any
//! state, so a refused or failed crossing leaves the run exactly as it
//! was.

use super::phase::{room_phase, PhaseShift, RoomPhase};
use super::snapshot::{capture_room, restore_room};
use crate::dungeon::{Coord, DoorLock, PathEvent, RoomInstance, Side, Vec2};
use crate::errors::TransitionError;
use crate::hooks::{
    EntityHost, ProgressStore, RewardEvent, RewardSink, KEY_GOLDEN_FAILED, KEY_GOLDEN_INDEX,
};
use crate::run::RunState;
use crate::{
    DOOR_HALF_SPAN, DOOR_TRIGGER_BAND, ENTRY_DWELL_MS, ENTRY_FREEZE_MS, FAST_CLEAR_MS, SPAWN_GAP,
};

/// One attempt to walk through a door.
#[derive(Debug, Clone, Copy)]
pub struct CrossRequest {
    /// Which wall the player is pushing into. Doubles as the held
    /// movement direction.
    pub side: Side,
    /// Player position in room-local pixels.
    pub player_pos: Vec2,
    /// Explicit confirm press, required to spend a key.
    pub confirm: bool,
}

/// Why a crossing did not happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    /// No door on that wall at all.
    NoDoor,
    /// A door exists but leads nowhere this floor.
    Inactive,
    /// The door is still hidden.
    Hidden,
    /// The player is not standing in the door's trigger strip.
    OutOfBand,
    /// Too soon after entering this room.
    Dwell,
    /// The lock wants an explicit confirm press.
    NeedsConfirm(DoorLock),
    /// The lock wants a key the player does not hold.
    MissingKey(DoorLock),
    /// Hostiles hold the room shut.
    RoomLocked,
}

/// Everything the runtime needs to present a completed crossing.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomChange {
    pub from: Coord,
    pub to: Coord,
    /// Side of the new room the player came in through.
    pub entry_side: Side,
    /// Player position in the new room, flush with the entry door.
    pub spawn_pos: Vec2,
    /// Enemies stand still and the player is untouchable until this time.
    pub freeze_until_ms: u64,
    pub first_visit: bool,
    /// What the step meant for the golden path attempt.
    pub path_event: PathEvent,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CrossOutcome {
    Moved(RoomChange),
    Blocked(BlockReason),
}

/// Drives crossings and room phase for one run.
///
/// The engine holds no level data itself; everything lives in the
/// [`RunState`] so a run serializes without it.
#[derive(Debug, Clone, Default)]
pub struct TransitionEngine {
    phase: RoomPhase,
}

impl TransitionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase of the room the player is in, as of the last settle.
    pub fn phase(&self) -> RoomPhase {
        self.phase
    }

    /// Put the player into the starting room of a fresh or reloaded run.
    pub fn begin(
        &mut self,
        run: &mut RunState,
        host: &mut dyn EntityHost,
        now_ms: u64,
    ) -> Result<(), TransitionError> {
        let coord = run.player_cell;
        let entry = run
            .map
            .get_mut(coord)
            .ok_or(TransitionError::MissingCurrentRoom { coord })?;
        host.clear_room();
        if !entry.visited {
            entry.visited = true;
            host.populate_from_template(&entry.room);
        }
        run.entered_at_ms = now_ms;
        run.freeze_until_ms = now_ms + ENTRY_FREEZE_MS;
        self.phase = room_phase(&entry.room, &host.live_entities());
        Ok(())
    }

    /// Re-evaluate the current room's phase and pay out a clear if one
    /// just happened. Call whenever the live entity set may have changed.
    pub fn settle_phase(
        &mut self,
        run: &mut RunState,
        host: &dyn EntityHost,
        rewards: &mut dyn RewardSink,
        now_ms: u64,
    ) -> Option<PhaseShift> {
        let entry = run.map.get_mut(run.player_cell)?;
        let next = room_phase(&entry.room, &host.live_entities());
        if next == self.phase {
            return None;
        }
        self.phase = next;
        match next {
            RoomPhase::Locked => Some(PhaseShift::Sealed),
            RoomPhase::Unlocked => {
                entry.cleared = true;
                if !entry.bonus_awarded {
                    entry.bonus_awarded = true;
                    let fast = now_ms.saturating_sub(run.entered_at_ms) <= FAST_CLEAR_MS;
                    if fast {
                        run.fast_clear_streak += 1;
                    } else {
                        run.fast_clear_streak = 0;
                    }
                    rewards.reward(RewardEvent::RoomCleared {
                        coord: run.player_cell,
                        fast,
                        streak: run.fast_clear_streak,
                    });
                }
                if !run.golden.failed()
                    && run.golden.current_cell() == run.player_cell
                    && !entry.golden_bonus_awarded
                {
                    entry.golden_bonus_awarded = true;
                    rewards.reward(RewardEvent::GoldenStep {
                        index: run.golden.current_index(),
                    });
                }
                Some(PhaseShift::Opened)
            }
        }
    }

    /// Attempt the crossing described by `req`.
    ///
    /// `Ok(Blocked(_))` is the normal refusal path. `Err` means the level
    /// data itself is broken: the door points at a cell that does not
    /// exist. Nothing has been mutated in that case.
    pub fn try_cross(
        &mut self,
        run: &mut RunState,
        host: &mut dyn EntityHost,
        rewards: &mut dyn RewardSink,
        store: &mut dyn ProgressStore,
        req: CrossRequest,
        now_ms: u64,
    ) -> Result<CrossOutcome, TransitionError> {
        // pick up any clear since the last tick so its rewards are not
        // lost to the crossing
        self.settle_phase(run, host, rewards, now_ms);

        let from = run.player_cell;
        let entry = run
            .map
            .get(from)
            .ok_or(TransitionError::MissingCurrentRoom { coord: from })?;

        let Some(door) = entry.room.door(req.side) else {
            return Ok(CrossOutcome::Blocked(BlockReason::NoDoor));
        };
        if !door.is_active() {
            return Ok(CrossOutcome::Blocked(BlockReason::Inactive));
        }
        if door.is_hidden() {
            return Ok(CrossOutcome::Blocked(BlockReason::Hidden));
        }
        if !in_trigger_band(&entry.room, req.side, door.offset, req.player_pos) {
            return Ok(CrossOutcome::Blocked(BlockReason::OutOfBand));
        }
        if now_ms < run.entered_at_ms + ENTRY_DWELL_MS {
            return Ok(CrossOutcome::Blocked(BlockReason::Dwell));
        }

        let forced = door.is_forced_open();
        let in_secret = entry.room.is_secret;
        let mut spend_key = false;
        match door.lock {
            DoorLock::None => {}
            // leaving a secret room is free, and a breached lock is moot
            DoorLock::Key if forced || in_secret => {}
            DoorLock::Key => {
                if !req.confirm {
                    return Ok(CrossOutcome::Blocked(BlockReason::NeedsConfirm(
                        DoorLock::Key,
                    )));
                }
                if run.keys.keys == 0 {
                    return Ok(CrossOutcome::Blocked(BlockReason::MissingKey(
                        DoorLock::Key,
                    )));
                }
                spend_key = true;
            }
            lock @ (DoorLock::HouseKey | DoorLock::MatrixKey) if !forced => {
                if !req.confirm {
                    return Ok(CrossOutcome::Blocked(BlockReason::NeedsConfirm(lock)));
                }
                let held = match lock {
                    DoorLock::HouseKey => run.keys.house_key,
                    _ => run.keys.matrix_key,
                };
                if !held {
                    return Ok(CrossOutcome::Blocked(BlockReason::MissingKey(lock)));
                }
            }
            _ => {}
        }

        if self.phase == RoomPhase::Locked && !forced {
            return Ok(CrossOutcome::Blocked(BlockReason::RoomLocked));
        }

        let to = from.step(req.side);
        if !run.map.contains(to) {
            log::error!(
                "door at {from} ({:?}) leads to missing cell {to}; crossing reverted",
                req.side
            );
            return Err(TransitionError::MissingRoom { coord: to });
        }

        // past the gates: snapshot and tear down the room being left
        if let Some(entry) = run.map.get_mut(from) {
            capture_room(entry, host);
        }
        host.clear_room();
        if spend_key {
            run.keys.keys -= 1;
            run.map.unlock_pair(from, req.side);
            rewards.reward(RewardEvent::KeyUsed {
                lock: DoorLock::Key,
            });
        }

        let first_visit = restore_room(&mut run.map, to, host, now_ms)?;

        run.player_cell = to;
        let entry_side = req.side.opposite();
        let spawn_pos = match run.map.get(to) {
            Some(entry) => entry_spawn(&entry.room, entry_side),
            None => Vec2::ZERO,
        };
        run.player_pos = spawn_pos;
        run.entered_at_ms = now_ms;
        run.freeze_until_ms = now_ms + ENTRY_FREEZE_MS;
        self.phase = match run.map.get(to) {
            Some(entry) => room_phase(&entry.room, &host.live_entities()),
            None => RoomPhase::Unlocked,
        };

        let path_event = run.golden.observe_entry(to);
        store.write(KEY_GOLDEN_INDEX, &run.golden.current_index().to_string());
        store.write(KEY_GOLDEN_FAILED, if run.golden.failed() { "1" } else { "0" });
        if let PathEvent::Completed { length } = path_event {
            rewards.reward(RewardEvent::GoldenPathComplete { length });
        }

        Ok(CrossOutcome::Moved(RoomChange {
            from,
            to,
            entry_side,
            spawn_pos,
            freeze_until_ms: run.freeze_until_ms,
            first_visit,
            path_event,
        }))
    }
}

/// Whether `pos` stands in the trigger strip of the door at `offset` on
/// `side`: within the band depth of that wall and within the door's half
/// span along it.
fn in_trigger_band(room: &RoomInstance, side: Side, offset: f32, pos: Vec2) -> bool {
    let (along, depth) = match side {
        Side::North => (pos.x, pos.y),
        Side::South => (pos.x, room.pixel_height() - pos.y),
        Side::West => (pos.y, pos.x),
        Side::East => (pos.y, room.pixel_width() - pos.x),
    };
    depth <= DOOR_TRIGGER_BAND && (along - offset).abs() <= DOOR_HALF_SPAN
}

/// Where the player lands after entering through `entry_side`: flush with
/// that door, nudged one spawn gap into the room.
fn entry_spawn(room: &RoomInstance, entry_side: Side) -> Vec2 {
    let offset = match room.door(entry_side) {
        Some(door) => door.offset,
        None => room.side_midpoint(entry_side),
    };
    match entry_side {
        Side::North => Vec2::new(offset, SPAWN_GAP),
        Side::South => Vec2::new(offset, room.pixel_height() - SPAWN_GAP),
        Side::West => Vec2::new(SPAWN_GAP, offset),
        Side::East => Vec2::new(room.pixel_width() - SPAWN_GAP, offset),
    }
}
