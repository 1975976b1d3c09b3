//! Room combat phase.
//!
//! A room is locked while anything hostile enough to hold it is alive, and
//! unlocked otherwise. Secret rooms never lock. The phase is a pure
//! function of the room and the live entity list, so it can be recomputed
//! whenever either changes.

use crate::dungeon::RoomInstance;
use crate::records::LiveEntity;

/// Whether the current room holds its doors shut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomPhase {
    #[default]
    Unlocked,
    Locked,
}

/// A phase transition the engine observed and acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseShift {
    /// Hostiles appeared; the doors sealed.
    Sealed,
    /// The last lock-holding hostile fell; the doors opened.
    Opened,
}

/// Compute the phase for `room` given the entities currently alive in it.
pub fn room_phase(room: &RoomInstance, entities: &[LiveEntity]) -> RoomPhase {
    if room.is_secret {
        return RoomPhase::Unlocked;
    }
    if entities.iter().any(|e| e.holds_room_locked()) {
        RoomPhase::Locked
    } else {
        RoomPhase::Unlocked
    }
}
