//! Door state on one side of a room.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// What a door demands before it lets the player through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum DoorLock {
    #[default]
    None = 0,
    /// Consumes one key from the key pouch.
    Key = 1,
    /// Requires the unique house key flag; not consumed.
    HouseKey = 2,
    /// Requires the unique matrix key flag; not consumed.
    MatrixKey = 3,
}

impl DoorLock {
    /// Unique keys are possession flags rather than counted items.
    pub const fn is_unique(&self) -> bool {
        matches!(self, DoorLock::HouseKey | DoorLock::MatrixKey)
    }
}

bitflags! {
    /// Door connectivity and visibility flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DoorFlags: u8 {
        /// A neighbor room exists behind this side.
        const ACTIVE = 0x01;
        /// Drawn as plain wall until revealed by a breach.
        const HIDDEN = 0x02;
        /// Blown or forced open; bypasses lock and combat gate.
        const FORCED_OPEN = 0x04;
    }
}

// Manual serde impl for DoorFlags
impl Serialize for DoorFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DoorFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DoorFlags::from_bits_truncate(bits))
    }
}

/// One side's door. `offset` is the door center measured along that side in
/// world units from the room's northwest corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub flags: DoorFlags,
    pub lock: DoorLock,
    pub offset: f32,
}

impl Door {
    /// An inactive placeholder, as carried over from a template hint.
    pub fn sealed(offset: f32) -> Self {
        Self {
            flags: DoorFlags::empty(),
            lock: DoorLock::None,
            offset,
        }
    }

    /// An active, visible, unlocked door.
    pub fn open(offset: f32) -> Self {
        Self {
            flags: DoorFlags::ACTIVE,
            lock: DoorLock::None,
            offset,
        }
    }

    pub const fn is_active(&self) -> bool {
        self.flags.contains(DoorFlags::ACTIVE)
    }

    pub const fn is_hidden(&self) -> bool {
        self.flags.contains(DoorFlags::HIDDEN)
    }

    pub const fn is_forced_open(&self) -> bool {
        self.flags.contains(DoorFlags::FORCED_OPEN)
    }

    pub fn set_active(&mut self, active: bool) {
        self.flags.set(DoorFlags::ACTIVE, active);
    }

    pub fn set_hidden(&mut self, hidden: bool) {
        self.flags.set(DoorFlags::HIDDEN, hidden);
    }

    pub fn set_forced_open(&mut self, forced: bool) {
        self.flags.set(DoorFlags::FORCED_OPEN, forced);
    }

    /// Blast damage: the door is forced open and can no longer hide.
    pub fn breach(&mut self) {
        self.flags.insert(DoorFlags::FORCED_OPEN);
        self.flags.remove(DoorFlags::HIDDEN);
    }
}
