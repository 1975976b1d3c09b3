//! Feature toggles consumed by the generator.

use serde::{Deserialize, Serialize};

/// Which optional rooms this run may place. The caller resolves meta
/// progression (e.g. whether the upgrade room is unlocked yet) into these
/// flags before generation; the generator itself never reads progression.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub shop: bool,
    pub upgrade_room: bool,
    pub trophy_room: bool,
    pub home_room: bool,
    pub matrix_room: bool,
    /// Template ids for legacy standalone secret rooms, one room per entry.
    /// When the trophy cluster is placed it consumes the first entry.
    pub secret_rooms: Vec<String>,
}

impl GenerationConfig {
    /// Every optional room enabled, no standalone secrets.
    pub fn full() -> Self {
        Self {
            shop: true,
            upgrade_room: true,
            trophy_room: true,
            home_room: true,
            matrix_room: true,
            secret_rooms: Vec::new(),
        }
    }
}
