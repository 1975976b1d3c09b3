//! Error taxonomy for generation and room transitions.
//!
//! Optional-room placement failures are not errors at all; the generator
//! logs and skips them so a run always comes out playable. The variants
//! here are the cases the caller genuinely has to handle.

use thiserror::Error;

use crate::dungeon::Coord;

/// A run could not be generated at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("template catalog has no start-role template")]
    MissingStartTemplate,

    #[error("room count must be at least 1, got {0}")]
    BadRoomCount(usize),
}

/// A room crossing hit broken level state. The crossing is aborted and the
/// player stays where they were; the session keeps running.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("no room entry at destination {coord}; crossing reverted")]
    MissingRoom { coord: Coord },

    #[error("no room entry at the player's own cell {coord}")]
    MissingCurrentRoom { coord: Coord },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransitionError::MissingRoom {
            coord: Coord::new(2, -1),
        };
        assert!(err.to_string().contains("2,-1"));
        assert!(err.to_string().contains("reverted"));

        let err = GenerationError::BadRoomCount(0);
        assert!(err.to_string().contains("at least 1"));
    }
}
