//! Golden path tracking.
//!
//! The golden path is the generated route from the start cell to the boss
//! cell. Walking it without deviation earns bonuses; one wrong step forfeits
//! them until the player returns to the origin, which resets the attempt.

use serde::{Deserialize, Serialize};

use super::coord::Coord;

/// What one room entry meant for the path attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathEvent {
    /// Stepped onto the next expected path cell.
    Advanced { index: usize },
    /// Stepped onto the final path cell, the boss room, without deviating.
    Completed { length: usize },
    /// Stepped back onto a cell already confirmed this attempt.
    Revisit,
    /// Left the path; the current attempt is forfeit.
    Deviated,
    /// Entered the origin, restarting the attempt.
    Reset,
    /// Moved anywhere while the attempt was already forfeit.
    Off,
}

/// Ordered path cells plus the player's confirmed progress along them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenPath {
    cells: Vec<Coord>,
    current_index: usize,
    failed: bool,
}

impl GoldenPath {
    /// Build from the generator's walk. `cells[0]` must be the origin.
    pub fn new(cells: Vec<Coord>) -> Self {
        debug_assert!(!cells.is_empty());
        debug_assert_eq!(cells.first(), Some(&Coord::ORIGIN));
        Self {
            cells,
            current_index: 0,
            failed: false,
        }
    }

    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Index of the furthest confirmed cell this attempt.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The furthest confirmed cell itself.
    pub fn current_cell(&self) -> Coord {
        self.cells[self.current_index.min(self.cells.len() - 1)]
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    /// The boss cell, last on the path.
    pub fn boss_cell(&self) -> Coord {
        self.cells[self.cells.len() - 1]
    }

    /// Whether `coord` lies on the path at all.
    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains(&coord)
    }

    /// Whether the attempt has reached the boss cell unbroken.
    pub fn is_complete(&self) -> bool {
        !self.failed && self.current_index == self.cells.len() - 1
    }

    /// Record that the player entered `coord` and classify the step.
    pub fn observe_entry(&mut self, coord: Coord) -> PathEvent {
        if coord == self.cells[0] {
            self.current_index = 0;
            self.failed = false;
            return PathEvent::Reset;
        }
        if self.failed {
            return PathEvent::Off;
        }
        let next = self.current_index + 1;
        if next < self.cells.len() && coord == self.cells[next] {
            self.current_index = next;
            if next == self.cells.len() - 1 {
                return PathEvent::Completed {
                    length: self.cells.len(),
                };
            }
            return PathEvent::Advanced { index: next };
        }
        if self.cells[..=self.current_index].contains(&coord) {
            return PathEvent::Revisit;
        }
        self.failed = true;
        PathEvent::Deviated
    }
}
