//! Room transition engine
//!
//! Crossing protocol, combat phase, and room persistence. Everything here
//! mutates the [`RunState`](crate::RunState) through explicit calls;
//! nothing ticks on its own.

mod crossing;
mod phase;
mod snapshot;

pub use crossing::{BlockReason, CrossOutcome, CrossRequest, RoomChange, TransitionEngine};
pub use phase::{room_phase, PhaseShift, RoomPhase};
pub use snapshot::apply_blast;
