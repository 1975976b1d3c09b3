//! delve-core: procedural floor generation and room transitions for a
//! top-down action roguelike.
//!
//! This crate contains the run's whole spatial state machine with no I/O
//! dependencies: a seed-driven floor generator, the golden path tracker,
//! and the engine that moves the player between rooms while persisting
//! what each room held. Rendering, physics, entity behavior, and disk
//! access all live behind the traits in [`hooks`].

pub mod config;
pub mod dungeon;
pub mod engine;
pub mod errors;
pub mod hooks;
pub mod records;

mod consts;
mod run;

pub use consts::*;
pub use delve_rng::{DeterministicRng, Seed};
pub use run::{KeyRing, RunState};
