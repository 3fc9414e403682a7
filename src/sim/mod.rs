//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in through `FrameContext`, sampled once per tick
//! - Seeded RNG only
//! - Stable iteration order (entity lists stay sorted by id)
//! - Structural changes only at the per-frame commit
//! - No rendering or platform dependencies beyond the `platform` traits

pub mod absorb;
pub mod consume;
pub mod dlist;
pub mod movement;
pub mod separation;
pub mod state;
pub mod steering;
pub mod world;

pub use absorb::AbsorptionEffect;
pub use consume::{Bite, grown_size, try_consume, within_reach};
pub use dlist::{CommitStats, Deferred, DeferredList};
pub use movement::advance;
pub use separation::separate;
pub use state::{
    Bounds, Color, Component, Entity, EntityId, EntityRef, FrameContext, Position, Size, Speed,
    Team, TeamId, Velocity,
};
pub use steering::steer;
pub use world::World;
