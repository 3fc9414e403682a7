//! Absorb Arena - simulation core for an absorb-to-grow arena game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, deferred lists, systems, world)
//! - `platform`: Rendering, input and clock seams supplied by the host
//! - `settings`: Session bootstrap and tuning values

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, Settings};
pub use sim::World;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep used by the headless clock (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Edge tolerance added to the combined radii when testing for a bite
    pub const EAT_MARGIN: f32 = 0.05;

    /// Rate at which overlapping players are pushed apart (arena units/s per unit overlap)
    pub const PUSH_SPEED: f32 = 10.0;
    /// Stand-in offset length when two centers coincide exactly
    pub const PUSH_EPSILON: f32 = 0.01;

    /// Length of the absorption animation in seconds
    pub const ABSORB_DURATION: f32 = 0.2;

    /// Food defaults
    pub const FOOD_SIZE: f32 = 0.025;
    pub const FOOD_COUNT: usize = 50;

    /// Player defaults
    pub const MOVER_SIZE: f32 = 0.05;
    pub const MOVER_MAX_SPEED: f32 = 1.0;
    pub const MOVER_COUNT: usize = 2;
    /// Half-width of the square around the origin players spawn in
    pub const MOVER_SPAWN_JITTER: f32 = 0.1;
}
