//! Invaders - a single-wave Space Invaders simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, tick)
//! - `game`: Session controller and read-only snapshot for renderers
//! - `tuning`: Data-driven game balance
//!
//! Rendering, input capture and UI overlays live outside this crate. They
//! drive [`Game`] once per frame and draw from [`Snapshot`].

pub mod game;
pub mod sim;
pub mod tuning;

pub use game::{Game, Snapshot};
pub use sim::{GameEvent, SessionStatus};
pub use tuning::Tuning;

/// Game configuration constants
///
/// Speeds are pixels per reference frame; the simulation is frame-locked.
pub mod consts {
    /// Frame-relative timestep passed to the simulation (one reference frame)
    pub const FRAME_DT: f32 = 1.0;
    /// Reference display cadence the per-frame speeds are tuned for
    pub const FRAME_RATE_HZ: u32 = 60;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
    /// Inset between the canvas edge and the play boundary
    pub const ARENA_MARGIN: f32 = 20.0;

    /// Player ship
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_SPEED: f32 = 7.0;
    /// Distance from the arena bottom to the player's top edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 80.0;

    /// Single-shot projectile
    pub const PROJECTILE_WIDTH: f32 = 4.0;
    pub const PROJECTILE_HEIGHT: f32 = 20.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;

    /// Enemy grid
    pub const ENEMY_ROWS: usize = 4;
    pub const ENEMY_COLS: usize = 8;
    pub const ENEMY_WIDTH: f32 = 30.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;
    pub const ENEMY_PADDING: f32 = 20.0;
    pub const ENEMY_OFFSET_X: f32 = 80.0;
    pub const ENEMY_OFFSET_Y: f32 = 80.0;

    /// Formation movement
    pub const FORMATION_SPEED: f32 = 2.0;
    pub const FORMATION_DROP: f32 = 30.0;

    /// Barrier clusters
    pub const BARRIER_CENTERS: [f32; 3] = [150.0, 350.0, 550.0];
    pub const BARRIER_BLOCK_SIZE: f32 = 10.0;
    pub const BARRIER_BLOCK_GAP: f32 = 2.0;
    pub const BARRIER_ROWS: usize = 3;
    pub const BARRIER_COLS: usize = 7;
    /// Distance from the arena bottom to the top barrier row
    pub const BARRIER_BOTTOM_OFFSET: f32 = 200.0;

    /// Enemies at or below `ARENA_HEIGHT - INVASION_DEPTH` end the run
    pub const INVASION_DEPTH: f32 = 100.0;

    /// Points per destroyed enemy
    pub const ENEMY_REWARD: u32 = 10;
}
