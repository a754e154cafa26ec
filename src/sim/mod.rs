//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-locked timestep only
//! - Stable iteration order (row-major enemies, cluster-major barriers)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Rect, intersects};
pub use state::{
    BarrierBlock, EndReason, Enemy, Formation, GameEvent, Player, Projectile, Session,
    SessionStatus, World, spawn_barriers, spawn_enemy_grid,
};
pub use tick::{TickInput, tick, try_fire};
