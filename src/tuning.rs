//! Data-driven game balance
//!
//! Every number the simulation reads comes from a [`Tuning`]. Defaults mirror
//! [`crate::consts`]; a JSON file can override any subset of fields.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Inset play boundary on the left and right edges
    pub arena_margin: f32,

    // === Player ===
    pub player_width: f32,
    pub player_height: f32,
    /// Pixels per frame while a direction is held
    pub player_speed: f32,
    pub player_bottom_offset: f32,

    // === Projectile ===
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,

    // === Enemy grid ===
    pub enemy_rows: usize,
    pub enemy_cols: usize,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_padding: f32,
    pub enemy_offset_x: f32,
    pub enemy_offset_y: f32,

    // === Formation ===
    pub formation_speed: f32,
    /// Vertical drop applied on every direction reversal
    pub formation_drop: f32,

    // === Barriers ===
    /// Horizontal center of each barrier cluster
    pub barrier_centers: Vec<f32>,
    pub barrier_block_size: f32,
    pub barrier_block_gap: f32,
    pub barrier_rows: usize,
    pub barrier_cols: usize,
    pub barrier_bottom_offset: f32,

    // === Rules ===
    pub invasion_depth: f32,
    pub enemy_reward: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            arena_margin: ARENA_MARGIN,

            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,

            projectile_width: PROJECTILE_WIDTH,
            projectile_height: PROJECTILE_HEIGHT,
            projectile_speed: PROJECTILE_SPEED,

            enemy_rows: ENEMY_ROWS,
            enemy_cols: ENEMY_COLS,
            enemy_width: ENEMY_WIDTH,
            enemy_height: ENEMY_HEIGHT,
            enemy_padding: ENEMY_PADDING,
            enemy_offset_x: ENEMY_OFFSET_X,
            enemy_offset_y: ENEMY_OFFSET_Y,

            formation_speed: FORMATION_SPEED,
            formation_drop: FORMATION_DROP,

            barrier_centers: BARRIER_CENTERS.to_vec(),
            barrier_block_size: BARRIER_BLOCK_SIZE,
            barrier_block_gap: BARRIER_BLOCK_GAP,
            barrier_rows: BARRIER_ROWS,
            barrier_cols: BARRIER_COLS,
            barrier_bottom_offset: BARRIER_BOTTOM_OFFSET,

            invasion_depth: INVASION_DEPTH,
            enemy_reward: ENEMY_REWARD,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.assert_valid();
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load tuning from a JSON file, falling back to defaults
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    return tuning;
                }
                Err(e) => log::warn!("Invalid tuning file {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Cannot read tuning file {}: {}", path.display(), e),
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Shape checks. A failure here is a programming error, not user input.
    pub fn assert_valid(&self) {
        assert!(self.enemy_rows > 0 && self.enemy_cols > 0, "enemy grid must be non-empty");
        assert!(!self.barrier_centers.is_empty(), "need at least one barrier cluster");
        assert!(self.barrier_rows > 0 && self.barrier_cols > 0, "barrier cluster must be non-empty");
        assert!(
            self.arena_width > 2.0 * self.arena_margin + self.player_width,
            "arena too narrow for the player"
        );
    }

    /// Player's top-left corner at session start (horizontally centered)
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(
            self.arena_width / 2.0 - self.player_width / 2.0,
            self.arena_height - self.player_bottom_offset,
        )
    }

    pub fn player_min_x(&self) -> f32 {
        self.arena_margin
    }

    pub fn player_max_x(&self) -> f32 {
        self.arena_width - self.player_width - self.arena_margin
    }

    pub fn enemy_size(&self) -> Vec2 {
        Vec2::new(self.enemy_width, self.enemy_height)
    }

    pub fn enemy_origin(&self) -> Vec2 {
        Vec2::new(self.enemy_offset_x, self.enemy_offset_y)
    }

    pub fn barrier_top(&self) -> f32 {
        self.arena_height - self.barrier_bottom_offset
    }

    /// Enemies whose top edge reaches this line have invaded
    pub fn invasion_line(&self) -> f32 {
        self.arena_height - self.invasion_depth
    }
}
