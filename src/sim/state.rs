//! Game state and core simulation types
//!
//! Plain data for every entity in a session, plus the deterministic spawn
//! routines used at start-up and on restart.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::tuning::Tuning;

/// Current status of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// Active gameplay
    Running,
    /// Frozen until toggled back to Running
    Paused,
    /// Every enemy destroyed
    Win,
    /// Formation reached the player or the ground
    Loss,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Win | SessionStatus::Loss)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Running => "RUNNING",
            SessionStatus::Paused => "PAUSED",
            SessionStatus::Win => "WIN",
            SessionStatus::Loss => "LOSS",
        }
    }
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Last enemy destroyed
    Cleared,
    /// An enemy's lower edge reached the player's row
    ReachedPlayer,
    /// An enemy descended past the invasion line
    Invaded,
}

impl EndReason {
    /// Overlay text for the terminal screen
    pub fn message(&self) -> &'static str {
        match self {
            EndReason::Cleared => "ALL INVADERS DESTROYED!",
            EndReason::ReachedPlayer => "ALIENS GOT YOU!",
            EndReason::Invaded => "EARTH INVADED!",
        }
    }
}

/// Notable things that happened during a tick or command
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ProjectileFired,
    /// Projectile left the top of the arena without hitting anything
    ProjectileExpired,
    EnemyDestroyed { index: usize },
    BarrierDestroyed { index: usize },
    FormationReversed { direction: f32 },
    Won,
    Lost { reason: EndReason },
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.player_start(),
            size: Vec2::new(tuning.player_width, tuning.player_height),
            speed: tuning.player_speed,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Muzzle position: horizontal center of the ship's top edge
    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.pos.x + self.size.x / 2.0, self.pos.y)
    }
}

/// The single-shot projectile
///
/// Only one exists per session; `active` says whether it is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward travel per frame
    pub speed: f32,
    pub active: bool,
}

impl Projectile {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(tuning.projectile_width, tuning.projectile_height),
            speed: tuning.projectile_speed,
            active: false,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Put the projectile in flight, centered on `muzzle`
    pub fn launch(&mut self, muzzle: Vec2) {
        self.pos = Vec2::new(muzzle.x - self.size.x / 2.0, muzzle.y);
        self.active = true;
    }
}

/// One member of the formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// One destructible cell of a barrier cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarrierBlock {
    pub pos: Vec2,
    pub size: Vec2,
    pub alive: bool,
}

impl BarrierBlock {
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }
}

/// Shared movement of the enemy formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    pub speed: f32,
    /// +1.0 moving right, -1.0 moving left
    pub direction: f32,
    /// Vertical drop applied on each reversal
    pub drop: f32,
}

impl Formation {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            speed: tuning.formation_speed,
            direction: 1.0,
            drop: tuning.formation_drop,
        }
    }

    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }
}

/// Status, score and outcome of the current run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub status: SessionStatus,
    pub score: u32,
    /// Set once the session reaches a terminal status
    pub end_reason: Option<EndReason>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            status: SessionStatus::Running,
            score: 0,
            end_reason: None,
        }
    }
}

/// Build the enemy grid in row-major order
///
/// Enemy `(row, col)` sits at `origin + (col * (w + padding), row * (h + padding))`.
pub fn spawn_enemy_grid(
    rows: usize,
    cols: usize,
    cell_size: Vec2,
    padding: f32,
    origin: Vec2,
) -> Vec<Enemy> {
    assert!(rows > 0 && cols > 0, "enemy grid must be non-empty");

    let stride = cell_size + Vec2::splat(padding);
    let mut enemies = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            enemies.push(Enemy {
                pos: origin + Vec2::new(col as f32 * stride.x, row as f32 * stride.y),
                size: cell_size,
                alive: true,
            });
        }
    }
    enemies
}

/// Build barrier clusters around each center x
///
/// Block columns are offset by `col - cols / 2` strides from the center, so a
/// cluster is mirrored around its center column.
pub fn spawn_barriers(
    centers: &[f32],
    top: f32,
    block_size: f32,
    gap: f32,
    rows: usize,
    cols: usize,
) -> Vec<BarrierBlock> {
    assert!(!centers.is_empty(), "need at least one barrier cluster");
    assert!(rows > 0 && cols > 0, "barrier cluster must be non-empty");

    let stride = block_size + gap;
    let half = (cols / 2) as f32;
    let mut blocks = Vec::with_capacity(centers.len() * rows * cols);
    for &center_x in centers {
        for row in 0..rows {
            for col in 0..cols {
                blocks.push(BarrierBlock {
                    pos: Vec2::new(
                        center_x + (col as f32 - half) * stride,
                        top + row as f32 * stride,
                    ),
                    size: Vec2::splat(block_size),
                    alive: true,
                });
            }
        }
    }
    blocks
}

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 256;

/// Complete world state for one session (deterministic, serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    pub tuning: Tuning,
    pub session: Session,
    /// Simulation tick counter (frozen while paused or terminal)
    pub time_ticks: u64,
    pub player: Player,
    pub projectile: Projectile,
    /// Row-major, fixed for the session; dead enemies stay in place
    pub enemies: Vec<Enemy>,
    pub barriers: Vec<BarrierBlock>,
    pub formation: Formation,
    /// Events since the last drain, capped at [`MAX_PENDING_EVENTS`]
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl World {
    /// Create a fresh session from a tuning
    pub fn new(tuning: Tuning) -> Self {
        tuning.assert_valid();

        let mut world = Self {
            session: Session::default(),
            time_ticks: 0,
            player: Player::new(&tuning),
            projectile: Projectile::new(&tuning),
            enemies: Vec::new(),
            barriers: Vec::new(),
            formation: Formation::new(&tuning),
            events: Vec::new(),
            tuning,
        };
        world.spawn_wave();
        world
    }

    /// Discard all in-flight state and start over with the same tuning
    pub fn reset(&mut self) {
        self.session = Session::default();
        self.time_ticks = 0;
        self.player = Player::new(&self.tuning);
        self.projectile = Projectile::new(&self.tuning);
        self.formation = Formation::new(&self.tuning);
        self.events.clear();
        self.spawn_wave();
    }

    /// Replace enemies and barriers with the initial layout
    pub fn spawn_wave(&mut self) {
        let t = &self.tuning;
        self.enemies = spawn_enemy_grid(
            t.enemy_rows,
            t.enemy_cols,
            t.enemy_size(),
            t.enemy_padding,
            t.enemy_origin(),
        );
        self.barriers = spawn_barriers(
            &t.barrier_centers,
            t.barrier_top(),
            t.barrier_block_size,
            t.barrier_block_gap,
            t.barrier_rows,
            t.barrier_cols,
        );
    }

    /// Queue an event, dropping the oldest once the queue is full
    pub fn emit(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn living_barriers(&self) -> usize {
        self.barriers.iter().filter(|b| b.alive).count()
    }

    pub fn status(&self) -> SessionStatus {
        self.session.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_grid_layout() {
        let enemies = spawn_enemy_grid(4, 8, Vec2::splat(30.0), 20.0, Vec2::new(80.0, 80.0));
        assert_eq!(enemies.len(), 32);
        assert!(enemies.iter().all(|e| e.alive));

        // Row-major: index 1 is the second column of the first row
        assert_eq!(enemies[0].pos, Vec2::new(80.0, 80.0));
        assert_eq!(enemies[1].pos, Vec2::new(130.0, 80.0));
        assert_eq!(enemies[8].pos, Vec2::new(80.0, 130.0));
        assert_eq!(enemies[31].pos, Vec2::new(430.0, 230.0));
    }

    #[test]
    fn test_barrier_clusters_are_mirrored() {
        let blocks = spawn_barriers(&[150.0, 350.0, 550.0], 400.0, 10.0, 2.0, 3, 7);
        assert_eq!(blocks.len(), 3 * 3 * 7);

        // First cluster, first row: offsets -3..=3 strides of 12
        let first_row: Vec<f32> = blocks[..7].iter().map(|b| b.pos.x).collect();
        assert_eq!(first_row, vec![114.0, 126.0, 138.0, 150.0, 162.0, 174.0, 186.0]);
        assert_eq!(blocks[7].pos, Vec2::new(114.0, 412.0));

        // Second cluster starts after 21 blocks
        assert_eq!(blocks[21].pos, Vec2::new(314.0, 400.0));
    }

    #[test]
    fn test_spawn_is_deterministic() {
        let a = spawn_barriers(&[100.0], 50.0, 8.0, 1.0, 2, 5);
        let b = spawn_barriers(&[100.0], 50.0, 8.0, 1.0, 2, 5);
        assert_eq!(a, b);
    }

    #[test]
    #[should_panic(expected = "enemy grid must be non-empty")]
    fn test_empty_grid_panics() {
        let _ = spawn_enemy_grid(4, 0, Vec2::splat(30.0), 20.0, Vec2::ZERO);
    }

    #[test]
    fn test_reset_restores_layout() {
        let mut world = World::new(Tuning::default());
        let initial = world.clone();

        world.enemies[3].alive = false;
        world.barriers[10].alive = false;
        world.enemies[0].pos.y += 90.0;
        world.session.score = 40;
        world.formation.direction = -1.0;
        world.projectile.active = true;
        world.time_ticks = 77;

        world.reset();
        assert_eq!(world, initial);
    }

    #[test]
    fn test_event_queue_is_bounded() {
        let mut world = World::new(Tuning::default());
        for index in 0..MAX_PENDING_EVENTS + 10 {
            world.emit(GameEvent::EnemyDestroyed { index });
        }

        assert_eq!(world.events.len(), MAX_PENDING_EVENTS);
        // Oldest ten were dropped
        assert_eq!(world.events[0], GameEvent::EnemyDestroyed { index: 10 });
        assert_eq!(
            world.events.last(),
            Some(&GameEvent::EnemyDestroyed {
                index: MAX_PENDING_EVENTS + 9
            })
        );
    }

    #[test]
    fn test_projectile_launch_centers_on_muzzle() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        let mut projectile = Projectile::new(&tuning);
        projectile.launch(player.top_center());

        assert!(projectile.active);
        // 380 + 20 - 2
        assert_eq!(projectile.pos, Vec2::new(398.0, 520.0));
    }
}
