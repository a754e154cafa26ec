//! Session controller
//!
//! [`Game`] owns the world for one session and is the only thing an outer
//! driver talks to: it forwards commands, runs one simulation tick per frame
//! and hands out read-only [`Snapshot`]s for rendering.

use serde::Serialize;

use crate::consts::FRAME_DT;
use crate::sim::{GameEvent, Rect, SessionStatus, TickInput, World, tick, try_fire};
use crate::tuning::Tuning;

/// Rectangle plus liveness, as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityView {
    pub rect: Rect,
    pub alive: bool,
}

/// Read-only view of the session for rendering and UI overlays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub player: Rect,
    pub projectile: Rect,
    pub projectile_active: bool,
    pub enemies: Vec<EntityView>,
    pub barriers: Vec<EntityView>,
    pub score: u32,
    pub status: SessionStatus,
    /// Terminal overlay text, present only after a win or loss
    pub message: Option<&'static str>,
}

/// Game instance holding all session state
#[derive(Debug, Clone)]
pub struct Game {
    world: World,
    /// Input gathered since the last tick
    input: TickInput,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    pub fn with_tuning(tuning: Tuning) -> Self {
        let world = World::new(tuning);
        log::info!(
            "New session: {} enemies, {} barrier blocks",
            world.enemies.len(),
            world.barriers.len()
        );
        Self {
            world,
            input: TickInput::default(),
        }
    }

    /// Hold a direction for the next tick (-1 left, 0 none, 1 right)
    ///
    /// Continuous: the driver calls this every frame while a key is held.
    /// Calls within one frame add up, so holding left and right together
    /// leaves the ship where it is.
    pub fn handle_move(&mut self, direction: i8) {
        if self.world.status() != SessionStatus::Running {
            return;
        }
        self.input.move_dir = self
            .input
            .move_dir
            .saturating_add(direction.clamp(-1, 1));
    }

    pub fn move_left(&mut self) {
        self.handle_move(-1);
    }

    pub fn move_right(&mut self) {
        self.handle_move(1);
    }

    /// Fire if no projectile is in flight. Returns whether a shot was fired.
    pub fn handle_fire(&mut self) -> bool {
        try_fire(&mut self.world)
    }

    pub fn toggle_pause(&mut self) {
        let next = match self.world.status() {
            SessionStatus::Running => SessionStatus::Paused,
            SessionStatus::Paused => SessionStatus::Running,
            SessionStatus::Win | SessionStatus::Loss => return,
        };
        self.world.session.status = next;
        self.input = TickInput::default();
        log::debug!("Session {}", next.as_str());
    }

    /// Throw away the current run and start a fresh one. Valid in any state.
    pub fn restart(&mut self) {
        self.world.reset();
        self.input = TickInput::default();
        log::info!("Session restarted");
    }

    /// Advance one frame and report the resulting status
    pub fn tick(&mut self) -> SessionStatus {
        let input = std::mem::take(&mut self.input);
        if self.world.status() == SessionStatus::Running {
            tick(&mut self.world, &input, FRAME_DT);
        }
        self.world.status()
    }

    pub fn status(&self) -> SessionStatus {
        self.world.status()
    }

    pub fn score(&self) -> u32 {
        self.world.session.score
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn tuning(&self) -> &Tuning {
        &self.world.tuning
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.world.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        let w = &self.world;
        Snapshot {
            player: w.player.rect(),
            projectile: w.projectile.rect(),
            projectile_active: w.projectile.active,
            enemies: w
                .enemies
                .iter()
                .map(|e| EntityView {
                    rect: e.rect(),
                    alive: e.alive,
                })
                .collect(),
            barriers: w
                .barriers
                .iter()
                .map(|b| EntityView {
                    rect: b.rect(),
                    alive: b.alive,
                })
                .collect(),
            score: w.session.score,
            status: w.session.status,
            message: w.session.end_reason.map(|r| r.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::EndReason;
    use proptest::prelude::*;

    /// Stationary formation so shots can be aimed without leading
    fn still_game() -> Game {
        Game::with_tuning(Tuning {
            formation_speed: 0.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_new_game() {
        let game = Game::new();
        assert_eq!(game.status(), SessionStatus::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.world().enemies.len(), 32);
        assert_eq!(game.world().barriers.len(), 63);
        assert!(game.snapshot().message.is_none());
    }

    #[test]
    fn test_pause_toggle() {
        let mut game = Game::new();
        game.toggle_pause();
        assert_eq!(game.status(), SessionStatus::Paused);
        assert_eq!(game.tick(), SessionStatus::Paused);
        game.toggle_pause();
        assert_eq!(game.status(), SessionStatus::Running);
    }

    #[test]
    fn test_paused_tick_leaves_world_unchanged() {
        let mut game = Game::new();
        game.handle_fire();
        for _ in 0..5 {
            game.move_right();
            game.tick();
        }
        game.toggle_pause();
        let before = game.world().clone();

        for _ in 0..30 {
            game.move_left();
            game.handle_fire();
            game.tick();
        }
        assert_eq!(game.world(), &before);
    }

    #[test]
    fn test_move_is_applied_on_tick_and_released() {
        let mut game = Game::new();
        game.move_right();
        assert_eq!(game.world().player.pos.x, 380.0);
        game.tick();
        assert_eq!(game.world().player.pos.x, 387.0);
        // Not re-issued, so the ship stops
        game.tick();
        assert_eq!(game.world().player.pos.x, 387.0);
    }

    #[test]
    fn test_left_and_right_held_together_cancel() {
        let mut game = Game::new();
        game.move_left();
        game.move_right();
        game.tick();
        assert_eq!(game.world().player.pos.x, 380.0);

        // Repeated presses in one frame still move a single step
        game.move_right();
        game.move_right();
        game.tick();
        assert_eq!(game.world().player.pos.x, 387.0);
    }

    #[test]
    fn test_move_held_through_pause_is_dropped() {
        let mut game = Game::new();
        game.move_left();
        game.toggle_pause();
        game.toggle_pause();
        game.tick();
        assert_eq!(game.world().player.pos.x, 380.0);
    }

    #[test]
    fn test_fire_creates_one_projectile() {
        let mut game = Game::new();
        assert!(game.handle_fire());
        assert!(!game.handle_fire());
        let snap = game.snapshot();
        assert!(snap.projectile_active);
        assert_eq!(snap.projectile, Rect::new(398.0, 520.0, 4.0, 20.0));
    }

    #[test]
    fn test_destroy_whole_wave_wins() {
        let mut game = still_game();

        // Bottom row first so every shot meets its target before the rows above
        for target in (0..32).rev() {
            let mut guard = 0;
            while game.world().enemies[target].alive {
                guard += 1;
                assert!(guard < 2000, "enemy {target} survived");

                let aim = game.world().enemies[target].rect().center_x();
                let muzzle = game.world().player.top_center().x;
                if (aim - muzzle).abs() > 7.0 {
                    game.handle_move(if aim > muzzle { 1 } else { -1 });
                } else {
                    game.handle_fire();
                }
                game.tick();
            }
        }

        assert_eq!(game.status(), SessionStatus::Win);
        assert_eq!(game.score(), 320);
        assert_eq!(game.snapshot().message, Some(EndReason::Cleared.message()));
        assert!(game.drain_events().contains(&GameEvent::Won));
    }

    #[test]
    fn test_formation_reaching_player_loses() {
        let mut game = Game::new();
        let mut ticks = 0;
        while game.tick() == SessionStatus::Running {
            ticks += 1;
            assert!(ticks < 10_000, "formation never landed");
        }

        assert_eq!(game.status(), SessionStatus::Loss);
        assert_eq!(game.snapshot().message, Some("ALIENS GOT YOU!"));
        // Barriers in the formation's path were eroded on the way down
        assert!(game.world().living_barriers() < 63);
    }

    #[test]
    fn test_terminal_state_ignores_commands() {
        let mut game = Game::new();
        while game.tick() == SessionStatus::Running {}
        let before = game.world().clone();

        game.toggle_pause();
        game.move_left();
        game.handle_fire();
        game.tick();

        assert_eq!(game.status(), SessionStatus::Loss);
        assert_eq!(game.world(), &before);
    }

    #[test]
    fn test_restart_restores_initial_session() {
        let fresh = Game::new();

        let mut lost = Game::new();
        while lost.tick() == SessionStatus::Running {}
        lost.restart();
        assert_eq!(lost.world(), fresh.world());
        assert_eq!(lost.snapshot(), fresh.snapshot());

        let mut paused = Game::new();
        paused.handle_fire();
        paused.tick();
        paused.toggle_pause();
        paused.restart();
        assert_eq!(paused.status(), SessionStatus::Running);
        assert_eq!(paused.world(), fresh.world());
    }

    #[test]
    fn test_restart_after_win() {
        let mut game = still_game();
        for enemy in game.world.enemies.iter_mut().skip(1) {
            enemy.alive = false;
        }
        game.world.projectile.active = true;
        game.world.projectile.pos = glam::Vec2::new(93.0, 100.0);
        assert_eq!(game.tick(), SessionStatus::Win);

        game.restart();
        assert_eq!(game.score(), 0);
        assert_eq!(game.status(), SessionStatus::Running);
        assert_eq!(game.world().living_enemies(), 32);
        assert_eq!(game.world(), still_game().world());
    }

    #[test]
    fn test_snapshot_serializes_status() {
        let mut game = Game::new();
        game.toggle_pause();
        let json = serde_json::to_string(&game.snapshot()).unwrap();
        assert!(json.contains(r#""status":"PAUSED""#));
        assert!(json.contains(r#""message":null"#));
    }

    #[test]
    fn test_drain_events() {
        let mut game = Game::new();
        game.handle_fire();
        assert_eq!(game.drain_events(), vec![GameEvent::ProjectileFired]);
        assert!(game.drain_events().is_empty());
    }

    proptest! {
        #[test]
        fn prop_paused_world_is_frozen(cmds in proptest::collection::vec(0u8..4, 1..100)) {
            let mut game = Game::new();
            game.handle_fire();
            game.tick();
            game.toggle_pause();
            let before = game.world().clone();

            for cmd in cmds {
                match cmd {
                    0 => game.move_left(),
                    1 => game.move_right(),
                    2 => { game.handle_fire(); }
                    _ => {}
                }
                game.tick();
            }
            prop_assert_eq!(game.world(), &before);
        }
    }
}
