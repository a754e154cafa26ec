//! Fixed timestep simulation tick
//!
//! Core game loop that advances the world by one frame. The order of the
//! phases inside [`tick`] is load-bearing: each resolution pass sees the
//! positions and alive flags left by the passes before it.

use super::collision::intersects;
use super::state::{EndReason, GameEvent, SessionStatus, World};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Net held direction; negative is left, positive right, clamped to one step
    pub move_dir: i8,
}

impl TickInput {
    pub fn moving(dir: i8) -> Self {
        Self {
            move_dir: dir.clamp(-1, 1),
        }
    }
}

/// Advance the world by one tick
///
/// `dt` is frame-relative: 1.0 advances every entity by its per-frame speed.
/// Does nothing unless the session is running.
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    if world.session.status != SessionStatus::Running {
        return;
    }

    world.time_ticks += 1;

    move_player(world, input.move_dir, dt);
    advance_projectile(world, dt);
    advance_formation(world, dt);

    if resolve_projectile_enemies(world) {
        return;
    }
    resolve_projectile_barriers(world);

    if resolve_enemy_reach(world) {
        return;
    }
    erode_barriers(world);
}

/// Fire the projectile from the player's muzzle
///
/// Returns false (and changes nothing) when the session isn't running or a
/// projectile is already in flight.
pub fn try_fire(world: &mut World) -> bool {
    if world.session.status != SessionStatus::Running || world.projectile.active {
        return false;
    }

    world.projectile.launch(world.player.top_center());
    world.emit(GameEvent::ProjectileFired);
    true
}

fn move_player(world: &mut World, dir: i8, dt: f32) {
    let dir = dir.clamp(-1, 1) as f32;
    let player = &mut world.player;
    player.pos.x += dir * player.speed * dt;
    player.pos.x = player
        .pos
        .x
        .clamp(world.tuning.player_min_x(), world.tuning.player_max_x());
}

fn advance_projectile(world: &mut World, dt: f32) {
    let projectile = &mut world.projectile;
    if !projectile.active {
        return;
    }

    projectile.pos.y -= projectile.speed * dt;
    if projectile.pos.y < 0.0 {
        projectile.active = false;
        world.emit(GameEvent::ProjectileExpired);
    }
}

/// Slide the formation, reversing and dropping once if any enemy hit a wall
fn advance_formation(world: &mut World, dt: f32) {
    let step = world.formation.speed * world.formation.direction * dt;
    let left = world.tuning.arena_margin;
    let right = world.tuning.arena_width - world.tuning.arena_margin;

    let mut at_wall = false;
    for enemy in world.enemies.iter_mut().filter(|e| e.alive) {
        enemy.pos.x += step;
        if enemy.pos.x <= left || enemy.pos.x + enemy.size.x >= right {
            at_wall = true;
        }
    }

    if at_wall {
        world.formation.reverse();
        let drop = world.formation.drop;
        for enemy in world.enemies.iter_mut().filter(|e| e.alive) {
            enemy.pos.y += drop;
        }
        log::debug!(
            "Formation reversed (direction {}) at tick {}",
            world.formation.direction,
            world.time_ticks
        );
        world.emit(GameEvent::FormationReversed {
            direction: world.formation.direction,
        });
    }
}

/// Returns true if the kill cleared the wave
fn resolve_projectile_enemies(world: &mut World) -> bool {
    if !world.projectile.active {
        return false;
    }

    let shot = world.projectile.rect();
    let Some(index) = world
        .enemies
        .iter()
        .position(|e| e.alive && intersects(shot, e.rect()))
    else {
        return false;
    };

    world.enemies[index].alive = false;
    world.projectile.active = false;
    world.session.score += world.tuning.enemy_reward;
    world.emit(GameEvent::EnemyDestroyed { index });

    if world.living_enemies() == 0 {
        end_session(world, SessionStatus::Win, EndReason::Cleared);
        return true;
    }
    false
}

fn resolve_projectile_barriers(world: &mut World) {
    if !world.projectile.active {
        return;
    }

    let shot = world.projectile.rect();
    if let Some(index) = world
        .barriers
        .iter()
        .position(|b| b.alive && intersects(shot, b.rect()))
    {
        world.barriers[index].alive = false;
        world.projectile.active = false;
        world.emit(GameEvent::BarrierDestroyed { index });
    }
}

/// Returns true if an enemy reached the player's row or the invasion line
fn resolve_enemy_reach(world: &mut World) -> bool {
    let player_y = world.player.pos.y;
    let invasion_line = world.tuning.invasion_line();

    let reason = world.enemies.iter().filter(|e| e.alive).find_map(|e| {
        if e.pos.y + e.size.y >= player_y {
            Some(EndReason::ReachedPlayer)
        } else if e.pos.y >= invasion_line {
            Some(EndReason::Invaded)
        } else {
            None
        }
    });

    match reason {
        Some(reason) => {
            end_session(world, SessionStatus::Loss, reason);
            true
        }
        None => false,
    }
}

/// Barrier blocks crumble wherever a living enemy overlaps them
fn erode_barriers(world: &mut World) {
    let eroded: Vec<usize> = world
        .barriers
        .iter()
        .enumerate()
        .filter(|(_, block)| {
            block.alive
                && world
                    .enemies
                    .iter()
                    .any(|e| e.alive && intersects(e.rect(), block.rect()))
        })
        .map(|(index, _)| index)
        .collect();

    for index in eroded {
        world.barriers[index].alive = false;
        world.emit(GameEvent::BarrierDestroyed { index });
    }
}

fn end_session(world: &mut World, status: SessionStatus, reason: EndReason) {
    world.session.status = status;
    world.session.end_reason = Some(reason);
    world.emit(match status {
        SessionStatus::Win => GameEvent::Won,
        _ => GameEvent::Lost { reason },
    });
    log::info!(
        "Session ended: {} ({}) score={} tick={}",
        status.as_str(),
        reason.message(),
        world.session.score,
        world.time_ticks
    );
}
