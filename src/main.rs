//! Invaders headless driver
//!
//! Stands in for the render/input layer: samples an autopilot once per frame,
//! feeds the commands to [`Game`] and logs how the session plays out.
//!
//! Usage: `invaders [tuning.json] [max_ticks]`

use invaders::consts::FRAME_RATE_HZ;
use invaders::{Game, GameEvent, Tuning};

/// Give up after this many frames if the session never ends
const DEFAULT_MAX_TICKS: u64 = 60 * 60 * 10;

/// Commands the autopilot wants for this frame
struct Controls {
    move_dir: i8,
    fire: bool,
}

/// Demo AI: chase the lowest living enemy, leading it by the shot's flight time
fn autopilot(game: &Game) -> Controls {
    let world = game.world();
    let muzzle = world.player.top_center();

    let target = world
        .enemies
        .iter()
        .filter(|e| e.alive)
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    let da = (a.rect().center_x() - muzzle.x).abs();
                    let db = (b.rect().center_x() - muzzle.x).abs();
                    db.partial_cmp(&da).unwrap_or(std::cmp::Ordering::Equal)
                })
        });

    let Some(target) = target else {
        return Controls {
            move_dir: 0,
            fire: false,
        };
    };

    let flight_ticks = (muzzle.y - target.rect().bottom()) / world.projectile.speed;
    let lead = world.formation.speed * world.formation.direction * flight_ticks;
    let aim = target.rect().center_x() + lead;

    let error = aim - muzzle.x;
    let tolerance = world.player.speed;
    Controls {
        move_dir: if error > tolerance {
            1
        } else if error < -tolerance {
            -1
        } else {
            0
        },
        fire: error.abs() <= target.size.x / 2.0,
    }
}

fn main() {
    env_logger::init();
    log::info!("Invaders (headless) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => Tuning::load(path),
        None => Tuning::default(),
    };
    let max_ticks = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_TICKS);

    let mut game = Game::with_tuning(tuning);
    let mut last_status = game.status();
    let mut shots = 0u32;
    let mut frames = 0u64;

    while frames < max_ticks {
        let controls = autopilot(&game);
        if controls.move_dir != 0 {
            game.handle_move(controls.move_dir);
        }
        if controls.fire {
            game.handle_fire();
        }

        let status = game.tick();
        frames += 1;

        for event in game.drain_events() {
            match event {
                GameEvent::ProjectileFired => shots += 1,
                GameEvent::EnemyDestroyed { index } => {
                    log::debug!("Enemy {} destroyed (score {})", index, game.score());
                }
                _ => {}
            }
        }

        if status != last_status {
            log::info!("Status {} -> {}", last_status.as_str(), status.as_str());
            last_status = status;
        }
        if status.is_terminal() {
            break;
        }
    }

    let snapshot = game.snapshot();
    log::info!(
        "Finished after {} frames ({:.1}s at {} Hz): {} score={} shots={} {}",
        frames,
        frames as f32 / FRAME_RATE_HZ as f32,
        FRAME_RATE_HZ,
        snapshot.status.as_str(),
        snapshot.score,
        shots,
        snapshot.message.unwrap_or("")
    );
    match serde_json::to_string(&snapshot) {
        Ok(json) => log::debug!("Final snapshot: {}", json),
        Err(e) => log::warn!("Could not serialize snapshot: {}", e),
    }
}
