//! Per-entity update rules.
//!
//! Each function advances one entity by `elapsed_ms`. Randomness only enters
//! through an injected `Rng`, so callers control determinism (tests pass a
//! seeded or mock RNG).

use rand::Rng;

use crate::config::{BonusTiming, Playfield};
use crate::entities::{Behavior, Bonus, Direction, Entity};

// ── Kinematics ────────────────────────────────────────────────────────────────

/// Advance a non-player entity by one frame according to its behaviour.
pub fn advance(entity: &mut Entity, elapsed_ms: u32, field: &Playfield) {
    match entity.behavior {
        Behavior::Static => return,
        Behavior::Constant => {}
        Behavior::Reversing { left, right } => reverse_at_bounds(entity, left, right),
        Behavior::Submerging {
            ref mut timer_ms,
            cycle_ms,
            ..
        } => {
            let cycle = u64::from(cycle_ms.max(1));
            // Widened so a long frame cannot overflow before the wrap.
            *timer_ms = ((u64::from(*timer_ms) + u64::from(elapsed_ms)) % cycle) as u32;
        }
    }
    drive(entity, elapsed_ms, field);
}

/// Turn around once the entity has passed either threshold. Checked before
/// the entity moves.
pub fn reverse_at_bounds(entity: &mut Entity, left: f32, right: f32) {
    let x = entity.x();
    if let Some(motion) = entity.motion.as_mut() {
        if x < left {
            motion.direction = Direction::Right;
        }
        if x > right {
            motion.direction = Direction::Left;
        }
    }
}

/// Constant-speed horizontal move followed by wraparound.
pub fn drive(entity: &mut Entity, elapsed_ms: u32, field: &Playfield) {
    let Some(motion) = entity.motion else {
        return;
    };
    entity.move_by(motion.velocity() * elapsed_ms as f32, 0.0);

    let half_w = entity.width() / 2.0;
    let half_h = entity.height() / 2.0;
    let off_screen = entity.x() > field.width + half_w
        || entity.x() < -half_w
        || entity.y() > field.height + half_h
        || entity.y() < -half_h;
    if off_screen {
        let x = entry_x(entity.width(), motion.direction, field);
        entity.set_position(x, entity.y());
    }
}

/// X coordinate just outside the edge an entity enters from.
pub fn entry_x(width: f32, direction: Direction, field: &Playfield) -> f32 {
    match direction {
        Direction::Right => -width / 2.0,
        Direction::Left => field.width + width / 2.0,
    }
}

// ── Bonus ─────────────────────────────────────────────────────────────────────

/// Advance the bonus pickup and re-anchor it on its host.
///
/// Every time the lifetime timer crosses a multiple of the movement interval
/// the pickup hops one tile. A hop that would carry it past the end of the
/// host turns it around instead, and it hops the other way.
pub fn step_bonus(
    bonus: &mut Bonus,
    host: &Entity,
    elapsed_ms: u32,
    timing: &BonusTiming,
    tile_size: f32,
) {
    let interval = timing.move_interval_ms.max(1);
    let before = bonus.timer_ms / interval;
    bonus.timer_ms = bonus.timer_ms.saturating_add(elapsed_ms);

    if bonus.timer_ms / interval > before {
        let step = bonus.direction.sign() * tile_size;
        if (bonus.offset + step).abs() > host.width() / 2.0 {
            bonus.direction = bonus.direction.reversed();
            bonus.offset -= step;
        } else {
            bonus.offset += step;
        }
    }

    bonus.body.set_position(host.x() + bonus.offset, host.y());
}

// ── Spawning ──────────────────────────────────────────────────────────────────

/// Draw the delay before the next bonus appears.
pub fn spawn_delay_ms(rng: &mut impl Rng, timing: &BonusTiming) -> u32 {
    let min = timing.spawn_min_secs.min(timing.spawn_max_secs);
    let max = timing.spawn_min_secs.max(timing.spawn_max_secs);
    rng.gen_range(min..=max).saturating_mul(1_000)
}

/// Pick a uniformly random host log, or `None` when there are no logs.
pub fn pick_host(rng: &mut impl Rng, logs: &[Entity]) -> Option<usize> {
    if logs.is_empty() {
        None
    } else {
        Some(rng.gen_range(0..logs.len()))
    }
}
