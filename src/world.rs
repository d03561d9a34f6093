//! The world: owns every entity and runs the per-frame pipeline.
//!
//! Frame order:
//!
//! 1. bonus spawn countdown, or bonus update / pickup / expiry
//! 2. player contact reactions (logs first, then scenery)
//! 3. player hop, carry and death resolution
//! 4. hole filling
//! 5. logs and scenery advance
//! 6. level completion

use rand::Rng;
use tracing::{debug, info, trace};

use crate::compute;
use crate::config::GameConfig;
use crate::entities::{Bonus, Entity, EntityKind, GameStatus, Hole, KeyState};
use crate::error::LoadError;
use crate::level::{build_level, Level};
use crate::player::{Player, PlayerOutcome};

pub struct World {
    config: GameConfig,
    levels: Vec<Level>,
    level_index: usize,
    player: Player,
    /// Everything except logs, the player and the bonus.
    scenery: Vec<Entity>,
    logs: Vec<Entity>,
    holes: Vec<Hole>,
    bonus: Option<Bonus>,
    spawn_elapsed_ms: u32,
    spawn_delay_ms: u32,
    status: GameStatus,
    frame: u64,
}

impl World {
    /// Build the first level and place the player at the start.
    pub fn new(levels: Vec<Level>, config: GameConfig, rng: &mut impl Rng) -> Result<Self, LoadError> {
        if levels.is_empty() {
            return Err(LoadError::NoLevels);
        }
        config.validate()?;
        let spawn_delay_ms = compute::spawn_delay_ms(rng, &config.bonus);
        let mut world = Self {
            player: Player::new(&config),
            config,
            levels,
            level_index: 0,
            scenery: Vec::new(),
            logs: Vec::new(),
            holes: Vec::new(),
            bonus: None,
            spawn_elapsed_ms: 0,
            spawn_delay_ms,
            status: GameStatus::Playing,
            frame: 0,
        };
        world.load_current_level();
        Ok(world)
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn scenery(&self) -> &[Entity] {
        &self.scenery
    }

    pub fn logs(&self) -> &[Entity] {
        &self.logs
    }

    pub fn holes(&self) -> &[Hole] {
        &self.holes
    }

    pub fn bonus(&self) -> Option<&Bonus> {
        self.bonus.as_ref()
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Milliseconds until the next bonus may spawn.
    pub fn bonus_countdown_ms(&self) -> u32 {
        self.spawn_delay_ms.saturating_sub(self.spawn_elapsed_ms)
    }

    // ── Frame ─────────────────────────────────────────────────────────────────

    /// Advance the game by one frame. Once the game has ended this is a
    /// no-op that keeps returning the final status.
    pub fn update(&mut self, keys: &KeyState, elapsed_ms: u32, rng: &mut impl Rng) -> GameStatus {
        if self.status != GameStatus::Playing {
            return self.status;
        }
        self.frame += 1;

        self.update_bonus(elapsed_ms, rng);
        self.react_to_contacts();

        match self
            .player
            .update(keys, elapsed_ms, &self.scenery, &self.config)
        {
            PlayerOutcome::OutOfLives => {
                info!(frame = self.frame, level = self.level_index, "game over");
                self.status = GameStatus::GameOver;
                return self.status;
            }
            PlayerOutcome::Died | PlayerOutcome::Alive => {}
        }

        self.fill_holes();
        self.advance_entities(elapsed_ms);
        self.check_level_complete();

        trace!(frame = self.frame, status = ?self.status, "frame done");
        self.status
    }

    fn update_bonus(&mut self, elapsed_ms: u32, rng: &mut impl Rng) {
        let Some(bonus) = self.bonus.as_mut() else {
            if self.spawn_elapsed_ms < self.spawn_delay_ms {
                self.spawn_elapsed_ms = self.spawn_elapsed_ms.saturating_add(elapsed_ms);
            } else if let Some(host) = compute::pick_host(rng, &self.logs) {
                self.bonus = Some(Bonus::on_host(host, &self.logs[host]));
                self.spawn_elapsed_ms = 0;
                self.spawn_delay_ms = compute::spawn_delay_ms(rng, &self.config.bonus);
                debug!(host, next_delay_ms = self.spawn_delay_ms, "bonus spawned");
            }
            return;
        };

        let Some(host) = self.logs.get(bonus.host) else {
            self.bonus = None;
            return;
        };
        compute::step_bonus(
            bonus,
            host,
            elapsed_ms,
            &self.config.bonus,
            self.config.tile_size,
        );

        if self.player.collides_with(&bonus.body) {
            self.bonus = None;
            self.player.gain_life();
            debug!(lives = self.player.lives().len(), "bonus collected");
        } else if bonus.has_expired(self.config.bonus.time_to_live_ms) {
            self.bonus = None;
            debug!("bonus expired");
        }
    }

    /// Let the player react to everything it overlaps. All contacts are
    /// applied before the player moves.
    fn react_to_contacts(&mut self) {
        for entity in self.logs.iter().chain(&self.scenery) {
            if self.player.collides_with(entity) {
                self.player.on_collision(entity);
            }
        }
    }

    /// Fill any empty hole the player has reached. Filled holes are inert.
    fn fill_holes(&mut self) {
        for (i, hole) in self.holes.iter_mut().enumerate() {
            if hole.filled || !self.player.body().overlaps(&hole.bounds) {
                continue;
            }
            self.player.reset_to_start();
            self.scenery
                .push(Entity::new(EntityKind::HoleMarker, hole.x, hole.y));
            hole.filled = true;
            debug!(hole = i, level = self.level_index, "hole filled");
        }
    }

    fn advance_entities(&mut self, elapsed_ms: u32) {
        let field = self.config.field;
        for entity in self.logs.iter_mut().chain(self.scenery.iter_mut()) {
            compute::advance(entity, elapsed_ms, &field);
        }
    }

    fn check_level_complete(&mut self) {
        if !self.holes.iter().all(|h| h.filled) {
            return;
        }

        self.bonus = None;
        self.scenery.clear();
        self.logs.clear();
        self.level_index += 1;

        if self.level_index >= self.levels.len() {
            info!(frame = self.frame, "all levels cleared");
            self.status = GameStatus::Completed;
            return;
        }
        self.load_current_level();
    }

    fn load_current_level(&mut self) {
        let level = &self.levels[self.level_index];
        let built = build_level(level, &self.config);
        self.scenery = built.scenery;
        self.logs = built.logs;

        let layout = &self.config.holes;
        self.holes = layout
            .centres_x
            .iter()
            .map(|&x| Hole::new(x, layout.y, layout.width, layout.height))
            .collect();

        info!(
            level = self.level_index,
            name = %level.name,
            scenery = self.scenery.len(),
            logs = self.logs.len(),
            holes = self.holes.len(),
            "level loaded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Direction;
    use crate::level::LevelRecord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn world_with(records: Vec<LevelRecord>) -> World {
        let level = Level {
            name: "test".into(),
            records,
        };
        World::new(vec![level], GameConfig::default(), &mut StdRng::seed_from_u64(7)).unwrap()
    }

    #[test]
    fn refilling_a_hole_changes_nothing() {
        let mut world = world_with(Vec::new());
        let (hx, hy) = (world.holes[0].x, world.holes[0].y);

        world.player.set_position(hx, hy);
        world.fill_holes();
        assert!(world.holes[0].filled);
        assert_eq!(world.scenery.len(), 1);
        assert_eq!((world.player.x(), world.player.y()), (512.0, 720.0));

        let lives = world.player.lives().len();
        world.player.set_position(hx, hy);
        world.fill_holes();
        assert!(world.holes[0].filled);
        assert_eq!(world.scenery.len(), 1, "no second marker");
        assert_eq!((world.player.x(), world.player.y()), (hx, hy), "no reset");
        assert_eq!(world.player.lives().len(), lives);
    }

    #[test]
    fn bonus_waits_for_a_log() {
        let mut world = world_with(Vec::new());
        let mut rng = StdRng::seed_from_u64(1);
        let keys = KeyState::default();

        for _ in 0..40 {
            world.update(&keys, 1_000, &mut rng);
        }
        assert!(world.bonus.is_none());
        assert_eq!(world.bonus_countdown_ms(), 0);

        world.logs.push(Entity::moving(
            EntityKind::Log,
            400.0,
            144.0,
            Direction::Right,
            crate::entities::Behavior::Constant,
        ));
        world.update(&keys, 16, &mut rng);
        assert_eq!(world.bonus.as_ref().map(|b| b.host), Some(0));
    }
}
