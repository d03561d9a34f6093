//! The player: grid hops from key presses, riding and pushing, death and
//! the life counter.

use tracing::debug;

use crate::config::GameConfig;
use crate::entities::{Entity, EntityKind, KeyState, LifeMarker, Tags};

/// What the player picked up from contacts during the current frame.
///
/// Rebuilt from scratch every frame; nothing in here survives into the next
/// one.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contact {
    /// Horizontal velocity inherited from whatever carries or shoves the
    /// player.
    pub carry_velocity: f32,
    pub riding: bool,
}

/// Result of one player update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerOutcome {
    Alive,
    /// Lost a life and went back to the start.
    Died,
    /// Lost the last life.
    OutOfLives,
}

#[derive(Clone, Debug)]
pub struct Player {
    body: Entity,
    start: (f32, f32),
    contact: Contact,
    /// Latched by contacts and resolved once at the end of `update`.
    pending_death: bool,
    lives: Vec<LifeMarker>,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let (x, y) = config.player_start;
        Self {
            body: Entity::new(EntityKind::Player, x, y),
            start: config.player_start,
            contact: Contact::default(),
            pending_death: false,
            lives: (0..config.starting_lives).map(LifeMarker::at_index).collect(),
        }
    }

    pub fn body(&self) -> &Entity {
        &self.body
    }

    pub fn x(&self) -> f32 {
        self.body.x()
    }

    pub fn y(&self) -> f32 {
        self.body.y()
    }

    pub fn lives(&self) -> &[LifeMarker] {
        &self.lives
    }

    pub fn contact(&self) -> Contact {
        self.contact
    }

    pub fn is_dying(&self) -> bool {
        self.pending_death
    }

    pub fn collides_with(&self, other: &Entity) -> bool {
        self.body.collides_with(other)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.body.set_position(x, y);
    }

    pub fn reset_to_start(&mut self) {
        self.body.set_position(self.start.0, self.start.1);
    }

    /// Add one life marker after the existing ones.
    pub fn gain_life(&mut self) {
        self.lives.push(LifeMarker::at_index(self.lives.len()));
    }

    /// React to an entity the player currently overlaps.
    ///
    /// The world calls this for every overlapping entity before `update`.
    /// A ridable contact cancels any hazard seen earlier in the same scan,
    /// and a hazard seen after one is ignored, so the outcome does not depend
    /// on scan order.
    pub fn on_collision(&mut self, other: &Entity) {
        if other.can_ride() {
            self.contact.carry_velocity = other.velocity();
            self.contact.riding = true;
            self.pending_death = false;
        }

        if other.has_tag(Tags::HAZARD) && !self.contact.riding {
            self.pending_death = true;
        }
    }

    /// Hop, get carried, and resolve any death latched this frame.
    ///
    /// `scenery` is every non-log entity; it is checked for solids in the
    /// hop's path and for anything pushing the player.
    pub fn update(
        &mut self,
        keys: &KeyState,
        elapsed_ms: u32,
        scenery: &[Entity],
        config: &GameConfig,
    ) -> PlayerOutcome {
        let tile = config.tile_size;
        let field = &config.field;
        let half_w = self.body.width() / 2.0;
        let half_h = self.body.height() / 2.0;

        // Later keys overwrite earlier ones on the same axis.
        let mut dx = 0.0;
        let mut dy = 0.0;
        if keys.left {
            dx = -tile;
        }
        if keys.right {
            dx = tile;
        }
        if keys.down {
            dy = tile;
        }
        if keys.up {
            dy = -tile;
        }

        let (x, y) = (self.body.x(), self.body.y());
        if x + dx - half_w < 0.0 || x + dx + half_w > field.width {
            dx = 0.0;
            self.contact.carry_velocity = 0.0;
        }
        if y + dy - half_h < 0.0 || y + dy + half_h > field.height {
            dy = 0.0;
        }

        let target = self.body.bounds_after(dx, dy);
        for other in scenery {
            if other.has_tag(Tags::SOLID) && other.overlaps(&target) {
                dx = 0.0;
                dy = 0.0;
            }
            if other.has_tag(Tags::PUSHING) && self.body.collides_with(other) {
                self.contact.carry_velocity = other.velocity();
            }
        }

        let contact = std::mem::take(&mut self.contact);
        self.body.move_by(dx, dy);
        self.body
            .move_by(contact.carry_velocity * elapsed_ms as f32, 0.0);

        // Shoved off the side of the field.
        let x = self.body.x();
        if x - half_w < -config.edge_fuzz || x + half_w > field.width + config.edge_fuzz {
            self.pending_death = true;
        }

        if self.pending_death {
            return self.die();
        }
        PlayerOutcome::Alive
    }

    fn die(&mut self) -> PlayerOutcome {
        self.pending_death = false;
        self.lives.pop();
        if self.lives.is_empty() {
            debug!(x = self.x(), y = self.y(), "player lost the last life");
            return PlayerOutcome::OutOfLives;
        }
        debug!(lives = self.lives.len(), "player died");
        self.reset_to_start();
        PlayerOutcome::Died
    }
}
