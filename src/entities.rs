//! Game entity types: tags, geometry, kinds and the small value types the
//! world is built from. Update rules live in `compute` and `player`.

use std::ops::BitOr;

// ── Tags ──────────────────────────────────────────────────────────────────────

/// Capability set of an entity. An entity may carry any combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Tags(u8);

impl Tags {
    pub const EMPTY: Self = Self(0);
    /// Kills the player on contact unless they are riding something.
    pub const HAZARD: Self = Self(1 << 0);
    /// Can carry the player across hazards.
    pub const RIDEABLE: Self = Self(1 << 1);
    /// Shoves the player along with its own velocity.
    pub const PUSHING: Self = Self(1 << 2);
    /// Blocks the player from hopping into it.
    pub const SOLID: Self = Self(1 << 3);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Tags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Axis-aligned box centred on an entity.
///
/// Extents are shrunk by [`BoundingBox::FUZZ`] so that sprites sitting in
/// neighbouring cells of the tile grid never register as touching.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl BoundingBox {
    pub const FUZZ: f32 = 0.95;

    pub fn centered(x: f32, y: f32, width: f32, height: f32) -> Self {
        let half_w = width * Self::FUZZ / 2.0;
        let half_h = height * Self::FUZZ / 2.0;
        Self {
            left: x - half_w,
            top: y - half_h,
            right: x + half_w,
            bottom: y + half_h,
        }
    }

    /// Strict overlap; boxes that only share an edge do not intersect.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}

// ── Kinds ─────────────────────────────────────────────────────────────────────

/// Taxonomy of everything that can appear on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Grass,
    Water,
    Tree,
    Bus,
    Bulldozer,
    Racecar,
    Bike,
    Turtle,
    Log,
    LongLog,
    Player,
    Bonus,
    /// Left behind in a hole once the player has filled it.
    HoleMarker,
}

impl EntityKind {
    /// Look up a level-file type key.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "grass" => Self::Grass,
            "water" => Self::Water,
            "tree" => Self::Tree,
            "bus" => Self::Bus,
            "bulldozer" => Self::Bulldozer,
            "racecar" => Self::Racecar,
            "bike" => Self::Bike,
            "turtle" => Self::Turtle,
            "log" => Self::Log,
            "longLog" => Self::LongLog,
            _ => return None,
        })
    }

    /// Sprite footprint `(width, height)` in pixels.
    pub fn footprint(self) -> (f32, f32) {
        match self {
            Self::Bus | Self::Racecar => (96.0, 48.0),
            Self::Turtle => (144.0, 48.0),
            Self::Log => (192.0, 48.0),
            Self::LongLog => (384.0, 48.0),
            _ => (48.0, 48.0),
        }
    }

    pub fn tags(self) -> Tags {
        match self {
            Self::Water | Self::Bus | Self::Racecar | Self::Bike | Self::HoleMarker => Tags::HAZARD,
            Self::Tree => Tags::SOLID,
            Self::Bulldozer => Tags::SOLID | Tags::PUSHING,
            Self::Turtle | Self::Log | Self::LongLog => Tags::RIDEABLE,
            Self::Grass | Self::Player | Self::Bonus => Tags::EMPTY,
        }
    }

    /// Cruising speed in pixels per millisecond; zero for scenery.
    pub fn speed(self) -> f32 {
        match self {
            Self::Bus => 0.15,
            Self::Bulldozer => 0.05,
            Self::Racecar => 0.5,
            Self::Bike => 0.2,
            Self::Turtle => 0.085,
            Self::Log => 0.1,
            Self::LongLog => 0.07,
            _ => 0.0,
        }
    }

    /// Logs are kept apart from the rest of the scenery: they are scanned
    /// first and host the bonus pickup.
    pub fn is_log(self) -> bool {
        matches!(self, Self::Log | Self::LongLog)
    }
}

// ── Motion ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn from_right(right: bool) -> Self {
        if right {
            Direction::Right
        } else {
            Direction::Left
        }
    }

    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Constant horizontal motion. `speed` is never negative; the sign comes
/// from `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    pub speed: f32,
    pub direction: Direction,
}

impl Motion {
    pub fn velocity(&self) -> f32 {
        self.speed * self.direction.sign()
    }
}

/// Per-kind update rule, dispatched by `compute::advance`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    /// Never moves.
    Static,
    /// Drives at constant speed and wraps around the field.
    Constant,
    /// Like `Constant`, but turns around past `left` / `right`.
    Reversing { left: f32, right: f32 },
    /// Rideable only for the first `underwater_after_ms` of each cycle.
    Submerging {
        timer_ms: u32,
        cycle_ms: u32,
        underwater_after_ms: u32,
    },
}

// ── Entity ────────────────────────────────────────────────────────────────────

/// A positioned, tagged object taking part in collision and rendering.
///
/// Position and bounds are private so they can only change together.
#[derive(Clone, Debug)]
pub struct Entity {
    kind: EntityKind,
    x: f32,
    y: f32,
    bounds: BoundingBox,
    tags: Tags,
    pub motion: Option<Motion>,
    pub behavior: Behavior,
}

impl Entity {
    /// A scenery entity that never moves.
    pub fn new(kind: EntityKind, x: f32, y: f32) -> Self {
        let (w, h) = kind.footprint();
        Self {
            kind,
            x,
            y,
            bounds: BoundingBox::centered(x, y, w, h),
            tags: kind.tags(),
            motion: None,
            behavior: Behavior::Static,
        }
    }

    /// An entity cruising at its kind's speed.
    pub fn moving(
        kind: EntityKind,
        x: f32,
        y: f32,
        direction: Direction,
        behavior: Behavior,
    ) -> Self {
        Self {
            motion: Some(Motion {
                speed: kind.speed(),
                direction,
            }),
            behavior,
            ..Self::new(kind, x, y)
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.kind.footprint().0
    }

    pub fn height(&self) -> f32 {
        self.kind.footprint().1
    }

    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    pub fn tags(&self) -> Tags {
        self.tags
    }

    pub fn has_tag(&self, tag: Tags) -> bool {
        self.tags.contains(tag)
    }

    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
        self.bounds = BoundingBox::centered(x, y, self.width(), self.height());
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.set_position(self.x + dx, self.y + dy);
    }

    /// Box this entity would occupy after moving by `(dx, dy)`.
    pub fn bounds_after(&self, dx: f32, dy: f32) -> BoundingBox {
        BoundingBox::centered(self.x + dx, self.y + dy, self.width(), self.height())
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.bounds.intersects(other)
    }

    pub fn collides_with(&self, other: &Entity) -> bool {
        self.bounds.intersects(&other.bounds)
    }

    /// Signed horizontal velocity in pixels per millisecond.
    pub fn velocity(&self) -> f32 {
        self.motion.map_or(0.0, |m| m.velocity())
    }

    /// Whether the player can currently stand on this entity.
    pub fn can_ride(&self) -> bool {
        if !self.has_tag(Tags::RIDEABLE) {
            return false;
        }
        match self.behavior {
            Behavior::Submerging {
                timer_ms,
                underwater_after_ms,
                ..
            } => timer_ms <= underwater_after_ms,
            _ => true,
        }
    }

    /// Dived turtles are hidden but keep moving.
    pub fn is_visible(&self) -> bool {
        match self.behavior {
            Behavior::Submerging { .. } => self.can_ride(),
            _ => true,
        }
    }
}

// ── Holes, lives, bonus ───────────────────────────────────────────────────────

/// A target slot at the top of the field.
#[derive(Clone, Debug)]
pub struct Hole {
    pub x: f32,
    pub y: f32,
    pub bounds: BoundingBox,
    pub filled: bool,
}

impl Hole {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            bounds: BoundingBox::centered(x, y, width, height),
            filled: false,
        }
    }
}

/// One remaining life, drawn in a row along the bottom edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LifeMarker {
    pub x: f32,
    pub y: f32,
}

impl LifeMarker {
    const BASE_X: f32 = 24.0;
    const BASE_Y: f32 = 744.0;
    const GAP: f32 = 32.0;

    pub fn at_index(index: usize) -> Self {
        Self {
            x: Self::BASE_X + index as f32 * Self::GAP,
            y: Self::BASE_Y,
        }
    }
}

/// Extra-life pickup walking back and forth along a log.
#[derive(Clone, Debug)]
pub struct Bonus {
    pub body: Entity,
    /// Index of the host in the world's log list.
    pub host: usize,
    /// Horizontal offset from the host's centre.
    pub offset: f32,
    pub direction: Direction,
    pub timer_ms: u32,
}

impl Bonus {
    pub fn on_host(host: usize, log: &Entity) -> Self {
        Self {
            body: Entity::new(EntityKind::Bonus, log.x(), log.y()),
            host,
            offset: 0.0,
            direction: Direction::Right,
            timer_ms: 0,
        }
    }

    pub fn has_expired(&self, time_to_live_ms: u32) -> bool {
        self.timer_ms > time_to_live_ms
    }
}

// ── Input & status ────────────────────────────────────────────────────────────

/// Directional keys pressed since the previous frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Playing,
    /// The player died with no lives left.
    GameOver,
    /// Every level has been cleared.
    Completed,
}
