//! Level files: one `type,x,y[,directionRight]` record per line.
//!
//! Parsing turns text into [`LevelRecord`]s; [`build_level`] turns records
//! into entities.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::entities::{Behavior, Direction, Entity, EntityKind};
use crate::error::LoadError;

/// What to do with a record whose type key is not recognised.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LevelParse {
    /// Skip it with a warning.
    #[default]
    Permissive,
    /// Fail with [`LoadError::UnknownKind`].
    Strict,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelRecord {
    pub kind: EntityKind,
    pub x: f32,
    pub y: f32,
    pub direction: Direction,
}

#[derive(Clone, Debug, Default)]
pub struct Level {
    pub name: String,
    pub records: Vec<LevelRecord>,
}

/// Entities built from a level, split the way the world stores them.
#[derive(Clone, Debug, Default)]
pub struct LevelEntities {
    pub scenery: Vec<Entity>,
    pub logs: Vec<Entity>,
}

// ── Parsing ───────────────────────────────────────────────────────────────────

pub fn parse_level(name: &str, text: &str, mode: LevelParse) -> Result<Level, LoadError> {
    let mut records = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = i + 1;
        if raw.trim().is_empty() {
            continue;
        }
        let mut fields = raw.split(',').map(str::trim);

        let key = fields.next().unwrap_or_default();
        let x = parse_coord(fields.next(), line, "x")?;
        let y = parse_coord(fields.next(), line, "y")?;
        let direction = match fields.next() {
            Some(token) => {
                let right = token.eq_ignore_ascii_case("true");
                if !right && !token.eq_ignore_ascii_case("false") {
                    debug!(line, token, "direction token is not a boolean, moving left");
                }
                Direction::from_right(right)
            }
            None => Direction::Right,
        };

        match EntityKind::from_key(key) {
            Some(kind) => records.push(LevelRecord {
                kind,
                x,
                y,
                direction,
            }),
            None if mode == LevelParse::Strict => {
                return Err(LoadError::UnknownKind {
                    line,
                    kind: key.to_string(),
                });
            }
            None => warn!(level = name, line, kind = key, "skipping unknown entity type"),
        }
    }

    Ok(Level {
        name: name.to_string(),
        records,
    })
}

fn parse_coord(field: Option<&str>, line: usize, name: &'static str) -> Result<f32, LoadError> {
    let text = field.ok_or(LoadError::MissingField { line, field: name })?;
    text.parse::<i32>()
        .map(|v| v as f32)
        .map_err(|_| LoadError::BadNumber {
            line,
            field: name,
            value: text.to_string(),
        })
}

// ── Loading ───────────────────────────────────────────────────────────────────

pub fn load_level(path: &Path, mode: LevelParse) -> Result<Level, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    parse_level(&name, &text, mode)
}

/// Path of the `index`-th level file in `dir`.
pub fn level_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("{index}.lvl"))
}

/// Load `0.lvl`, `1.lvl`, … from `dir` until the first missing index.
pub fn load_levels(dir: &Path, mode: LevelParse) -> Result<Vec<Level>, LoadError> {
    let mut levels = Vec::new();
    loop {
        let path = level_path(dir, levels.len());
        if !path.is_file() {
            break;
        }
        let level = load_level(&path, mode)?;
        info!(path = %path.display(), records = level.records.len(), "loaded level");
        levels.push(level);
    }

    if levels.is_empty() {
        return Err(LoadError::NoLevelFiles {
            dir: dir.to_path_buf(),
        });
    }
    Ok(levels)
}

// ── Building ──────────────────────────────────────────────────────────────────

pub fn build_entity(record: &LevelRecord, config: &GameConfig) -> Entity {
    let LevelRecord {
        kind,
        x,
        y,
        direction,
    } = *record;

    let behavior = match kind {
        EntityKind::Grass | EntityKind::Water | EntityKind::Tree => return Entity::new(kind, x, y),
        EntityKind::Bike => Behavior::Reversing {
            left: config.bike_turn_x.0,
            right: config.bike_turn_x.1,
        },
        EntityKind::Turtle => Behavior::Submerging {
            timer_ms: 0,
            cycle_ms: config.turtle.cycle_ms,
            underwater_after_ms: config.turtle.underwater_after_ms,
        },
        _ => Behavior::Constant,
    };
    Entity::moving(kind, x, y, direction, behavior)
}

pub fn build_level(level: &Level, config: &GameConfig) -> LevelEntities {
    let mut built = LevelEntities::default();
    for record in &level.records {
        let entity = build_entity(record, config);
        if entity.kind().is_log() {
            built.logs.push(entity);
        } else {
            built.scenery.push(entity);
        }
    }
    built
}
