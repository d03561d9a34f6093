//! Tunable game constants.
//!
//! `GameConfig::default()` reproduces the stock game. A RON file can override
//! any subset of fields; everything left out keeps its default.

use std::path::Path;

use serde::Deserialize;

use crate::error::LoadError;

/// Size of the visible playfield in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Where the target holes sit. All holes share one row and one size.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct HoleLayout {
    pub centres_x: Vec<f32>,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for HoleLayout {
    fn default() -> Self {
        Self {
            centres_x: vec![120.0, 312.0, 504.0, 696.0, 888.0],
            y: 48.0,
            width: 96.0,
            height: 48.0,
        }
    }
}

/// Extra-life pickup timing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BonusTiming {
    /// The pickup hops one tile along its host every interval.
    pub move_interval_ms: u32,
    pub time_to_live_ms: u32,
    /// Inclusive range the respawn delay is drawn from.
    pub spawn_min_secs: u32,
    pub spawn_max_secs: u32,
}

impl Default for BonusTiming {
    fn default() -> Self {
        Self {
            move_interval_ms: 2_000,
            time_to_live_ms: 14_000,
            spawn_min_secs: 25,
            spawn_max_secs: 35,
        }
    }
}

/// Turtle dive cycle: ridable for the first `underwater_after_ms` of every
/// `cycle_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SubmergeTiming {
    pub cycle_ms: u32,
    pub underwater_after_ms: u32,
}

impl Default for SubmergeTiming {
    fn default() -> Self {
        Self {
            cycle_ms: 9_000,
            underwater_after_ms: 7_000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub field: Playfield,
    /// One hop of the player, in pixels.
    pub tile_size: f32,
    pub player_start: (f32, f32),
    pub starting_lives: usize,
    /// How far past the side edges the player may be shoved before dying.
    pub edge_fuzz: f32,
    pub holes: HoleLayout,
    pub bonus: BonusTiming,
    pub turtle: SubmergeTiming,
    /// Bikes turn around when they pass these x coordinates.
    pub bike_turn_x: (f32, f32),
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            field: Playfield::default(),
            tile_size: 48.0,
            player_start: (512.0, 720.0),
            starting_lives: 3,
            edge_fuzz: 0.05 * 48.0,
            holes: HoleLayout::default(),
            bonus: BonusTiming::default(),
            turtle: SubmergeTiming::default(),
            bike_turn_x: (24.0, 1000.0),
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&text).map_err(|source| LoadError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the game cannot run with. A level is complete once
    /// every hole is filled, so an empty layout would finish it at once.
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.holes.centres_x.is_empty() {
            return Err(LoadError::NoHoles);
        }
        Ok(())
    }
}
