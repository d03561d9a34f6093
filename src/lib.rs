//! Simulation core for a frame-stepped river crossing game.
//!
//! Everything in here is deterministic given the key snapshot, the elapsed
//! time and the injected RNG. Terminal I/O lives in the binary.

pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod level;
pub mod player;
pub mod world;
