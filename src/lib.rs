//! Problematic: the core of a tile-based platformer
//!
//! A player walks and jumps across tile maps, falls off edges into a retry
//! challenge and collects a key to unlock the next level. This crate holds
//! everything below the drawing calls:
//!
//! - [`tile`], [`collision`]: collision layers and box overlap tests
//! - [`physics`]: per-frame kinematic integration against the tiles
//! - [`entity`], [`animation`]: the entity record and its state machine
//! - [`camera`]: horizontal camera follow
//! - [`map`], [`level`]: map files and the level catalog
//! - [`progress`], [`progression`]: persisted unlocks and the level state machine
//! - [`session`], [`game`]: one level being played, and the driver around it
//! - [`config`], [`input`]: JSON configuration and per-frame input intents
//!
//! World units are tiles: one unit is one 70 px tile, y points up.

pub mod animation;
pub mod camera;
pub mod collision;
pub mod config;
pub mod entity;
pub mod game;
pub mod input;
pub mod level;
pub mod map;
pub mod physics;
pub mod progress;
pub mod progression;
pub mod session;
pub mod tile;

pub mod consts {
    /// World units per source pixel: one 70 px tile is one unit.
    pub const UNIT_SCALE: f32 = 1.0 / 70.0;
    /// Fixed frame length used by headless runs
    pub const FIXED_DT: f32 = 1.0 / 60.0;
}
