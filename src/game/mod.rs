// Game module - ties levels, progression and the running session together
//
// This module contains:
// - world.rs: GameWorld, which owns the level catalog, progression and the active session
// - types.rs: Screen and other shared enums

pub mod types;
pub mod world;

// Re-export types for convenience
pub use types::*;
pub use world::GameWorld;
