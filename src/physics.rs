/// Per-frame kinematic integration with axis-separated tile collision
///
/// The integrator moves one entity by one frame against a read-only
/// [`TileCollisionGrid`]. Horizontal motion is resolved first and simply
/// refused on contact; vertical motion is resolved second and snaps the
/// entity flush against the surface it ran into.
///
/// # Units
///
/// Gravity and jump impulses are *per-frame* velocity changes, while
/// velocity itself is in units per second: the displacement of a frame is
/// `velocity * dt`. These are the constants the level geometry was tuned
/// for, so they are kept as-is rather than converted to SI-style
/// accelerations.
///
/// # Rust Learning Notes
///
/// - **Copy probes**: every collision probe is an [`Aabb`] built on the
///   stack from the entity's position and size; nothing is pooled
/// - **Exact edges**: probes and the entity's final bounds are built with the
///   same float operations (`x + dx`, then `+ width`), so a box that passed a
///   probe check cannot pick up a rounding overlap afterwards
use crate::collision::Aabb;
use crate::entity::Entity;
use crate::tile::{TileCollisionGrid, TileSpec};
use serde::{Deserialize, Serialize};

/// Tunable movement constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Added to `velocity.y` once per frame
    pub gravity: f32,
    /// Horizontal speed cap, units per second
    pub max_velocity: f32,
    /// Added to `velocity.y` when a jump starts
    pub jump_velocity: f32,
    /// Horizontal velocity multiplier applied after every frame
    pub damping: f32,
    /// Horizontal speeds below this snap to zero
    pub snap_threshold: f32,
    /// An entity whose y drops below this has left the world
    pub death_y: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: -1.5,
            max_velocity: 5.0,
            jump_velocity: 20.0,
            damping: 0.87,
            snap_threshold: 1.0,
            death_y: -85.0,
        }
    }
}

/// What happened to the entity during one [`KinematicIntegrator::step`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Moved down into a tile and now rests on its top
    pub landed: bool,
    /// Moved up into a tile and stopped under it
    pub hit_ceiling: bool,
    /// Horizontal move refused
    pub hit_wall: bool,
    /// Horizontal speed fell below the snap threshold while grounded
    pub settled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct KinematicIntegrator {
    config: PhysicsConfig,
}

impl KinematicIntegrator {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advances `entity` by one frame of `dt` seconds.
    ///
    /// A dead entity, or a `dt` that is zero, negative or not finite, leaves
    /// the entity untouched and returns an empty outcome.
    pub fn step(&self, entity: &mut Entity, dt: f32, grid: &TileCollisionGrid) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if !entity.alive || !dt.is_finite() || dt <= 0.0 {
            return outcome;
        }

        let config = &self.config;
        entity.velocity.y += config.gravity;

        if entity.velocity.x.abs() > config.max_velocity {
            entity.velocity.x = config.max_velocity.copysign(entity.velocity.x);
        }
        if entity.velocity.x.abs() < config.snap_threshold {
            entity.velocity.x = 0.0;
            if entity.on_ground {
                outcome.settled = true;
            }
        }

        let (x, y) = (entity.position.x, entity.position.y);
        let (width, height) = (entity.size.x, entity.size.y);
        let start = Aabb::new(x, y, width, height);

        // Horizontal: any contact along the sweep refuses the whole move
        let mut dx = entity.velocity.x * dt;
        if dx != 0.0 {
            let probe = start.union(&Aabb::new(x + dx, y, width, height));
            if !grid.overlapping(&probe).is_empty() {
                log::trace!("horizontal move blocked at x={x}");
                dx = 0.0;
                entity.velocity.x = 0.0;
                outcome.hit_wall = true;
            }
        }

        // Vertical: sweep from the start box to the final box
        let dy = entity.velocity.y * dt;
        let mut new_y = y + dy;
        if dy != 0.0 {
            // Grounded only while a downward move keeps finding support
            entity.on_ground = false;
            let probe = start.union(&Aabb::new(x + dx, y + dy, width, height));
            let hits = grid.overlapping(&probe);
            if !hits.is_empty() {
                if dy > 0.0 {
                    new_y = snap_below(&hits, y, height);
                    outcome.hit_ceiling = true;
                } else {
                    new_y = snap_above(&hits);
                    entity.on_ground = true;
                    outcome.landed = true;
                }
                entity.velocity.y = 0.0;
            }
        }

        entity.position.x = x + dx;
        entity.position.y = new_y;
        entity.velocity.x *= config.damping;

        outcome
    }
}

/// Resting height on the highest surface among `hits`.
fn snap_above(hits: &[TileSpec]) -> f32 {
    hits.iter().map(TileSpec::top).fold(f32::NEG_INFINITY, f32::max)
}

/// Largest y with `y + height` at or under the lowest underside in `hits`.
///
/// Never lower than `start_y`: the start box already fits under every hit.
fn snap_below(hits: &[TileSpec], start_y: f32, height: f32) -> f32 {
    let ceiling = hits.iter().map(TileSpec::bottom).fold(f32::INFINITY, f32::min);
    let mut y = ceiling - height;
    while y + height > ceiling {
        y = next_below(y);
    }
    y.max(start_y)
}

/// The next representable f32 below `value`.
fn next_below(value: f32) -> f32 {
    if !value.is_finite() {
        return value;
    }
    if value == 0.0 {
        return -f32::from_bits(1);
    }
    let bits = value.to_bits();
    if value > 0.0 {
        f32::from_bits(bits - 1)
    } else {
        f32::from_bits(bits + 1)
    }
}
