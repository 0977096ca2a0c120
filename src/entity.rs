/// Kinematic entities and their animation/behaviour state machine
///
/// There is exactly one entity record type. What differs between the player
/// and the key is data: the [`EntityKind`] tag decides the collision size and
/// the animation set. Input handling is not part of the entity at all; the
/// session attaches a [`crate::input::PlayerControl`] to the player only.
///
/// # State Machine
///
/// ```text
///            move (grounded)             jump (grounded)
///  Standing ----------------> Walking ------------------> Jumping
///     ^                          |                           |
///     |   speed decayed while    |     move while airborne:  |
///     +---- grounded (settle) ---+     state unchanged       |
///     ^                                                      |
///     +------------------ settle after landing --------------+
/// ```
///
/// Every transition resets `state_time`; staying in the same state keeps it
/// running so looping animations do not restart. A dead entity
/// (`alive == false`) ignores every command until the session resets it.
use crate::animation::AnimationSet;
use crate::collision::Aabb;
use crate::physics::{PhysicsConfig, StepOutcome};
use crate::consts::UNIT_SCALE;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Player sprite size in pixels
const PLAYER_PIXEL_SIZE: (f32, f32) = (18.0, 26.0);
/// Key sprite size in pixels
const KEY_PIXEL_SIZE: (f32, f32) = (35.0, 35.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Key,
}

impl EntityKind {
    /// Collision box size in world units
    pub fn size(&self) -> Vec2 {
        let (w, h) = match self {
            EntityKind::Player => PLAYER_PIXEL_SIZE,
            EntityKind::Key => KEY_PIXEL_SIZE,
        };
        Vec2::new(w * UNIT_SCALE, h * UNIT_SCALE)
    }

    pub fn animations(&self) -> AnimationSet {
        match self {
            EntityKind::Player => AnimationSet::character(),
            EntityKind::Key => AnimationSet::still(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityState {
    Standing,
    Walking,
    Jumping,
}

/// Read-only view handed to renderers and audio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySnapshot {
    pub kind: EntityKind,
    pub position: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub state: EntityState,
    pub state_time: f32,
    pub frame: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    /// Bottom-left corner, world units
    pub position: Vec2,
    /// Units per second
    pub velocity: Vec2,
    pub size: Vec2,
    pub facing: Facing,
    pub on_ground: bool,
    pub alive: bool,
    state: EntityState,
    state_time: f32,
}

impl Entity {
    pub fn new(kind: EntityKind, position: Vec2) -> Self {
        Entity {
            kind,
            position,
            velocity: Vec2::ZERO,
            size: kind.size(),
            facing: Facing::Right,
            on_ground: true,
            alive: true,
            state: EntityState::Standing,
            state_time: 0.0,
        }
    }

    pub fn player(position: Vec2) -> Self {
        Entity::new(EntityKind::Player, position)
    }

    pub fn key(position: Vec2) -> Self {
        Entity::new(EntityKind::Key, position)
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    fn set_state(&mut self, state: EntityState) {
        if state != self.state {
            self.state = state;
            self.state_time = 0.0;
        }
    }

    /// Accumulate time spent in the current state.
    pub fn advance(&mut self, dt: f32) {
        if !self.alive || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.state_time += dt;
    }

    /// Start a jump. Ignored (returns false) unless standing on something.
    pub fn jump(&mut self, physics: &PhysicsConfig) -> bool {
        if !self.alive || !self.on_ground {
            return false;
        }
        self.velocity.y += physics.jump_velocity;
        self.on_ground = false;
        self.set_state(EntityState::Jumping);
        true
    }

    pub fn move_left(&mut self, physics: &PhysicsConfig) {
        self.walk(Facing::Left, -physics.max_velocity);
    }

    pub fn move_right(&mut self, physics: &PhysicsConfig) {
        self.walk(Facing::Right, physics.max_velocity);
    }

    fn walk(&mut self, facing: Facing, velocity_x: f32) {
        if !self.alive {
            return;
        }
        self.velocity.x = velocity_x;
        self.facing = facing;
        // Airborne movement steers but keeps the jump pose
        if self.on_ground {
            self.set_state(EntityState::Walking);
        }
    }

    /// Feed the integrator's result back into the state machine.
    pub fn apply_step(&mut self, outcome: &StepOutcome) {
        if !self.alive {
            return;
        }
        if outcome.settled && self.on_ground {
            self.set_state(EntityState::Standing);
        }
    }

    /// Put the entity back at `spawn`, alive and at rest.
    pub fn reset_to(&mut self, spawn: Vec2) {
        self.position = spawn;
        self.velocity = Vec2::ZERO;
        self.alive = true;
        self.on_ground = true;
        self.facing = Facing::Right;
        self.state = EntityState::Standing;
        self.state_time = 0.0;
    }

    pub fn animation_frame(&self) -> usize {
        self.kind.animations().frame(self.state, self.state_time)
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            kind: self.kind,
            position: self.position,
            size: self.size,
            facing: self.facing,
            state: self.state,
            state_time: self.state_time,
            frame: self.animation_frame(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn physics() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    #[test]
    fn test_jump_from_ground() {
        let physics = physics();
        let mut player = Entity::player(Vec2::new(2.0, 1.0));
        player.velocity.y = -1.5;

        assert!(player.jump(&physics));
        assert_eq!(player.velocity.y, -1.5 + physics.jump_velocity);
        assert!(!player.on_ground);
        assert_eq!(player.state(), EntityState::Jumping);
    }

    #[test]
    fn test_second_jump_in_air_is_ignored() {
        let physics = physics();
        let mut player = Entity::player(Vec2::ZERO);

        assert!(player.jump(&physics));
        let after_first = player.velocity;
        assert!(!player.jump(&physics));
        assert_eq!(player.velocity, after_first);
        assert_eq!(player.state(), EntityState::Jumping);
    }

    #[test]
    fn test_move_sets_velocity_and_facing() {
        let physics = physics();
        let mut player = Entity::player(Vec2::ZERO);

        player.move_left(&physics);
        assert_eq!(player.velocity.x, -physics.max_velocity);
        assert_eq!(player.facing, Facing::Left);
        assert_eq!(player.state(), EntityState::Walking);

        player.move_right(&physics);
        assert_eq!(player.velocity.x, physics.max_velocity);
        assert_eq!(player.facing, Facing::Right);
    }

    #[test]
    fn test_move_while_airborne_keeps_jumping() {
        let physics = physics();
        let mut player = Entity::player(Vec2::ZERO);
        player.jump(&physics);

        player.move_right(&physics);

        assert_eq!(player.state(), EntityState::Jumping);
        assert_eq!(player.facing, Facing::Right);
        assert_eq!(player.velocity.x, physics.max_velocity);
    }

    #[test]
    fn test_state_time_resets_on_transition_only() {
        let physics = physics();
        let mut player = Entity::player(Vec2::ZERO);
        player.advance(0.5);
        assert_eq!(player.state_time(), 0.5);

        player.move_right(&physics);
        assert_eq!(player.state_time(), 0.0);

        player.advance(0.25);
        player.move_right(&physics); // Walking -> Walking is not a transition
        assert_eq!(player.state_time(), 0.25);
    }

    #[test]
    fn test_settle_only_when_grounded() {
        let physics = physics();
        let mut player = Entity::player(Vec2::ZERO);
        player.move_right(&physics);

        let settled = StepOutcome {
            settled: true,
            ..Default::default()
        };
        player.apply_step(&settled);
        assert_eq!(player.state(), EntityState::Standing);

        player.jump(&physics);
        player.apply_step(&settled);
        assert_eq!(player.state(), EntityState::Jumping);
    }

    #[test]
    fn test_dead_entity_is_frozen() {
        let physics = physics();
        let mut player = Entity::player(Vec2::ZERO);
        player.alive = false;

        assert!(!player.jump(&physics));
        player.move_left(&physics);
        player.advance(1.0);

        assert_eq!(player.velocity, Vec2::ZERO);
        assert_eq!(player.state(), EntityState::Standing);
        assert_eq!(player.state_time(), 0.0);
    }

    #[test]
    fn test_reset_to_spawn() {
        let physics = physics();
        let mut player = Entity::player(Vec2::new(5.0, -90.0));
        player.jump(&physics);
        player.velocity = Vec2::new(3.0, -40.0);
        player.alive = false;

        player.reset_to(Vec2::new(1.0, 2.0));

        assert_eq!(player.position, Vec2::new(1.0, 2.0));
        assert_eq!(player.velocity, Vec2::ZERO);
        assert!(player.alive);
        assert_eq!(player.state(), EntityState::Standing);
    }

    #[test]
    fn test_kinds_own_sizes_and_animations() {
        let player = Entity::player(Vec2::ZERO);
        let key = Entity::key(Vec2::ZERO);

        assert_eq!(player.size, Vec2::new(18.0 * UNIT_SCALE, 26.0 * UNIT_SCALE));
        assert!((key.size - Vec2::splat(0.5)).abs().max_element() < 1e-6);
        assert_eq!(key.kind.animations(), AnimationSet::still());
        assert_eq!(player.snapshot().frame, 0);
    }
}
