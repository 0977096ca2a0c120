/// Per-frame player intents and the sources that produce them
///
/// Raw devices (keyboard, touch buttons, a replay script) are reduced to
/// three booleans per frame. Only the player carries a [`PlayerControl`];
/// other entity kinds never see input.
use crate::entity::Entity;
use crate::physics::PhysicsConfig;
use std::collections::VecDeque;

/// What the player wants to do this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputIntents {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
}

impl InputIntents {
    pub const IDLE: InputIntents = InputIntents {
        move_left: false,
        move_right: false,
        jump: false,
    };

    pub fn left() -> Self {
        Self {
            move_left: true,
            ..Self::IDLE
        }
    }

    pub fn right() -> Self {
        Self {
            move_right: true,
            ..Self::IDLE
        }
    }

    pub fn jump() -> Self {
        Self {
            jump: true,
            ..Self::IDLE
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }
}

/// Anything that can be polled once per frame for intents
pub trait InputSource {
    fn poll(&mut self) -> InputIntents;
}

/// Plays back a fixed list of frames, then reports idle forever
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<InputIntents>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = InputIntents>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Queue `intents` for the next `count` frames.
    pub fn hold(mut self, intents: InputIntents, count: usize) -> Self {
        self.frames.extend(std::iter::repeat_n(intents, count));
        self
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputIntents {
        self.frames.pop_front().unwrap_or_default()
    }
}

/// Input capability attached to the player entity
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerControl;

impl PlayerControl {
    /// Turn intents into state machine commands: jump, then left, then right.
    ///
    /// Holding both directions ends up moving right.
    pub fn apply(&self, entity: &mut Entity, intents: InputIntents, physics: &PhysicsConfig) {
        if intents.jump {
            entity.jump(physics);
        }
        if intents.move_left {
            entity.move_left(physics);
        }
        if intents.move_right {
            entity.move_right(physics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityState, Facing};
    use glam::Vec2;

    #[test]
    fn test_scripted_input_runs_out_to_idle() {
        let mut input = ScriptedInput::default()
            .hold(InputIntents::right(), 2)
            .hold(InputIntents::jump(), 1);

        assert_eq!(input.poll(), InputIntents::right());
        assert_eq!(input.poll(), InputIntents::right());
        assert_eq!(input.poll(), InputIntents::jump());
        assert!(input.poll().is_idle());
        assert_eq!(input.remaining(), 0);
    }

    #[test]
    fn test_control_jumps_before_moving() {
        let physics = PhysicsConfig::default();
        let mut player = Entity::player(Vec2::ZERO);
        let intents = InputIntents {
            jump: true,
            move_left: true,
            move_right: false,
        };

        PlayerControl.apply(&mut player, intents, &physics);

        // Airborne by the time the move runs, so the jump pose is kept
        assert_eq!(player.state(), EntityState::Jumping);
        assert_eq!(player.facing, Facing::Left);
        assert_eq!(player.velocity, Vec2::new(-5.0, 20.0));
    }

    #[test]
    fn test_both_directions_ends_facing_right() {
        let physics = PhysicsConfig::default();
        let mut player = Entity::player(Vec2::ZERO);
        let intents = InputIntents {
            move_left: true,
            move_right: true,
            jump: false,
        };

        PlayerControl.apply(&mut player, intents, &physics);

        assert_eq!(player.facing, Facing::Right);
        assert_eq!(player.velocity.x, 5.0);
    }
}
