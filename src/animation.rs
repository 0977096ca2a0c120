use crate::entity::EntityState;
use serde::{Deserialize, Serialize};

/// How frame indices advance over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationMode {
    /// 0, 1, 2, 0, 1, 2, ...
    Loop,
    /// 0, 1, 2, 1, 0, 1, 2, ...
    PingPong,
    /// Always frame 0
    Single,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationData {
    pub frame_count: usize,
    /// Seconds each frame stays on screen
    pub frame_duration: f32,
    pub mode: AnimationMode,
}

impl AnimationData {
    pub const fn single() -> Self {
        AnimationData {
            frame_count: 1,
            frame_duration: 0.0,
            mode: AnimationMode::Single,
        }
    }

    pub const fn ping_pong(frame_count: usize, frame_duration: f32) -> Self {
        AnimationData {
            frame_count,
            frame_duration,
            mode: AnimationMode::PingPong,
        }
    }

    /// Frame to display after `state_time` seconds in the owning state.
    pub fn frame_at(&self, state_time: f32) -> usize {
        if self.frame_count <= 1
            || self.frame_duration <= 0.0
            || !state_time.is_finite()
            || state_time <= 0.0
        {
            return 0;
        }

        let step = (state_time / self.frame_duration) as usize;
        match self.mode {
            AnimationMode::Single => 0,
            AnimationMode::Loop => step % self.frame_count,
            AnimationMode::PingPong => {
                let period = self.frame_count * 2 - 2;
                let i = step % period;
                if i < self.frame_count { i } else { period - i }
            }
        }
    }
}

/// Animations owned by one entity kind, one per [`EntityState`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationSet {
    pub standing: AnimationData,
    pub walking: AnimationData,
    pub jumping: AnimationData,
}

/// Walking cycle: three frames, 0.15 s each, bouncing back and forth.
pub const WALK_FRAME_DURATION: f32 = 0.15;
pub const WALK_FRAME_COUNT: usize = 3;

impl AnimationSet {
    /// Standing / walking / jumping set used by the player.
    pub const fn character() -> Self {
        AnimationSet {
            standing: AnimationData::single(),
            walking: AnimationData::ping_pong(WALK_FRAME_COUNT, WALK_FRAME_DURATION),
            jumping: AnimationData::single(),
        }
    }

    /// A still object: the standing frame in every state.
    pub const fn still() -> Self {
        AnimationSet {
            standing: AnimationData::single(),
            walking: AnimationData::single(),
            jumping: AnimationData::single(),
        }
    }

    pub fn for_state(&self, state: EntityState) -> &AnimationData {
        match state {
            EntityState::Standing => &self.standing,
            EntityState::Walking => &self.walking,
            EntityState::Jumping => &self.jumping,
        }
    }

    pub fn frame(&self, state: EntityState, state_time: f32) -> usize {
        self.for_state(state).frame_at(state_time)
    }
}
