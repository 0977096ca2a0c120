// Shared enums used by the game driver and the front ends

use crate::level::LevelId;
use crate::progression::Phase;

/// Which screen the front end should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    LevelSelect,
    Playing(LevelId),
    /// The retry challenge for a level
    Challenge(LevelId),
    /// Every level done; shown until the player returns to level select
    Finished,
}

impl From<Phase> for Screen {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::LevelSelect => Screen::LevelSelect,
            Phase::Playing(id) => Screen::Playing(id),
            Phase::Gate(id) => Screen::Challenge(id),
            Phase::Finished => Screen::Finished,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_from_phase() {
        assert_eq!(Screen::from(Phase::Gate(2)), Screen::Challenge(2));
        assert_eq!(Screen::from(Phase::Playing(1)), Screen::Playing(1));
        assert_eq!(Screen::from(Phase::Finished), Screen::Finished);
    }
}
