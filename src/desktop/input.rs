use problematic::game::Screen;
use problematic::input::InputIntents;
use problematic::level::LevelId;
use problematic::progression::ChallengeOutcome;
use sdl2::event::Event;
use sdl2::keyboard::{KeyboardState, Keycode, Scancode};
use sdl2::EventPump;

/// Discrete actions produced by key presses
///
/// Held movement keys are not actions; they are sampled every frame by
/// [`intents_from_keyboard`].
#[derive(Debug, Clone, PartialEq)]
pub enum GameAction {
    // === Level select ===
    SelectLevel(LevelId),
    StartDefault,

    // === Gameplay ===
    TogglePause,
    BackToLevelSelect,

    // === Challenge ===
    ResolveChallenge(ChallengeOutcome),

    // === System ===
    Quit,
}

/// Which keys mean what depends on the screen being shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputContext {
    LevelSelect,
    Playing,
    Challenge,
    Finished,
}

impl From<Screen> for InputContext {
    fn from(screen: Screen) -> Self {
        match screen {
            Screen::LevelSelect => InputContext::LevelSelect,
            Screen::Playing(_) => InputContext::Playing,
            Screen::Challenge(_) => InputContext::Challenge,
            Screen::Finished => InputContext::Finished,
        }
    }
}

/// Turns SDL2 events into [`GameAction`]s for the current screen
pub struct InputSystem {
    pub context: InputContext,
}

impl InputSystem {
    pub fn new() -> Self {
        InputSystem {
            context: InputContext::LevelSelect,
        }
    }

    pub fn update_context(&mut self, screen: Screen) {
        self.context = InputContext::from(screen);
    }

    pub fn poll_events(&self, event_pump: &mut EventPump) -> Vec<GameAction> {
        let mut actions = Vec::new();

        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => actions.push(GameAction::Quit),
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => self.handle_keydown(key, &mut actions),
                _ => {}
            }
        }

        actions
    }

    fn handle_keydown(&self, key: Keycode, actions: &mut Vec<GameAction>) {
        match self.context {
            InputContext::LevelSelect => match key {
                Keycode::Escape => actions.push(GameAction::Quit),
                Keycode::Return | Keycode::Space => actions.push(GameAction::StartDefault),
                _ => {
                    if let Some(id) = level_for_key(key) {
                        actions.push(GameAction::SelectLevel(id));
                    }
                }
            },
            InputContext::Playing => match key {
                Keycode::P => actions.push(GameAction::TogglePause),
                Keycode::Escape | Keycode::Backspace => actions.push(GameAction::BackToLevelSelect),
                _ => {}
            },
            InputContext::Challenge => match key {
                Keycode::Return => {
                    actions.push(GameAction::ResolveChallenge(ChallengeOutcome::Succeeded))
                }
                Keycode::Backspace => {
                    actions.push(GameAction::ResolveChallenge(ChallengeOutcome::Failed))
                }
                Keycode::Escape => actions.push(GameAction::BackToLevelSelect),
                _ => {}
            },
            InputContext::Finished => match key {
                Keycode::Escape => actions.push(GameAction::Quit),
                _ => actions.push(GameAction::BackToLevelSelect),
            },
        }
    }
}

/// Number keys 1-9 pick a level
fn level_for_key(key: Keycode) -> Option<LevelId> {
    let id = match key {
        Keycode::Num1 => 1,
        Keycode::Num2 => 2,
        Keycode::Num3 => 3,
        Keycode::Num4 => 4,
        Keycode::Num5 => 5,
        Keycode::Num6 => 6,
        Keycode::Num7 => 7,
        Keycode::Num8 => 8,
        Keycode::Num9 => 9,
        _ => return None,
    };
    Some(id)
}

/// Held keys this frame: A/Left, D/Right, Space/W/Up to jump.
pub fn intents_from_keyboard(keyboard: &KeyboardState) -> InputIntents {
    let held = |codes: &[Scancode]| codes.iter().any(|&c| keyboard.is_scancode_pressed(c));
    InputIntents {
        move_left: held(&[Scancode::A, Scancode::Left]),
        move_right: held(&[Scancode::D, Scancode::Right]),
        jump: held(&[Scancode::Space, Scancode::W, Scancode::Up]),
    }
}
