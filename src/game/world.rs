// GameWorld: the level catalog, the progression state and the running session
//
// Front ends (desktop window, headless runner, tests) talk only to GameWorld:
// they feed it one frame of input at a time and ask which screen to show.

use super::Screen;
use crate::config::GameConfig;
use crate::input::InputIntents;
use crate::level::{LevelCatalog, LevelId};
use crate::map::MapProvider;
use crate::progression::{ChallengeOutcome, LevelProgressionController, ProgressError};
use crate::session::{LevelSession, Services, SessionEvent};
use std::rc::Rc;

pub struct GameWorld {
    catalog: LevelCatalog,
    progression: LevelProgressionController,
    services: Services,
    session: Option<LevelSession>,
}

impl GameWorld {
    /// Load progress for every level in `catalog`; starts on the level select screen.
    pub fn new(catalog: LevelCatalog, mut services: Services) -> Self {
        let progression = LevelProgressionController::load(catalog.len(), services.store.as_mut());
        GameWorld {
            catalog,
            progression,
            services,
            session: None,
        }
    }

    /// Begin playing `level`, or the lowest unlocked level when `None`.
    pub fn start(&mut self, level: Option<LevelId>) -> Result<LevelId, ProgressError> {
        let id = self.progression.start(level)?;
        self.open_session(id)?;
        Ok(id)
    }

    fn open_session(&mut self, id: LevelId) -> Result<(), ProgressError> {
        let level = self.catalog.get(id).ok_or(ProgressError::NoSuchLevel(id))?;
        let map: Rc<dyn MapProvider> = level.map.clone();
        self.session = Some(LevelSession::new(id, map, &self.services.config));
        Ok(())
    }

    /// Run one frame of the active session and follow any level change it causes.
    pub fn frame(&mut self, dt: f32, intents: InputIntents) -> SessionEvent {
        let Some(session) = self.session.as_mut() else {
            return SessionEvent::None;
        };

        let event = session.tick(dt, intents, &mut self.progression, &mut self.services);
        match event {
            SessionEvent::LevelComplete { next } => {
                if let Err(e) = self.open_session(next) {
                    log::error!("Could not open level {}: {}", next, e);
                    self.session = None;
                }
            }
            SessionEvent::GameFinished => {
                self.session = None;
            }
            SessionEvent::None | SessionEvent::Died => {}
        }
        event
    }

    /// Report the result of the retry challenge.
    pub fn resolve_challenge(&mut self, outcome: ChallengeOutcome) -> Result<(), ProgressError> {
        match self.session.as_mut() {
            Some(session) => session.resolve_gate(outcome, &mut self.progression),
            None => Err(ProgressError::NotInGate),
        }
    }

    pub fn return_to_level_select(&mut self) {
        self.progression.return_to_level_select();
        self.session = None;
    }

    pub fn toggle_pause(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_pause();
        }
    }

    pub fn screen(&self) -> Screen {
        Screen::from(self.progression.phase())
    }

    pub fn session(&self) -> Option<&LevelSession> {
        self.session.as_ref()
    }

    pub fn session_mut(&mut self) -> Option<&mut LevelSession> {
        self.session.as_mut()
    }

    pub fn progression(&self) -> &LevelProgressionController {
        &self.progression
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.services.config
    }
}
