/// One level being played: the player, the key and the camera
///
/// A [`LevelSession`] owns its entities outright and runs the whole frame
/// synchronously in [`LevelSession::tick`]:
///
/// 1. Advance animation time
/// 2. Apply player input
/// 3. Integrate against the collision layer
/// 4. Death check (`y < death_y`) → gate
/// 5. Clamp the player inside the map's horizontal edges
/// 6. Key pickup → next level
/// 7. Camera follow
///
/// Anything the session needs from outside (config, progress store,
/// challenge gate) arrives through [`Services`], built once at startup.
use crate::camera::{Camera, CameraConfig, LevelBounds};
use crate::config::GameConfig;
use crate::entity::{Entity, EntitySnapshot};
use crate::input::{InputIntents, PlayerControl};
use crate::level::LevelId;
use crate::map::{BOTTOM_MARKER, COLLISION_LAYER, END_MARKER, KEY_MARKER, MapProvider, PLAYER_MARKER};
use crate::physics::{KinematicIntegrator, PhysicsConfig};
use crate::progress::PersistenceStore;
use crate::progression::{
    ChallengeGate, ChallengeOutcome, GoalOutcome, LevelProgressionController, Phase, ProgressError,
};
use glam::Vec2;
use std::rc::Rc;

/// Collaborators shared by every session
pub struct Services {
    pub config: GameConfig,
    pub store: Box<dyn PersistenceStore>,
    pub gate: Box<dyn ChallengeGate>,
}

impl Services {
    pub fn new(
        config: GameConfig,
        store: Box<dyn PersistenceStore>,
        gate: Box<dyn ChallengeGate>,
    ) -> Self {
        Self { config, store, gate }
    }
}

/// What the front end should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    None,
    /// Show the challenge; the level resumes after it is resolved
    Died,
    /// The key was collected and `next` is now playing
    LevelComplete { next: LevelId },
    /// The key of the last level was collected
    GameFinished,
}

pub struct LevelSession {
    level_id: LevelId,
    map: Rc<dyn MapProvider>,
    player: Entity,
    key: Entity,
    control: PlayerControl,
    integrator: KinematicIntegrator,
    physics: PhysicsConfig,
    camera_config: CameraConfig,
    camera: Camera,
    bounds: LevelBounds,
    spawn: Vec2,
    paused: bool,
}

impl LevelSession {
    /// Set up a level from its map markers.
    ///
    /// Missing markers fall back with a warning: player and key spawn at the
    /// origin, the map end defaults to the map width and the bottom
    /// reference to 0.
    pub fn new(level_id: LevelId, map: Rc<dyn MapProvider>, config: &GameConfig) -> Self {
        let spawn = marker_or_origin(map.as_ref(), PLAYER_MARKER, level_id);
        let key_position = marker_or_origin(map.as_ref(), KEY_MARKER, level_id);

        let map_end = map.entity_marker(END_MARKER).map(|p| p.x).unwrap_or_else(|| {
            log::warn!("Level {} has no '{}' marker, using the map width", level_id, END_MARKER);
            map.width() as f32
        });
        let bottom_reference = map.entity_marker(BOTTOM_MARKER).map(|p| p.y).unwrap_or_else(|| {
            log::warn!("Level {} has no '{}' marker, using 0", level_id, BOTTOM_MARKER);
            0.0
        });

        if !map.collision_layer(COLLISION_LAYER).has_layer() {
            log::warn!(
                "Level {} has no '{}' layer; nothing will be solid",
                level_id,
                COLLISION_LAYER
            );
        }

        let bounds = config.camera.bounds(map_end, bottom_reference);
        let mut camera = Camera::default();
        camera.follow(spawn.x, &bounds, config.camera.stop_offset);

        log::info!("Level {} ready, player spawns at {:?}", level_id, spawn);

        Self {
            level_id,
            map,
            player: Entity::player(spawn),
            key: Entity::key(key_position),
            control: PlayerControl,
            integrator: KinematicIntegrator::new(config.physics),
            physics: config.physics,
            camera_config: config.camera,
            camera,
            bounds,
            spawn,
            paused: false,
        }
    }

    /// Run one frame. Does nothing while paused, for a non-positive `dt`,
    /// or when this session's level is not the one being played.
    pub fn tick(
        &mut self,
        dt: f32,
        intents: InputIntents,
        progression: &mut LevelProgressionController,
        services: &mut Services,
    ) -> SessionEvent {
        if self.paused || !dt.is_finite() || dt <= 0.0 {
            return SessionEvent::None;
        }
        if progression.phase() != Phase::Playing(self.level_id) {
            return SessionEvent::None;
        }

        self.player.advance(dt);
        self.key.advance(dt);
        self.control.apply(&mut self.player, intents, &self.physics);

        let grid = self.map.collision_layer(COLLISION_LAYER);
        let outcome = self.integrator.step(&mut self.player, dt, &grid);
        self.player.apply_step(&outcome);

        if self.player.position.y < self.physics.death_y {
            self.player.alive = false;
        }
        if !self.player.alive {
            return match progression.on_death(services.gate.as_mut()) {
                Ok(_) => SessionEvent::Died,
                Err(e) => {
                    log::warn!("Death on level {} ignored: {}", self.level_id, e);
                    SessionEvent::None
                }
            };
        }

        let clamped_x = self
            .camera_config
            .clamp_player_x(self.player.position.x, self.bounds.map_end);
        if clamped_x != self.player.position.x {
            // Never clamp into a solid column
            let clamped = self
                .player
                .bounds()
                .translated(clamped_x - self.player.position.x, 0.0);
            if grid.overlapping(&clamped).is_empty() {
                self.player.position.x = clamped_x;
            } else {
                log::debug!("Edge clamp at x={} blocked by tiles", clamped_x);
            }
        }

        if self.player.bounds().overlaps(&self.key.bounds()) {
            log::debug!("Key collected on level {}", self.level_id);
            match progression.on_goal(services.store.as_mut()) {
                Ok(GoalOutcome::Advanced(next)) => return SessionEvent::LevelComplete { next },
                Ok(GoalOutcome::Finished) => return SessionEvent::GameFinished,
                Err(e) => log::warn!("Key pickup on level {} ignored: {}", self.level_id, e),
            }
        }

        self.camera
            .follow(self.player.position.x, &self.bounds, self.camera_config.stop_offset);
        SessionEvent::None
    }

    /// Resolve the pending challenge and put the player back at the spawn point.
    pub fn resolve_gate(
        &mut self,
        outcome: ChallengeOutcome,
        progression: &mut LevelProgressionController,
    ) -> Result<(), ProgressError> {
        let id = progression.resolve_gate(outcome)?;
        if id == self.level_id {
            self.respawn();
        }
        Ok(())
    }

    pub fn respawn(&mut self) {
        self.player.reset_to(self.spawn);
        self.camera
            .follow(self.spawn.x, &self.bounds, self.camera_config.stop_offset);
    }

    pub fn level_id(&self) -> LevelId {
        self.level_id
    }

    pub fn map(&self) -> &dyn MapProvider {
        self.map.as_ref()
    }

    pub fn player(&self) -> &Entity {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.player
    }

    pub fn key(&self) -> &Entity {
        &self.key
    }

    pub fn snapshots(&self) -> [EntitySnapshot; 2] {
        [self.player.snapshot(), self.key.snapshot()]
    }

    pub fn camera(&self) -> Camera {
        self.camera
    }

    pub fn bounds(&self) -> LevelBounds {
        self.bounds
    }

    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        if paused != self.paused {
            log::debug!("Level {} {}", self.level_id, if paused { "paused" } else { "resumed" });
        }
        self.paused = paused;
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }
}

fn marker_or_origin(map: &dyn MapProvider, name: &str, level_id: LevelId) -> Vec2 {
    map.entity_marker(name).unwrap_or_else(|| {
        log::warn!("Level {} has no '{}' marker, using the origin", level_id, name);
        Vec2::ZERO
    })
}
