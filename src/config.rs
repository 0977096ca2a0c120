//! Game configuration loaded from JSON
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "physics": { "jump_velocity": 22.0 }, "window": { "width": 1280 } }
//! ```

use crate::camera::CameraConfig;
use crate::physics::PhysicsConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    ParseError(serde_json::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::ParseError(e) => write!(f, "Config parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::ParseError(err)
    }
}

/// Where levels are read from and progress is written to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub maps_dir: PathBuf,
    /// `None` uses [`default_data_dir`]
    pub data_dir: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            maps_dir: PathBuf::from("assets/maps"),
            data_dir: None,
        }
    }
}

impl PathsConfig {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// `~/.problematic/progress`, or `./saves` when there is no home directory.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".problematic/progress"))
        .unwrap_or_else(|| PathBuf::from("./saves"))
}

/// Desktop window settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    /// Screen pixels per world unit
    pub pixels_per_unit: f32,
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        // 15 x 7 world units on screen
        Self {
            width: 1050,
            height: 490,
            pixels_per_unit: 70.0,
            target_fps: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub camera: CameraConfig,
    pub paths: PathsConfig,
    pub window: WindowConfig,
}

impl GameConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: GameConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`GameConfig::load_from_file`], but a missing file means defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        let config = Self::load_from_file(path)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        let values = [
            p.gravity,
            p.max_velocity,
            p.jump_velocity,
            p.damping,
            p.snap_threshold,
            p.death_y,
            self.camera.left_stop,
            self.camera.stop_offset,
            self.camera.player_left_margin,
            self.camera.player_right_margin,
            self.window.pixels_per_unit,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::Invalid("values must be finite".to_string()));
        }
        if p.max_velocity <= 0.0 || p.jump_velocity <= 0.0 {
            return Err(ConfigError::Invalid(
                "max_velocity and jump_velocity must be positive".to_string(),
            ));
        }
        if p.snap_threshold < 0.0 || p.snap_threshold >= p.max_velocity {
            return Err(ConfigError::Invalid(format!(
                "snap_threshold must be in [0, max_velocity), got {}",
                p.snap_threshold
            )));
        }
        if p.damping <= 0.0 || p.damping > 1.0 {
            return Err(ConfigError::Invalid(format!(
                "damping must be in (0, 1], got {}",
                p.damping
            )));
        }
        if self.window.width == 0 || self.window.height == 0 || self.window.pixels_per_unit <= 0.0 {
            return Err(ConfigError::Invalid("window size must be positive".to_string()));
        }
        Ok(())
    }
}
